//! # recast
//!
//! Turn recorded browser sessions into runnable automation scripts.
//!
//! ## Features
//!
//! - **Events**: the flat event stream captured by the recording extension
//! - **Optimizer**: keystrokes collapsed into fills, duplicate waits removed
//! - **Generators**: Puppeteer and Playwright scripts from the same stream
//! - **Storage**: recordings kept as JSON lines between sessions
//!
//! ## Quick Start
//!
//! ```rust
//! use recast::prelude::*;
//!
//! let recording = Recording::from_json(
//!     "search",
//!     r##"[{"action":"GOTO","href":"https://example.com"},
//!         {"action":"click","selector":"#search"}]"##,
//! )?;
//! let code = CodeGenerator::new().generate(&recording.events);
//! println!("{}", code.playwright);
//! # Ok::<(), anyhow::Error>(())
//! ```

// Re-export the code generator
pub use recast_codegen::*;

// Re-export the event model and storage
pub use recast_events as events;
pub use recast_events::{read_recording, Action, Event, EventValue, Recording, RecordingStorage};

/// Prelude - import everything you need
pub mod prelude {
    pub use recast_codegen::prelude::*;
    pub use recast_events::{read_recording, RecordingStorage};
}
