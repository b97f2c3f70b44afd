//! recast-codegen - compile recorded browser events into scripts
//!
//! The raw event stream is first rewritten by a small peephole
//! [`optimizer`], then walked by a [`Generator`] parameterized over a
//! [`Backend`]. Two backends ship: [`Puppeteer`] and [`Playwright`].
//!
//! ```rust
//! use recast_codegen::prelude::*;
//!
//! let events = vec![
//!     Event::new(Action::Goto).href("https://example.com"),
//!     Event::new(Action::Click).selector("a.more"),
//! ];
//! let code = CodeGenerator::new().generate(&events);
//! assert!(code.playwright.contains("await page.click('a.more')"));
//! ```

pub mod backends;
pub mod block;
pub mod error;
pub mod facade;
pub mod generator;
pub mod keys;
pub mod optimizer;
pub mod options;
pub mod validate;

pub use backends::{Playwright, Puppeteer};
pub use block::{Block, Line, LineKind};
pub use error::{Error, ErrorCode, Result};
pub use facade::{CodeGenerator, GeneratedCode};
pub use generator::{escape, Backend, Generator};
pub use optimizer::optimize;
pub use options::GeneratorOptions;
pub use validate::validate;

pub mod prelude {
    pub use crate::backends::{Playwright, Puppeteer};
    pub use crate::error::{Error, ErrorCode, Result};
    pub use crate::facade::{CodeGenerator, GeneratedCode};
    pub use crate::generator::{Backend, Generator};
    pub use crate::optimizer::optimize;
    pub use crate::options::GeneratorOptions;
    pub use crate::validate::validate;
    pub use recast_events::{Action, Event, EventValue, Recording};
}
