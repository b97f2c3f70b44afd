//! recast-events - recorded browser interactions
//!
//! The event stream produced by the recording extension, and a small
//! JSON lines store for keeping recordings around between sessions.

pub mod events;
pub mod storage;

pub use events::*;
pub use storage::{read_recording, RecordingStorage};

pub mod prelude {
    pub use crate::events::*;
    pub use crate::storage::{read_recording, RecordingStorage};
}
