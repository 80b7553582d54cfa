//! Named recurring background tasks.
//!
//! A [`Scheduler`] holds tasks registered at startup and runs them on a
//! fixed cadence once enabled, or immediately on demand. Control comes
//! from the HTTP surface: trigger, stop, enable, disable.

mod error;
mod registry;

pub use error::SchedulerError;
pub use registry::{Scheduler, TaskSnapshot};
