//! Periodic VLC tasks
//!
//! Each task is a plain struct with one step method called at its period
//! (see [`TaskPeriods`](crate::TaskPeriods)). The embedding decides how the
//! calls are scheduled; a task never blocks.

mod filter;
mod link;
mod motion;
mod sampling;

pub use filter::FilterTask;
pub use link::LinkTask;
pub use motion::MotionTask;
pub use sampling::SamplingTask;
