//! VLC subsystem wiring for the flying robot
//!
//! Ties the color-map particle filter and the FSK light link together:
//! a [`SharedContext`] owns the state several tasks touch, and the four
//! periodic [`tasks`] drive it from the hardware traits in `hal`.

#![cfg_attr(not(test), no_std)]

mod config;
mod context;
mod error;
mod intake;
mod params;
pub mod tasks;
mod telemetry;

#[cfg(test)]
mod testing;

// critical-section implementation for host tests
#[cfg(test)]
use critical_section as _;

pub use config::{TaskPeriods, VehicleConfig};
pub use context::{SharedContext, COMMAND_QUEUE_SIZE};
pub use error::{AutopilotError, AutopilotResult};
pub use intake::ColorIntake;
pub use params::{MemoryParameters, PARAM_LAST_COMMAND, PARAM_MOTION_ACTIVE};
pub use tasks::{FilterTask, LinkTask, MotionTask, SamplingTask};
pub use telemetry::Telemetry;
