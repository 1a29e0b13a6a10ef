//! Simulated world around the VLC subsystem
//!
//! Everything runs on one millisecond clock shared through [`SimClock`].
//! The projector, color camera and IMU read the ground truth kept by
//! [`SimVehicle`] and present it through the `hal` traits.

mod camera;
mod projector;
mod vehicle;

use std::cell::Cell;
use std::rc::Rc;

pub use camera::{ColorCamera, DataReadyLine};
pub use projector::{Photodiode, Projector};
pub use vehicle::{SimImu, SimVehicle};

/// Simulated time in milliseconds
#[derive(Debug, Default, Clone)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn advance(&self, ms: u32) {
        self.0.set(self.0.get().wrapping_add(ms));
    }
}

impl hal::Clock for SimClock {
    fn now_ms(&self) -> u32 {
        self.0.get()
    }
}
