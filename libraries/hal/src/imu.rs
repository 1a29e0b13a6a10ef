/// Inertial sensor interface
use crate::types::{Attitude, Axis, Vector3d};

/// Inertial data provided by the external state estimator
///
/// Only the quantities the motion model needs are exposed. Returning `None`
/// means no fresh sample was available this cycle; callers skip their update.
pub trait InertialSensor {
    /// Get acceleration in the body frame (in m/s², gravity included)
    fn acceleration(&mut self) -> Option<Vector3d>;

    /// Get the estimator's own velocity along `axis` (in m/s), if it has one
    fn velocity(&self, _axis: Axis) -> Option<f32> {
        None
    }

    /// Get the current roll and pitch (in degrees)
    fn attitude(&self) -> Attitude;

    /// Check if the vehicle is stationary and ready to fly
    ///
    /// Bias calibration only accepts samples while this holds.
    fn is_stationary(&self) -> bool;
}

/// Inertial sample bundled for one motion model tick
#[derive(Debug, Clone, Copy)]
pub struct InertialSample {
    /// Acceleration in the body frame (m/s²)
    pub acceleration: Vector3d,

    /// Roll and pitch (degrees)
    pub attitude: Attitude,

    /// Whether the vehicle is stationary and flight-ready
    pub stationary: bool,
}

impl InertialSample {
    /// Read one sample from `sensor`, or `None` on a transient miss
    pub fn read<S: InertialSensor + ?Sized>(sensor: &mut S) -> Option<Self> {
        let acceleration = sensor.acceleration()?;
        Some(Self {
            acceleration,
            attitude: sensor.attitude(),
            stationary: sensor.is_stationary(),
        })
    }
}
