use std::cell::RefCell;
use std::rc::Rc;

use hal::{Attitude, Axis, FlightCommand, InertialSensor, Vector3d};

const GRAVITY: f32 = 9.81;

/// Map units per metre in the simulated room
const CM_PER_METRE: f32 = 100.0;

/// Tilt held while accelerating sideways, in degrees
const MANEUVER_TILT: f32 = 4.0;

/// One move: accelerate, then brake for the same time
#[derive(Debug, Clone, Copy)]
struct Maneuver {
    command: FlightCommand,
    axis: Axis,
    sign: f32,
    elapsed_ms: u32,
    half_ms: u32,
    acceleration: f32,
}

/// Ground truth of the simulated robot
///
/// Position is in map units with `z` the depth below the projector.
/// Velocity and acceleration are body-frame SI values with `z` pointing up.
#[derive(Debug, Clone)]
pub struct SimVehicle {
    pub position: Vector3d,
    pub velocity: Vector3d,
    pub acceleration: Vector3d,
    pub attitude: Attitude,
    maneuver: Option<Maneuver>,
    lateral_ms: u32,
    vertical_ms: u32,
}

impl SimVehicle {
    /// Vehicle at `position` with lateral and vertical moves lasting the given times
    pub fn new(position: Vector3d, lateral_ms: u32, vertical_ms: u32) -> Self {
        Self {
            position,
            velocity: Vector3d::zeros(),
            acceleration: Vector3d::zeros(),
            attitude: Attitude::default(),
            maneuver: None,
            lateral_ms,
            vertical_ms,
        }
    }

    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn is_busy(&self) -> bool {
        self.maneuver.is_some()
    }

    /// Start flying `command`; false when busy or the command does not move
    pub fn begin(&mut self, command: FlightCommand) -> bool {
        if self.is_busy() {
            return false;
        }
        let (axis, sign) = match command {
            FlightCommand::Forward => (Axis::X, 1.0),
            FlightCommand::Backward => (Axis::X, -1.0),
            FlightCommand::Right => (Axis::Y, 1.0),
            FlightCommand::Left => (Axis::Y, -1.0),
            FlightCommand::Up | FlightCommand::TakeOff => (Axis::Z, 1.0),
            FlightCommand::Down | FlightCommand::Land => (Axis::Z, -1.0),
            _ => return false,
        };
        let duration_ms = if axis.is_lateral() {
            self.lateral_ms
        } else {
            self.vertical_ms
        };
        self.maneuver = Some(Maneuver {
            command,
            axis,
            sign,
            elapsed_ms: 0,
            half_ms: duration_ms / 2,
            acceleration: if axis.is_lateral() { 1.25 } else { 1.0 },
        });
        true
    }

    /// Advance the truth by `dt_ms`; returns the command that just finished
    pub fn step(&mut self, dt_ms: u32) -> Option<FlightCommand> {
        let dt = dt_ms as f32 / 1000.0;
        let mut finished = None;

        self.acceleration = Vector3d::zeros();
        self.attitude = Attitude::default();
        if let Some(maneuver) = self.maneuver.as_mut() {
            let braking = maneuver.elapsed_ms >= maneuver.half_ms;
            let push = if braking { -maneuver.sign } else { maneuver.sign };
            self.acceleration[maneuver.axis.index()] = push * maneuver.acceleration;
            match maneuver.axis {
                Axis::X => self.attitude.pitch = push * MANEUVER_TILT,
                Axis::Y => self.attitude.roll = push * MANEUVER_TILT,
                Axis::Z => {}
            }

            maneuver.elapsed_ms += dt_ms;
            if maneuver.elapsed_ms >= 2 * maneuver.half_ms {
                finished = Some(maneuver.command);
            }
        }

        self.velocity += self.acceleration * dt;
        let travelled = self.velocity * dt * CM_PER_METRE;
        self.position += Vector3d::new(travelled.x, travelled.y, -travelled.z);

        if finished.is_some() {
            self.maneuver = None;
            self.velocity = Vector3d::zeros();
        }
        finished
    }
}

/// Inertial sensor reading the simulated truth
pub struct SimImu {
    vehicle: Rc<RefCell<SimVehicle>>,
    bias: Vector3d,
}

impl SimImu {
    pub fn new(vehicle: Rc<RefCell<SimVehicle>>, bias: Vector3d) -> Self {
        Self { vehicle, bias }
    }
}

impl InertialSensor for SimImu {
    fn acceleration(&mut self) -> Option<Vector3d> {
        let vehicle = self.vehicle.borrow();
        Some(vehicle.acceleration + Vector3d::new(0.0, 0.0, GRAVITY) + self.bias)
    }

    fn attitude(&self) -> Attitude {
        self.vehicle.borrow().attitude
    }

    fn is_stationary(&self) -> bool {
        !self.vehicle.borrow().is_busy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fly(vehicle: &mut SimVehicle, command: FlightCommand) -> u32 {
        assert!(vehicle.begin(command));
        let mut elapsed = 0;
        while vehicle.step(1).is_none() {
            elapsed += 1;
        }
        elapsed + 1
    }

    #[test]
    fn test_forward_moves_twenty_centimetres() {
        let mut vehicle = SimVehicle::new(Vector3d::new(50.0, 50.0, 200.0), 800, 1000);
        assert_eq!(fly(&mut vehicle, FlightCommand::Forward), 800);
        assert!((vehicle.position.x - 70.0).abs() < 0.5);
        assert!((vehicle.position.y - 50.0).abs() < 1e-3);
        assert_eq!(vehicle.velocity, Vector3d::zeros());
        assert!(!vehicle.is_busy());
    }

    #[test]
    fn test_up_reduces_depth() {
        let mut vehicle = SimVehicle::new(Vector3d::new(50.0, 50.0, 200.0), 800, 1000);
        fly(&mut vehicle, FlightCommand::Up);
        assert!((vehicle.position.z - 175.0).abs() < 0.5);
    }

    #[test]
    fn test_lateral_move_tilts_then_levels() {
        let mut vehicle = SimVehicle::new(Vector3d::zeros(), 800, 1000);
        vehicle.begin(FlightCommand::Left);
        vehicle.step(1);
        assert_eq!(vehicle.attitude.roll, -MANEUVER_TILT);
        for _ in 0..500 {
            vehicle.step(1);
        }
        assert_eq!(vehicle.attitude.roll, MANEUVER_TILT);
        while vehicle.step(1).is_none() {}
        vehicle.step(1);
        assert_eq!(vehicle.attitude, Attitude::default());
    }

    #[test]
    fn test_busy_vehicle_refuses_commands() {
        let mut vehicle = SimVehicle::new(Vector3d::zeros(), 800, 1000);
        assert!(vehicle.begin(FlightCommand::Right));
        assert!(!vehicle.begin(FlightCommand::Up));
        assert!(!SimVehicle::new(Vector3d::zeros(), 800, 1000).begin(FlightCommand::Idle));
    }
}
