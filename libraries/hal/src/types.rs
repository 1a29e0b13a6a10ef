/// Common data types for hardware abstraction interfaces
pub use nalgebra::Vector3;

/// 3D vector representation using nalgebra
pub type Vector3d = Vector3<f32>;

/// Body axis along which a single motion command moves the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Index of this axis into a `Vector3d`
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// True for the axes that move the vehicle over the light map
    pub const fn is_lateral(self) -> bool {
        matches!(self, Axis::X | Axis::Y)
    }
}

/// Vehicle attitude as reported by the external state estimator, in degrees
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
}

impl Attitude {
    pub const fn new(roll: f32, pitch: f32) -> Self {
        Self { roll, pitch }
    }

    /// Tilt that accompanies acceleration along `axis`
    ///
    /// Forward/backward motion pitches the frame, sideways motion rolls it.
    /// Vertical motion has no associated tilt.
    pub fn tilt_for(&self, axis: Axis) -> Option<f32> {
        match axis {
            Axis::X => Some(self.pitch),
            Axis::Y => Some(self.roll),
            Axis::Z => None,
        }
    }
}

/// Commands carried over the light link
///
/// The discriminants are the 5-bit command payloads transmitted by the
/// ground projector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FlightCommand {
    Idle = 0,
    VlcFlightEnable = 1,
    VlcFlightDisable = 2,
    Up = 3,
    Down = 4,
    Left = 5,
    Right = 6,
    Forward = 7,
    Backward = 8,
    TakeOff = 9,
    Land = 10,
    MotionModelEnable = 11,
    MotionModelDisable = 12,
    LinkEnable = 13,
    LinkDisable = 14,
}

impl FlightCommand {
    /// Inertial axis the motion model integrates while this command executes
    pub const fn axis(self) -> Option<Axis> {
        match self {
            FlightCommand::Forward | FlightCommand::Backward => Some(Axis::X),
            FlightCommand::Left | FlightCommand::Right => Some(Axis::Y),
            FlightCommand::Up
            | FlightCommand::Down
            | FlightCommand::TakeOff
            | FlightCommand::Land => Some(Axis::Z),
            _ => None,
        }
    }
}

impl TryFrom<u8> for FlightCommand {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let command = match value {
            0 => FlightCommand::Idle,
            1 => FlightCommand::VlcFlightEnable,
            2 => FlightCommand::VlcFlightDisable,
            3 => FlightCommand::Up,
            4 => FlightCommand::Down,
            5 => FlightCommand::Left,
            6 => FlightCommand::Right,
            7 => FlightCommand::Forward,
            8 => FlightCommand::Backward,
            9 => FlightCommand::TakeOff,
            10 => FlightCommand::Land,
            11 => FlightCommand::MotionModelEnable,
            12 => FlightCommand::MotionModelDisable,
            13 => FlightCommand::LinkEnable,
            14 => FlightCommand::LinkDisable,
            other => return Err(other),
        };
        Ok(command)
    }
}

impl From<FlightCommand> for u8 {
    fn from(command: FlightCommand) -> Self {
        command as u8
    }
}
