//! Simple collaborators for the task tests

use core::cell::Cell;

use hal::{
    AnalogInput, Attitude, ColorClassifier, Edge, EdgeSource, InertialSensor, Vector3d,
};

/// Light sensor reading a tone whose frequency the test can change
pub struct ToneLight<'a> {
    pub frequency: &'a Cell<f32>,
    pub tick: u32,
}

impl AnalogInput for ToneLight<'_> {
    fn read(&mut self) -> Option<f32> {
        let mut sample = [0.0f32; 1];
        fsk::synthesize_tone(self.frequency.get(), 1000, self.tick, &mut sample);
        self.tick += 1;
        Some(1500.0 + 1000.0 * sample[0])
    }
}

/// Light sensor that never has a conversion ready
pub struct DeadLight;

impl AnalogInput for DeadLight {
    fn read(&mut self) -> Option<f32> {
        None
    }
}

#[derive(Clone, Copy)]
pub struct FakeImu {
    pub acceleration: Option<Vector3d>,
    pub attitude: Attitude,
    pub stationary: bool,
}

impl FakeImu {
    pub fn resting() -> Self {
        Self {
            acceleration: Some(Vector3d::new(0.0, 0.0, 9.81)),
            attitude: Attitude::new(0.0, 0.0),
            stationary: true,
        }
    }
}

impl InertialSensor for FakeImu {
    fn acceleration(&mut self) -> Option<Vector3d> {
        self.acceleration
    }

    fn attitude(&self) -> Attitude {
        self.attitude
    }

    fn is_stationary(&self) -> bool {
        self.stationary
    }
}

/// Data-ready line firing on every poll
pub struct AlwaysReady;

impl EdgeSource for AlwaysReady {
    fn poll_edge(&mut self) -> Option<Edge> {
        Some(Edge::Falling)
    }
}

/// Classifier reporting whatever color is set
pub struct SetColor(pub u8);

impl ColorClassifier for SetColor {
    fn classify(&mut self) -> u8 {
        self.0
    }
}
