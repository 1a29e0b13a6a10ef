use std::cell::RefCell;
use std::rc::Rc;

use hal::{Clock, ColorClassifier, Edge, EdgeSource};
use localization::ColorObservationModel;

use super::{SimClock, SimVehicle};

/// Data-ready line of one color sensor channel
///
/// Pulses low once per integration period.
pub struct DataReadyLine {
    clock: SimClock,
    integration_ms: u32,
    phase_ms: u32,
    last_pulse: Option<u32>,
}

impl DataReadyLine {
    pub fn new(clock: SimClock, integration_ms: u32, phase_ms: u32) -> Self {
        Self {
            clock,
            integration_ms,
            phase_ms,
            last_pulse: None,
        }
    }
}

impl EdgeSource for DataReadyLine {
    fn poll_edge(&mut self) -> Option<Edge> {
        let now = self.clock.now_ms();
        let period = now.saturating_sub(self.phase_ms) / self.integration_ms;
        if now < self.phase_ms || self.last_pulse == Some(period) {
            return None;
        }
        self.last_pulse = Some(period);
        Some(Edge::Falling)
    }
}

/// Classifier seeing the color the projector throws on the true pose
pub struct ColorCamera {
    vehicle: Rc<RefCell<SimVehicle>>,
    model: ColorObservationModel,
}

impl ColorCamera {
    pub fn new(vehicle: Rc<RefCell<SimVehicle>>, model: ColorObservationModel) -> Self {
        Self { vehicle, model }
    }
}

impl ColorClassifier for ColorCamera {
    fn classify(&mut self) -> u8 {
        self.model.expected_color(&self.vehicle.borrow().position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal::Vector3d;
    use localization::{ColorMap, FilterConfig};

    #[test]
    fn test_line_pulses_once_per_period() {
        let clock = SimClock::default();
        let mut line = DataReadyLine::new(clock.clone(), 100, 7);
        let mut pulses = 0;
        for _ in 0..1000 {
            if line.poll_edge() == Some(Edge::Falling) {
                pulses += 1;
            }
            clock.advance(1);
        }
        assert_eq!(pulses, 10);
    }

    #[test]
    fn test_camera_follows_vehicle() {
        let config = FilterConfig::default();
        let model =
            ColorObservationModel::new(ColorMap::default(), config.focal_length, config.cell_size);
        let start = Vector3d::new(5.0, 5.0, config.starting_depth);
        let vehicle = SimVehicle::new(start, 800, 1000).shared();
        let mut camera = ColorCamera::new(vehicle.clone(), model);
        assert_eq!(camera.classify(), model.expected_color(&start));

        vehicle.borrow_mut().position.x = -50.0;
        assert_eq!(camera.classify(), localization::AMBIENT_COLOR);
    }
}
