use nalgebra::Vector3;

use crate::color_map::AMBIENT_COLOR;

/// One hypothesis of the robot's pose
///
/// Positions are in map units (centimetres) with `z` the depth below the
/// projector. `new_position` is the staging slot of the two-phase resample:
/// every particle receives its new pose there before any particle moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current pose
    pub position: Vector3<f32>,

    /// Pose assigned by the running resample, committed afterwards
    pub new_position: Vector3<f32>,

    /// Score against the latest observation
    pub probability: u16,

    /// Color this pose should be receiving
    pub expected_color: u8,

    /// Reduced precision (x, y) kept for telemetry
    pub pos16: (i16, i16),
}

impl Particle {
    /// Create a particle resting at `position`
    pub fn at(position: Vector3<f32>) -> Self {
        let mut particle = Self {
            position,
            new_position: position,
            probability: 0,
            expected_color: AMBIENT_COLOR,
            pos16: (0, 0),
        };
        particle.refresh_pos16();
        particle
    }

    /// Move the particle to `position` immediately
    pub fn place(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.new_position = position;
        self.refresh_pos16();
    }

    /// Commit the staged pose
    pub fn commit(&mut self) {
        self.position = self.new_position;
        self.refresh_pos16();
    }

    fn refresh_pos16(&mut self) {
        // float to int casts saturate, NaN becomes 0
        self.pos16 = (self.position.x as i16, self.position.y as i16);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_staged_pose() {
        let mut particle = Particle::at(Vector3::new(1.0, 2.0, 200.0));
        particle.new_position = Vector3::new(30.7, -4.2, 190.0);
        assert_eq!(particle.position, Vector3::new(1.0, 2.0, 200.0));

        particle.commit();
        assert_eq!(particle.position, Vector3::new(30.7, -4.2, 190.0));
        assert_eq!(particle.pos16, (30, -4));
    }

    #[test]
    fn test_pos16_saturates() {
        let particle = Particle::at(Vector3::new(1e9, -1e9, 0.0));
        assert_eq!(particle.pos16, (i16::MAX, i16::MIN));
    }
}
