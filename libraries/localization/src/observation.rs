//! Color observation model

use libm::floorf;
use nalgebra::Vector3;

use crate::color_map::{ColorMap, AMBIENT_COLOR};

/// Size of one map cell seen from `depth` below the projector
///
/// The projected grid widens linearly with distance from the focal point.
pub fn cell_size_at_depth(depth: f32, focal_length: f32, cell_size: f32) -> f32 {
    (depth - focal_length) / focal_length * cell_size
}

/// Color a robot at `pose` should be receiving
///
/// `pose.x`/`pose.y` are converted to (column, row) by floor division with the
/// cell size at depth `pose.z`. Anything that does not land on the map,
/// including poses at or above the focal point, yields [`AMBIENT_COLOR`].
pub fn expected_color(
    map: &ColorMap,
    pose: &Vector3<f32>,
    focal_length: f32,
    cell_size: f32,
) -> u8 {
    let size = cell_size_at_depth(pose.z, focal_length, cell_size);
    if !(size > 0.0) || !size.is_finite() || !pose.x.is_finite() || !pose.y.is_finite() {
        return AMBIENT_COLOR;
    }

    // saturating casts push far-off poses out of range, never back onto the map
    let column = floorf(pose.x / size) as i32;
    let row = floorf(pose.y / size) as i32;
    map.lookup(column, row)
}

/// Observation model bound to one map and lens
#[derive(Debug, Clone, Copy)]
pub struct ColorObservationModel {
    map: ColorMap,
    focal_length: f32,
    cell_size: f32,
}

impl ColorObservationModel {
    pub fn new(map: ColorMap, focal_length: f32, cell_size: f32) -> Self {
        Self {
            map,
            focal_length,
            cell_size,
        }
    }

    pub fn expected_color(&self, pose: &Vector3<f32>) -> u8 {
        expected_color(&self.map, pose, self.focal_length, self.cell_size)
    }

    pub fn cell_size_at(&self, depth: f32) -> f32 {
        cell_size_at_depth(depth, self.focal_length, self.cell_size)
    }

    pub fn map(&self) -> &ColorMap {
        &self.map
    }
}
