//! # Localization - color map particle filter
//!
//! Estimates the position of a small flying robot beneath a ceiling-mounted,
//! color-coded light projection.
//!
//! ## Pieces
//!
//! - [`ParticlePopulation`]: a fixed-size swarm of pose hypotheses, scored against
//!   the observed color and resampled with stochastic universal sampling
//! - [`ColorMap`] and [`ColorObservationModel`]: map a pose to the color the robot
//!   should be receiving there
//! - [`MotionModel`]: a single inertial accumulator whose displacement is broadcast
//!   to the swarm with Gaussian spread
//! - [`ResampleSchedule`]: decides when a new color observation warrants a resample
//!
//! The crate is `no_std` and allocation free. Callers own every instance and pass
//! them explicitly; nothing here is global.

#![cfg_attr(not(test), no_std)]

pub mod color_map;
pub mod error;
pub mod motion;
pub mod noise;
pub mod observation;
pub mod particle;
pub mod population;
pub mod schedule;

pub use color_map::{ColorMap, AMBIENT_COLOR, DEFAULT_COLOR_MAP, MAP_SIZE, NUMBER_OF_COLORS};
pub use error::{LocalizationError, LocalizationResult};
pub use motion::{CommandStage, MotionConfig, MotionEvent, MotionModel, MotionModelState};
pub use observation::{cell_size_at_depth, expected_color, ColorObservationModel};
pub use particle::Particle;
pub use population::{DistributionMode, ParticlePopulation, ResampleOutcome};
pub use schedule::ResampleSchedule;

/// Number of particles in the population
pub const PARTICLE_COUNT: usize = 150;

/// Configuration for the particle filter
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Focal length of the projection lens, in map units
    pub focal_length: f32,

    /// Cell size constant; a cell at depth `d` measures
    /// `(d - focal_length) / focal_length * cell_size`
    pub cell_size: f32,

    /// Depth below the projector the particles start at, in map units
    pub starting_depth: f32,

    /// Score given to a particle whose expected color matches the observation
    pub high_probability: u16,

    /// Score given to every other particle; never zero so no pose starves
    pub low_probability: u16,

    /// Resample even without a color change once this much time has passed
    pub resample_interval_ms: u32,

    /// How the population is laid out at start
    pub distribution: DistributionMode,

    /// Seed of the population's random number generator
    pub seed: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            focal_length: 9.0,
            cell_size: 0.75,
            starting_depth: 200.0,
            high_probability: 80,
            low_probability: 5,
            resample_interval_ms: 2000,
            distribution: DistributionMode::Grid,
            seed: 0x5eed_1234_abcd_0001,
        }
    }
}

impl FilterConfig {
    /// Check that the parameters describe a usable filter
    pub fn validate(&self) -> LocalizationResult<()> {
        if !(self.focal_length > 0.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "focal_length",
                reason: "must be positive",
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "cell_size",
                reason: "must be positive",
            });
        }
        if !(self.starting_depth > self.focal_length) {
            return Err(LocalizationError::InvalidConfig {
                parameter: "starting_depth",
                reason: "must lie beyond the focal length",
            });
        }
        if self.low_probability == 0 {
            return Err(LocalizationError::InvalidConfig {
                parameter: "low_probability",
                reason: "must be non-zero",
            });
        }
        if self.high_probability <= self.low_probability {
            return Err(LocalizationError::InvalidConfig {
                parameter: "high_probability",
                reason: "must exceed low_probability",
            });
        }
        Ok(())
    }

    /// Cell size at the starting depth
    pub fn starting_cell_size(&self) -> f32 {
        cell_size_at_depth(self.starting_depth, self.focal_length, self.cell_size)
    }

    /// Side length of the mapped area at the starting depth
    pub fn map_extent(&self) -> f32 {
        MAP_SIZE as f32 * self.starting_cell_size()
    }
}
