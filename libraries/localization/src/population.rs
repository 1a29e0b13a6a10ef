//! Particle population and resampling

use log::{debug, info};
use nalgebra::Vector3;
use nanorand::{Rng, WyRand};

use crate::color_map::{ColorMap, AMBIENT_COLOR, MAP_SIZE};
use crate::noise::{gaussian_pair, uniform_range};
use crate::observation::ColorObservationModel;
use crate::particle::Particle;
use crate::{FilterConfig, LocalizationError, LocalizationResult, PARTICLE_COUNT};

/// Initial layout of the population
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistributionMode {
    /// Uniformly random over the map extent
    Uniform,

    /// Deterministic grid, cycling through every map cell
    Grid,
}

/// What a call to [`ParticlePopulation::score_and_resample`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleOutcome {
    /// Sentinel observation, the population was left untouched
    Skipped,

    /// Weighted resample; `matched` particles agreed with the observation
    Resampled { matched: usize },

    /// No particle agreed with the observation and the population was
    /// reset to the grid distribution
    Reset,
}

/// Fixed-size population of pose hypotheses
///
/// Every operation that moves particles (`score_and_resample`,
/// `apply_displacement`, `initialize`) touches the whole population; callers
/// sharing a population between tasks must hold one lock for the full call.
pub struct ParticlePopulation<const N: usize = PARTICLE_COUNT> {
    particles: [Particle; N],
    observation: ColorObservationModel,
    config: FilterConfig,
    rng: WyRand,
}

impl<const N: usize> ParticlePopulation<N> {
    /// Create a population laid out with `config.distribution`
    pub fn new(config: FilterConfig, map: ColorMap) -> LocalizationResult<Self> {
        config.validate()?;
        if N == 0 {
            return Err(LocalizationError::InvalidConfig {
                parameter: "particle count",
                reason: "must be non-zero",
            });
        }
        if N < MAP_SIZE * MAP_SIZE {
            debug!("{} particles cannot cover all {} map cells", N, MAP_SIZE * MAP_SIZE);
        }

        let observation = ColorObservationModel::new(map, config.focal_length, config.cell_size);
        let mut population = Self {
            particles: [Particle::at(Vector3::zeros()); N],
            observation,
            config,
            rng: WyRand::new_seed(config.seed),
        };
        population.initialize(config.distribution);
        Ok(population)
    }

    /// Lay the population out again from scratch
    pub fn initialize(&mut self, mode: DistributionMode) {
        match mode {
            DistributionMode::Uniform => {
                let extent = self.config.map_extent();
                let depth = self.config.starting_depth;
                for i in 0..N {
                    let x = uniform_range(&mut self.rng, 0.0, extent);
                    let y = uniform_range(&mut self.rng, 0.0, extent);
                    self.particles[i].place(Vector3::new(x, y, depth));
                }
            }
            DistributionMode::Grid => {
                for i in 0..N {
                    let pose = self.grid_pose(i);
                    self.particles[i].place(pose);
                }
            }
        }
        for particle in self.particles.iter_mut() {
            particle.probability = self.config.low_probability;
        }
        self.compute_expected_colors();
    }

    /// Canonical grid pose of particle `index`
    ///
    /// Particles walk the cells row by row; once every cell holds one
    /// particle the next lap starts again at the first cell, shifted along the
    /// cell diagonal so that no two particles share a pose.
    pub fn grid_pose(&self, index: usize) -> Vector3<f32> {
        let cells = MAP_SIZE * MAP_SIZE;
        let laps = N.div_ceil(cells);
        let cell = index % cells;
        let lap = index / cells;

        let size = self.config.starting_cell_size();
        let offset = (lap as f32 + 0.5) / laps as f32;
        let column = (cell % MAP_SIZE) as f32;
        let row = (cell / MAP_SIZE) as f32;

        Vector3::new(
            (column + offset) * size,
            (row + offset) * size,
            self.config.starting_depth,
        )
    }

    /// Refresh every particle's expected color from its current pose
    pub fn compute_expected_colors(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.expected_color = self.observation.expected_color(&particle.position);
        }
    }

    /// Score the population against `observed_color` and resample
    ///
    /// The ambient sentinel (or anything beyond it) is never an observation
    /// and leaves the population untouched.
    pub fn score_and_resample(&mut self, observed_color: u8) -> ResampleOutcome {
        if observed_color >= AMBIENT_COLOR {
            return ResampleOutcome::Skipped;
        }

        self.compute_expected_colors();
        let matched = self.score(observed_color);

        if matched == 0 {
            info!("No particle expects color {}, resetting to grid", observed_color);
            self.initialize(DistributionMode::Grid);
            return ResampleOutcome::Reset;
        }

        self.resample(observed_color, matched);
        debug!("Resampled on color {}: {} of {} matched", observed_color, matched, N);
        ResampleOutcome::Resampled { matched }
    }

    /// Give every particle its HIGH/LOW score, return how many matched
    fn score(&mut self, observed_color: u8) -> usize {
        let mut matched = 0;
        for particle in self.particles.iter_mut() {
            if particle.expected_color == observed_color {
                particle.probability = self.config.high_probability;
                matched += 1;
            } else {
                particle.probability = self.config.low_probability;
            }
        }
        matched
    }

    /// Stochastic universal sampling with carry over the unmatched slots
    ///
    /// Matched particles keep their pose. The remaining `draws` slots are
    /// filled by walking the population once with a counter: each candidate's
    /// mass is its probability scaled by `draws`, consecutive pointers are
    /// `total` apart, and the part of a candidate's mass not used by one
    /// pointer carries over to the next. The scaling keeps the walk exact in
    /// integers, so the pointers never run past the last candidate.
    fn resample(&mut self, observed_color: u8, matched: usize) {
        let draws = (N - matched) as u32;
        let total: u32 = self.particles.iter().map(|p| p.probability as u32).sum();

        let mut candidate = 0;
        let mut remaining = self.particles[0].probability as u32 * draws;
        let mut counter = self.rng.generate_range(1..=total);

        for slot in 0..N {
            if self.particles[slot].expected_color == observed_color {
                self.particles[slot].new_position = self.particles[slot].position;
                continue;
            }

            while counter > remaining && candidate + 1 < N {
                counter -= remaining;
                candidate += 1;
                remaining = self.particles[candidate].probability as u32 * draws;
            }
            remaining = remaining.saturating_sub(counter);
            counter = total;

            self.particles[slot].new_position = self.particles[candidate].position;
        }

        for particle in self.particles.iter_mut() {
            particle.commit();
        }
    }

    /// Move every particle by `delta` plus independent Gaussian spread
    ///
    /// The spread is drawn per particle on the horizontal axes only; depth
    /// moves by exactly `delta.z`.
    pub fn apply_displacement(&mut self, delta: Vector3<f32>, noise_std_dev: f32) {
        for particle in self.particles.iter_mut() {
            let (nx, ny) = gaussian_pair(&mut self.rng, 0.0, noise_std_dev);
            particle.place(particle.position + delta + Vector3::new(nx, ny, 0.0));
        }
    }

    /// Mean pose of the population
    pub fn mean_position(&self) -> Vector3<f32> {
        let sum = self
            .particles
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.position);
        sum / N as f32
    }

    pub fn particles(&self) -> &[Particle; N] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        N
    }

    pub fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn observation(&self) -> &ColorObservationModel {
        &self.observation
    }
}
