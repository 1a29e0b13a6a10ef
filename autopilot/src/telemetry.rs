use fsk::LinkStats;
use hal::Vector3d;
use localization::{CommandStage, MotionModelState, PARTICLE_COUNT};

use crate::SharedContext;

/// Read-only snapshot of the VLC subsystem for logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Telemetry {
    /// Particle `(x, y)` in whole map units
    pub particles: [(i16, i16); PARTICLE_COUNT],
    pub mean_position: Vector3d,
    pub raw_acceleration: Vector3d,
    pub filtered_acceleration: Vector3d,
    pub velocity: Vector3d,
    /// Displacement accumulated since the last flush, in metres
    pub delta: Vector3d,
    pub detected_color: u8,
    pub calibrated: bool,
    pub stage: CommandStage,
    pub dropped_samples: u32,
    pub link: LinkStats,
    pub pending_commands: usize,
}

impl Telemetry {
    /// Copy the current state out of the shared context and task states
    ///
    /// Takes each lock once and changes nothing.
    pub fn capture(
        context: &SharedContext,
        motion: &MotionModelState,
        detected_color: u8,
        link: LinkStats,
    ) -> Self {
        let (particles, mean_position) = context.with_population(|population| {
            let mut particles = [(0, 0); PARTICLE_COUNT];
            for (slot, particle) in particles.iter_mut().zip(population.particles().iter()) {
                *slot = particle.pos16;
            }
            (particles, population.mean_position())
        });
        let dropped_samples = context.with_samples(|samples| samples.dropped());

        Self {
            particles,
            mean_position,
            raw_acceleration: motion.raw_acceleration,
            filtered_acceleration: motion.filtered_acceleration,
            velocity: motion.velocity,
            delta: motion.delta,
            detected_color,
            calibrated: motion.calibrated,
            stage: motion.stage,
            dropped_samples,
            link,
            pending_commands: context.pending_commands(),
        }
    }
}
