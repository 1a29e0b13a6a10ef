//! State shared between the VLC tasks

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use fsk::LinkBuffers;
use localization::ParticlePopulation;
use log::warn;

use crate::{AutopilotResult, VehicleConfig};

/// Maximum number of decoded commands waiting for the executor
pub const COMMAND_QUEUE_SIZE: usize = 20;

/// Everything more than one task touches
///
/// The population is mutated by the motion flush and by resampling, the
/// sample buffers by the sampling tick and the link consumer. Each sits
/// behind its own critical-section mutex, held only for the one operation.
pub struct SharedContext {
    population: Mutex<CriticalSectionRawMutex, RefCell<ParticlePopulation>>,
    samples: Mutex<CriticalSectionRawMutex, RefCell<LinkBuffers>>,
    commands: Channel<CriticalSectionRawMutex, u8, COMMAND_QUEUE_SIZE>,
}

impl SharedContext {
    pub fn new(config: &VehicleConfig) -> AutopilotResult<Self> {
        config.validate()?;
        let population = ParticlePopulation::new(config.filter, config.color_map)?;
        Ok(Self {
            population: Mutex::new(RefCell::new(population)),
            samples: Mutex::new(RefCell::new(LinkBuffers::new())),
            commands: Channel::new(),
        })
    }

    /// Run `f` with exclusive access to the particle population
    pub fn with_population<R>(&self, f: impl FnOnce(&mut ParticlePopulation) -> R) -> R {
        self.population.lock(|population| f(&mut population.borrow_mut()))
    }

    /// Run `f` with exclusive access to the FSK sample buffers
    pub fn with_samples<R>(&self, f: impl FnOnce(&mut LinkBuffers) -> R) -> R {
        self.samples.lock(|samples| f(&mut samples.borrow_mut()))
    }

    /// Hand a decoded command byte to the executor
    ///
    /// A full queue drops the new byte.
    pub fn queue_command(&self, command: u8) -> bool {
        match self.commands.try_send(command) {
            Ok(()) => true,
            Err(_) => {
                warn!("Command queue full, dropping command {}", command);
                false
            }
        }
    }

    /// Next decoded command byte, if any
    pub fn next_command(&self) -> Option<u8> {
        self.commands.try_receive().ok()
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use localization::PARTICLE_COUNT;

    #[test]
    fn test_command_queue_drops_when_full() {
        let context = SharedContext::new(&VehicleConfig::default()).expect("valid configuration");
        for command in 0..COMMAND_QUEUE_SIZE as u8 {
            assert!(context.queue_command(command));
        }
        assert!(!context.queue_command(99));
        assert_eq!(context.pending_commands(), COMMAND_QUEUE_SIZE);

        assert_eq!(context.next_command(), Some(0));
        assert!(context.queue_command(7));
        let mut last = None;
        while let Some(command) = context.next_command() {
            last = Some(command);
        }
        assert_eq!(last, Some(7));
    }

    #[test]
    fn test_population_is_shared() {
        let context = SharedContext::new(&VehicleConfig::default()).expect("valid configuration");
        assert_eq!(context.with_population(|p| p.len()), PARTICLE_COUNT);
        context.with_samples(|buffers| buffers.push(1.0));
        assert_eq!(context.with_samples(|buffers| buffers.entries(0)), 1);
    }
}
