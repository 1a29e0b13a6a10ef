use fsk::{FrameOutcome, FskConfig, LinkDemodulator, LinkStats};
use log::trace;

use crate::{AutopilotResult, SharedContext};

/// Consumer of the FSK buffers; queues decoded commands for the executor
pub struct LinkTask {
    demodulator: LinkDemodulator,
}

impl LinkTask {
    pub fn new(config: &FskConfig) -> AutopilotResult<Self> {
        Ok(Self {
            demodulator: LinkDemodulator::new(config)?,
        })
    }

    /// Process every full window, then check the byte timeout
    ///
    /// Returns the number of commands queued.
    pub fn run(&mut self, context: &SharedContext) -> usize {
        let mut queued = 0;
        while let (Some(samples), ticks) = context.with_samples(|b| (b.take_full(), b.ticks())) {
            let outcome = self.demodulator.process_window(&samples, ticks);
            if let FrameOutcome::Command(command) = outcome {
                if context.queue_command(command) {
                    queued += 1;
                }
            }
        }

        let ticks = context.with_samples(|b| b.ticks());
        if self.demodulator.poll_timeout(ticks) {
            trace!("Link timeout at tick {}", ticks);
        }
        queued
    }

    pub fn stats(&self) -> LinkStats {
        self.demodulator.stats()
    }

    pub fn last_frequency(&self) -> Option<u16> {
        self.demodulator.last_frequency()
    }
}
