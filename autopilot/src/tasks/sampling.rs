use fsk::{FskConfig, PushOutcome, SampleConditioner};
use hal::AnalogInput;

use crate::SharedContext;

/// Highest priority task: one analog sample per tick into the FSK buffers
pub struct SamplingTask<A> {
    input: A,
    conditioner: SampleConditioner,
}

impl<A: AnalogInput> SamplingTask<A> {
    pub fn new(input: A, config: &FskConfig) -> Self {
        Self {
            input,
            conditioner: SampleConditioner::new(config),
        }
    }

    /// Take one sample
    ///
    /// The buffer lock covers only the store; conditioning runs outside it.
    /// A missed conversion still counts as a tick for the link timeout.
    pub fn tick(&mut self, context: &SharedContext) -> Option<PushOutcome> {
        match self.input.read() {
            Some(raw) => {
                let value = self.conditioner.condition(raw);
                Some(context.with_samples(|buffers| buffers.push(value)))
            }
            None => {
                context.with_samples(|buffers| buffers.skip_tick());
                None
            }
        }
    }
}
