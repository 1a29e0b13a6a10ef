use log::{debug, info, trace};

use crate::classifier::FrequencyClassifier;
use crate::config::FskConfig;
use crate::error::{FskError, FskResult};
use crate::history::FrequencyHistory;
use crate::protocol::{FrameOutcome, ProtocolDecoder};

/// Counters kept by the demodulator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LinkStats {
    /// Windows classified
    pub windows: u32,

    /// Valid frames addressed to this unit
    pub frames_decoded: u32,

    /// Complete frames failing parity or address checks
    pub frames_discarded: u32,

    /// Bytes dropped for lack of a usable majority
    pub resets: u32,

    /// Partial bytes dropped by the timeout
    pub timeouts: u32,
}

/// Full receive chain from sample windows to command bytes
///
/// Every window is classified into the frequency history; once `window`
/// new entries have arrived they are voted on and the result goes to the
/// protocol decoder. The chain is owned by a single consumer, so the history
/// needs no locking.
pub struct Demodulator<const S: usize, const K: usize> {
    classifier: FrequencyClassifier<S>,
    history: FrequencyHistory<K>,
    decoder: ProtocolDecoder,
    window: usize,
    windows_since_vote: usize,
    stats: LinkStats,
}

impl<const S: usize, const K: usize> Demodulator<S, K> {
    pub fn new(config: &FskConfig) -> FskResult<Self> {
        config.validate(S)?;
        if config.window == 0 || config.window > K {
            return Err(FskError::InvalidWindow {
                window: config.window,
                capacity: K,
            });
        }

        Ok(Self {
            classifier: FrequencyClassifier::new(config.sample_rate)?,
            history: FrequencyHistory::new(),
            decoder: ProtocolDecoder::new(config, S),
            window: config.window,
            windows_since_vote: 0,
            stats: LinkStats::default(),
        })
    }

    /// Classify one full window and advance the decoder
    ///
    /// `now_tick` is the sampling tick count, used for the byte timeout.
    pub fn process_window(&mut self, samples: &[f32; S], now_tick: u32) -> FrameOutcome {
        let frequency = self.classifier.classify(samples);
        self.history.push(frequency);
        self.stats.windows = self.stats.windows.wrapping_add(1);
        trace!("Window {} peaks at {} Hz", self.stats.windows, frequency);

        self.windows_since_vote += 1;
        if self.windows_since_vote < self.window {
            return FrameOutcome::Pending;
        }
        self.windows_since_vote = 0;

        let majority = self.history.majority(self.window);
        let outcome = self.decoder.on_majority(majority, now_tick);
        match outcome {
            FrameOutcome::Command(command) => {
                self.stats.frames_decoded += 1;
                info!("Received command {}", command);
            }
            FrameOutcome::Discarded(_) => self.stats.frames_discarded += 1,
            FrameOutcome::Reset => self.stats.resets += 1,
            FrameOutcome::BitAccepted { bit_count } => {
                debug!("Bit {} accepted from {:?} Hz", bit_count, majority)
            }
            FrameOutcome::Pending => {}
        }
        outcome
    }

    /// Drop a stalled partial byte; returns whether one was dropped
    pub fn poll_timeout(&mut self, now_tick: u32) -> bool {
        let dropped = self.decoder.check_timeout(now_tick);
        if dropped {
            self.stats.timeouts += 1;
            debug!("Partial byte timed out at tick {}", now_tick);
        }
        dropped
    }

    pub fn stats(&self) -> LinkStats {
        self.stats
    }

    /// Frequency of the most recent window
    pub fn last_frequency(&self) -> Option<u16> {
        self.history.latest()
    }

    pub fn decoder(&self) -> &ProtocolDecoder {
        &self.decoder
    }
}
