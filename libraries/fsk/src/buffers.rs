//! Double sample buffers between the sampling tick and the consumer

use log::warn;

use crate::error::FskError;

/// Fill state of one sample buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferStatus {
    Empty,
    Filling,
    Full,
}

/// Result of storing one sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Sample stored, the buffer is still filling
    Stored,

    /// Sample stored and `buffer` is now full; writes moved to the other one
    Filled { buffer: usize },

    /// Both buffers wait for the consumer, the sample was dropped
    Dropped,
}

#[derive(Debug, Clone, Copy)]
struct SampleBuffer<const S: usize> {
    samples: [f32; S],
    entries: usize,
    status: BufferStatus,
}

impl<const S: usize> SampleBuffer<S> {
    const fn new() -> Self {
        Self {
            samples: [0.0; S],
            entries: 0,
            status: BufferStatus::Empty,
        }
    }

    fn clear(&mut self) {
        self.entries = 0;
        self.status = BufferStatus::Empty;
    }
}

/// Two buffers of `S` samples, one written while the other is consumed
///
/// Exactly one buffer is the write target. A full buffer is never written
/// again before the consumer has taken it.
pub struct SampleBuffers<const S: usize> {
    buffers: [SampleBuffer<S>; 2],
    current: usize,
    ticks: u32,
    dropped: u32,
}

impl<const S: usize> SampleBuffers<S> {
    pub const fn new() -> Self {
        Self {
            buffers: [SampleBuffer::new(), SampleBuffer::new()],
            current: 0,
            ticks: 0,
            dropped: 0,
        }
    }

    /// Store one sample in the current write target
    pub fn push(&mut self, value: f32) -> PushOutcome {
        self.ticks = self.ticks.wrapping_add(1);

        let current = self.current;
        let buffer = &mut self.buffers[current];
        if buffer.status == BufferStatus::Full {
            self.dropped = self.dropped.wrapping_add(1);
            warn!("{}", FskError::BufferOverrun { dropped: self.dropped });
            return PushOutcome::Dropped;
        }

        buffer.samples[buffer.entries] = value;
        buffer.entries += 1;
        if buffer.entries < S {
            buffer.status = BufferStatus::Filling;
            return PushOutcome::Stored;
        }

        buffer.status = BufferStatus::Full;
        self.current = 1 - current;
        PushOutcome::Filled { buffer: current }
    }

    /// Count a sampling tick that produced no sample
    pub fn skip_tick(&mut self) {
        self.ticks = self.ticks.wrapping_add(1);
    }

    /// Copy out a full buffer and release it for writing
    ///
    /// With both buffers full the older one, which is also the blocked write
    /// target, goes first.
    pub fn take_full(&mut self) -> Option<[f32; S]> {
        let index = if self.buffers[self.current].status == BufferStatus::Full {
            self.current
        } else if self.buffers[1 - self.current].status == BufferStatus::Full {
            1 - self.current
        } else {
            return None;
        };

        let samples = self.buffers[index].samples;
        self.buffers[index].clear();
        Some(samples)
    }

    pub fn status(&self, buffer: usize) -> BufferStatus {
        self.buffers[buffer].status
    }

    pub fn entries(&self, buffer: usize) -> usize {
        self.buffers[buffer].entries
    }

    /// Index of the write target
    pub fn current(&self) -> usize {
        self.current
    }

    /// Sampling ticks seen so far, stored or not
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Samples dropped because the consumer fell behind
    pub fn dropped(&self) -> u32 {
        self.dropped
    }
}

impl<const S: usize> Default for SampleBuffers<S> {
    fn default() -> Self {
        Self::new()
    }
}
