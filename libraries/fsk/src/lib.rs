//! # FSK - two-tone light link demodulator
//!
//! Recovers command bytes from intensity modulation on the projector light.
//! A sampling tick conditions analog readings and fills [`SampleBuffers`];
//! a lower priority consumer hands each full window to the [`Demodulator`],
//! which finds the dominant tone, votes over the last few windows and frames
//! the voted bits into bytes.

#![cfg_attr(not(test), no_std)]

pub mod buffers;
pub mod classifier;
pub mod conditioner;
pub mod config;
pub mod demodulator;
pub mod error;
pub mod fft;
pub mod history;
pub mod protocol;
pub mod tone;

pub use buffers::{BufferStatus, PushOutcome, SampleBuffers};
pub use classifier::FrequencyClassifier;
pub use conditioner::SampleConditioner;
pub use config::{bin_frequency, FskConfig, MAX_FFT_SIZE};
pub use demodulator::{Demodulator, LinkStats};
pub use error::{FrameError, FskError, FskResult};
pub use fft::fft_in_place;
pub use history::{majority_vote, FrequencyHistory};
pub use protocol::{
    check_parity, encode_frame, frame_address, frame_bits, frame_command, parity_bit,
    validate_frame, FrameOutcome, ProtocolDecoder, MAX_ADDRESS_BITS,
};
pub use tone::synthesize_tone;

/// Samples per FFT window
pub const FSK_SAMPLES: usize = 16;

/// Capacity of the frequency history
pub const FREQUENCY_HISTORY: usize = 5;

/// Demodulator with the link's default sizes
pub type LinkDemodulator = Demodulator<FSK_SAMPLES, FREQUENCY_HISTORY>;

/// Sample buffers with the link's default window
pub type LinkBuffers = SampleBuffers<FSK_SAMPLES>;
