use thiserror::Error;

/// Primary error type for the FSK crate
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum FskError {
    /// FFT length is not a supported power of two
    #[error("Unsupported FFT size {size}, expected a power of two between 2 and 1024")]
    UnsupportedFftSize {
        /// Requested number of samples per window
        size: usize,
    },

    /// Vote window does not fit the frequency history
    #[error("Invalid vote window {window} for a history of {capacity}")]
    InvalidWindow { window: usize, capacity: usize },

    /// Address field leaves no room for command bits or cannot hold the unit id
    #[error("Invalid address field: {bits} bits for unit id {unit_id}")]
    InvalidAddressWidth { bits: u8, unit_id: u8 },

    /// A sample arrived while both buffers were waiting for the consumer
    #[error("Sample buffer overrun, {dropped} samples dropped so far")]
    BufferOverrun { dropped: u32 },

    /// Bin frequencies at this rate do not fit the classifier's output
    #[error("Invalid sample rate {rate} Hz")]
    InvalidSampleRate { rate: u32 },

    /// Tone cannot be told apart by the classifier
    #[error("Tone {frequency} Hz does not match any classifier bin")]
    InvalidTone { frequency: u16 },
}

/// Why a complete byte was thrown away
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Parity bit does not match bits 1 to 7
    #[error("Parity mismatch in frame {byte:#010b}")]
    ParityMismatch { byte: u8 },

    /// Frame is addressed to another unit
    #[error("Frame {byte:#010b} addressed to unit {address}")]
    AddressMismatch { byte: u8, address: u8 },
}

/// Result type for FSK operations
pub type FskResult<T> = Result<T, FskError>;
