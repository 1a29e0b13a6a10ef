//! Byte framing of the FSK link
//!
//! A frame is one byte sent LSB first:
//!
//! | bits | 0 | 1 ..= 7 - A | 8 - A ..= 7 |
//! |---|---|---|---|
//! | field | even parity over bits 1 to 7 | command | address (A bits) |

use log::{debug, trace};

use crate::config::FskConfig;
use crate::error::FrameError;

/// Even parity over bits 1 to 7 of `byte`
pub fn parity_bit(byte: u8) -> u8 {
    ((byte >> 1).count_ones() % 2) as u8
}

/// Whether bit 0 of `byte` matches its parity
pub fn check_parity(byte: u8) -> bool {
    parity_bit(byte) == byte & 1
}

/// Widest address field; the parity bit always stays
pub const MAX_ADDRESS_BITS: u8 = 7;

/// Address field of a frame
///
/// Widths above [`MAX_ADDRESS_BITS`] are treated as [`MAX_ADDRESS_BITS`].
pub fn frame_address(byte: u8, address_bits: u8) -> u8 {
    let bits = address_bits.min(MAX_ADDRESS_BITS) as u32;
    byte.checked_shr(8 - bits).unwrap_or(0)
}

/// Command field of a frame
pub fn frame_command(byte: u8, address_bits: u8) -> u8 {
    let bits = address_bits.min(MAX_ADDRESS_BITS) as u32;
    (byte << bits).checked_shr(bits + 1).unwrap_or(0)
}

/// Build a frame for `command` addressed to `address`, parity included
///
/// Bits that do not fit their field are dropped.
pub fn encode_frame(address: u8, command: u8, address_bits: u8) -> u8 {
    let address_bits = address_bits.min(MAX_ADDRESS_BITS);
    let command_bits = (MAX_ADDRESS_BITS - address_bits) as u32;
    let command_mask = ((1u16 << command_bits) - 1) as u8;
    let address_field = address.checked_shl(8 - address_bits as u32).unwrap_or(0);
    let byte = address_field | ((command & command_mask) << 1);
    byte | parity_bit(byte)
}

/// The eight bits of a frame in transmission order
pub fn frame_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..8).map(move |bit| (byte >> bit) & 1 == 1)
}

/// Check a complete frame and extract its command
pub fn validate_frame(byte: u8, unit_id: u8, address_bits: u8) -> Result<u8, FrameError> {
    if !check_parity(byte) {
        return Err(FrameError::ParityMismatch { byte });
    }
    let address = frame_address(byte, address_bits);
    if address != unit_id {
        return Err(FrameError::AddressMismatch { byte, address });
    }
    Ok(frame_command(byte, address_bits))
}

/// Result of feeding the decoder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not enough windows for a vote yet
    Pending,

    /// A bit was written; `bit_count` bits of the byte are known
    BitAccepted { bit_count: u8 },

    /// A complete valid frame carried this command
    Command(u8),

    /// A complete frame failed its checks and was dropped
    Discarded(FrameError),

    /// No usable majority, the byte in progress was dropped
    Reset,
}

/// Assembles voted bits into frames
#[derive(Debug, Clone, Copy)]
pub struct ProtocolDecoder {
    tone_0: u16,
    tone_1: u16,
    unit_id: u8,
    address_bits: u8,
    timeout_ticks: u32,
    byte: u8,
    bit_count: u8,
    last_bit_tick: u32,
}

impl ProtocolDecoder {
    pub fn new(config: &FskConfig, sample_count: usize) -> Self {
        Self {
            tone_0: config.tone_0,
            tone_1: config.tone_1,
            unit_id: config.unit_id,
            address_bits: config.address_bits,
            timeout_ticks: config.timeout_ticks(sample_count),
            byte: 0,
            bit_count: 0,
            last_bit_tick: 0,
        }
    }

    /// Feed the result of one vote
    pub fn on_majority(&mut self, majority: Option<u16>, now_tick: u32) -> FrameOutcome {
        let bit = match majority {
            Some(frequency) if frequency == self.tone_0 => 0,
            Some(frequency) if frequency == self.tone_1 => 1,
            other => {
                trace!("No bit in vote {:?}, dropping {} bits", other, self.bit_count);
                self.reset();
                return FrameOutcome::Reset;
            }
        };

        self.byte = (self.byte & !(1 << self.bit_count)) | (bit << self.bit_count);
        self.bit_count += 1;
        self.last_bit_tick = now_tick;

        if self.bit_count < 8 {
            return FrameOutcome::BitAccepted {
                bit_count: self.bit_count,
            };
        }

        let byte = self.byte;
        self.reset();
        match validate_frame(byte, self.unit_id, self.address_bits) {
            Ok(command) => FrameOutcome::Command(command),
            Err(error) => {
                debug!("{}", error);
                FrameOutcome::Discarded(error)
            }
        }
    }

    /// Drop a stalled byte once no bit arrived for too long
    ///
    /// Returns whether a partial byte was dropped.
    pub fn check_timeout(&mut self, now_tick: u32) -> bool {
        if now_tick.wrapping_sub(self.last_bit_tick) <= self.timeout_ticks {
            return false;
        }
        let stalled = self.bit_count > 0;
        self.reset();
        self.last_bit_tick = now_tick;
        stalled
    }

    fn reset(&mut self) {
        self.byte = 0;
        self.bit_count = 0;
    }

    /// Bits of the byte in progress
    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }

    /// Partial byte in progress
    pub fn partial_byte(&self) -> u8 {
        self.byte
    }
}
