use crate::error::{FskError, FskResult};

/// Largest supported FFT window
pub const MAX_FFT_SIZE: usize = 1024;

/// Configuration of the FSK link
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FskConfig {
    /// Sampling rate of the analog input (Hz)
    pub sample_rate: u32,

    /// Frequency carrying a 0 bit (Hz, as reported by the classifier)
    pub tone_0: u16,

    /// Frequency carrying a 1 bit (Hz, as reported by the classifier)
    pub tone_1: u16,

    /// Classified windows per transmitted bit; the vote runs over this many
    pub window: usize,

    /// Address this unit answers to
    pub unit_id: u8,

    /// Width of the address field at the top of each frame
    pub address_bits: u8,

    /// EWMA weight of the slow average used by the spike filter
    pub spike_alpha: f32,

    /// Samples further than this from the slow average are replaced by it
    pub spike_margin: f32,

    /// EWMA weight of the optional low-pass stage
    pub low_pass_alpha: Option<f32>,
}

impl Default for FskConfig {
    fn default() -> Self {
        Self {
            sample_rate: 1000,
            tone_0: 125,
            tone_1: 187,
            window: 5,
            unit_id: 0,
            address_bits: 2,
            spike_alpha: 0.015,
            spike_margin: 650.0,
            low_pass_alpha: None,
        }
    }
}

impl FskConfig {
    /// Check the configuration against the window length `sample_count`
    ///
    /// The vote window is checked against the history by the demodulator.
    pub fn validate(&self, sample_count: usize) -> FskResult<()> {
        check_fft_size(sample_count)?;

        // the highest classified bin must still be reported in whole hertz
        let nyquist = self.sample_rate as u64 / 2;
        if self.sample_rate == 0 || nyquist > u16::MAX as u64 {
            return Err(FskError::InvalidSampleRate {
                rate: self.sample_rate,
            });
        }

        if self.address_bits > 6 || (self.unit_id as u16) >> self.address_bits != 0 {
            return Err(FskError::InvalidAddressWidth {
                bits: self.address_bits,
                unit_id: self.unit_id,
            });
        }
        for tone in [self.tone_0, self.tone_1] {
            let reachable = (1..sample_count / 2)
                .any(|bin| bin_frequency(bin, self.sample_rate, sample_count) == tone);
            if !reachable {
                return Err(FskError::InvalidTone { frequency: tone });
            }
        }
        if self.tone_0 == self.tone_1 {
            return Err(FskError::InvalidTone {
                frequency: self.tone_1,
            });
        }
        Ok(())
    }

    /// Ticks without a new bit after which a partial byte is dropped
    pub fn timeout_ticks(&self, sample_count: usize) -> u32 {
        (sample_count * self.window * 2) as u32
    }
}

/// Check that `size` is a supported FFT length
pub fn check_fft_size(size: usize) -> FskResult<()> {
    if size < 2 || size > MAX_FFT_SIZE || !size.is_power_of_two() {
        return Err(FskError::UnsupportedFftSize { size });
    }
    Ok(())
}

/// Frequency reported for FFT bin `bin`, truncated to whole hertz
///
/// Saturates at `u16::MAX`.
pub fn bin_frequency(bin: usize, sample_rate: u32, sample_count: usize) -> u16 {
    let hertz = (bin as u64 * sample_rate as u64)
        .checked_div(sample_count as u64)
        .unwrap_or(0);
    u16::try_from(hertz).unwrap_or(u16::MAX)
}
