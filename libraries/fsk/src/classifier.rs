use num_complex::Complex;

use crate::config::{bin_frequency, check_fft_size};
use crate::error::FskResult;
use crate::fft::fft_in_place;

/// Finds the dominant frequency of a window of `S` real samples
#[derive(Debug, Clone, Copy)]
pub struct FrequencyClassifier<const S: usize> {
    sample_rate: u32,
}

impl<const S: usize> FrequencyClassifier<S> {
    pub fn new(sample_rate: u32) -> FskResult<Self> {
        check_fft_size(S)?;
        Ok(Self { sample_rate })
    }

    /// Peak frequency of `samples`, in whole hertz
    ///
    /// The DC bin and the mirrored upper half are ignored. Among equal
    /// magnitudes the lowest bin wins; a silent window reports 0.
    pub fn classify(&self, samples: &[f32; S]) -> u16 {
        let mut spectrum = [Complex::new(0.0f32, 0.0); S];
        for (bin, &sample) in spectrum.iter_mut().zip(samples.iter()) {
            bin.re = sample;
        }
        if fft_in_place(&mut spectrum).is_err() {
            return 0;
        }

        let mut peak_bin = 0;
        // rounding residue of a flat window stays below this
        let mut peak = f32::EPSILON;
        for (bin, value) in spectrum.iter().enumerate().take(S / 2).skip(1) {
            let magnitude = value.norm_sqr();
            if magnitude > peak {
                peak = magnitude;
                peak_bin = bin;
            }
        }
        self.bin_frequency(peak_bin)
    }

    pub fn bin_frequency(&self, bin: usize) -> u16 {
        bin_frequency(bin, self.sample_rate, S)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}
