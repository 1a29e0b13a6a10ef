//! Fixed-size complex FFT dispatch

use microfft::complex::{
    cfft_1024, cfft_128, cfft_16, cfft_2, cfft_256, cfft_32, cfft_4, cfft_512, cfft_64, cfft_8,
};
use microfft::Complex32;

use crate::config::check_fft_size;
use crate::error::{FskError, FskResult};

type Transform<const N: usize> = fn(&mut [Complex32; N]) -> &mut [Complex32; N];

fn run<const N: usize>(data: &mut [Complex32], transform: Transform<N>) -> FskResult<()> {
    let size = data.len();
    let buffer = <&mut [Complex32; N]>::try_from(data)
        .map_err(|_| FskError::UnsupportedFftSize { size })?;
    transform(buffer);
    Ok(())
}

/// Forward FFT of `data` in place
///
/// `data.len()` must pass [`check_fft_size`].
pub fn fft_in_place(data: &mut [Complex32]) -> FskResult<()> {
    check_fft_size(data.len())?;
    match data.len() {
        2 => run(data, cfft_2),
        4 => run(data, cfft_4),
        8 => run(data, cfft_8),
        16 => run(data, cfft_16),
        32 => run(data, cfft_32),
        64 => run(data, cfft_64),
        128 => run(data, cfft_128),
        256 => run(data, cfft_256),
        512 => run(data, cfft_512),
        1024 => run(data, cfft_1024),
        size => Err(FskError::UnsupportedFftSize { size }),
    }
}
