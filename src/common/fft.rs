use core::convert::TryInto;

use microfft::Complex32;

use crate::error::{Error, Result};

/// The largest FFT size supported by [`real_fft`].
pub const MAX_FFT_SIZE: usize = 4096;

macro_rules! rfft {
    ($buffer:expr, $fft_size:expr, $rfft:path) => {{
        let input = $buffer
            .try_into()
            .map_err(|_| Error::UnsupportedFftSize($fft_size))?;
        let spectrum: &mut [Complex32] = $rfft(input);
        spectrum
    }};
}

/// Performs an in-place real FFT, returning the packed spectrum of length
/// `buffer.len() / 2`. The real valued Nyquist bin is stored in the
/// imaginary part of the DC bin.
pub fn real_fft(buffer: &mut [f32]) -> Result<&mut [Complex32]> {
    let fft_size = buffer.len();
    let spectrum = match fft_size {
        8 => rfft!(buffer, fft_size, microfft::real::rfft_8),
        16 => rfft!(buffer, fft_size, microfft::real::rfft_16),
        32 => rfft!(buffer, fft_size, microfft::real::rfft_32),
        64 => rfft!(buffer, fft_size, microfft::real::rfft_64),
        128 => rfft!(buffer, fft_size, microfft::real::rfft_128),
        256 => rfft!(buffer, fft_size, microfft::real::rfft_256),
        512 => rfft!(buffer, fft_size, microfft::real::rfft_512),
        1024 => rfft!(buffer, fft_size, microfft::real::rfft_1024),
        2048 => rfft!(buffer, fft_size, microfft::real::rfft_2048),
        4096 => rfft!(buffer, fft_size, microfft::real::rfft_4096),
        _ => return Err(Error::UnsupportedFftSize(fft_size)),
    };
    Ok(spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_and_nyquist() {
        let mut buffer = [1.0_f32, -1.0, 1.0, -1.0, 1.0, -1.0, 1.0, -1.0];
        let spectrum = real_fft(&mut buffer).unwrap();
        assert_eq!(spectrum.len(), 4);
        // DC is zero, all energy sits in the Nyquist bin.
        assert!(spectrum[0].re.abs() <= 1e-5);
        assert!((spectrum[0].im - 8.0).abs() <= 1e-5);
    }

    #[test]
    fn test_unsupported_size() {
        let mut buffer = [0.0_f32; 12];
        assert_eq!(real_fft(&mut buffer).unwrap_err(), Error::UnsupportedFftSize(12));
    }
}
