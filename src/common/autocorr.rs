//! [Autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation) of real frames.

use super::fft::{real_fft, MAX_FFT_SIZE};
use crate::error::{Error, Result};

/// The smallest FFT size giving the first `lag_count` lags of the linear,
/// not circular, autocorrelation of `frame_len` samples.
pub fn autocorr_fft_size(frame_len: usize, lag_count: usize) -> usize {
    assert!(
        lag_count <= frame_len,
        "cannot compute {} lags of a {} sample frame",
        lag_count,
        frame_len
    );
    (frame_len + lag_count).saturating_sub(1).max(8).next_power_of_two()
}

/// Computes `sum(frame[j] * frame[j + lag])` for the first `lag_count`
/// integer lags of fixed length frames using real FFT.
///
/// All buffers are allocated up front, so [`compute`](FftAutocorr::compute)
/// can run on a real time thread.
pub struct FftAutocorr {
    frame_len: usize,
    lag_count: usize,
    /// Zero padded input, transformed in place. Holds the lags afterwards.
    signal: Box<[f32]>,
    power: Box<[f32]>,
}

impl FftAutocorr {
    pub fn new(frame_len: usize, lag_count: usize) -> Result<Self> {
        let fft_size = autocorr_fft_size(frame_len, lag_count);
        if fft_size > MAX_FFT_SIZE {
            return Err(Error::UnsupportedFftSize(fft_size));
        }
        Ok(FftAutocorr {
            frame_len,
            lag_count,
            signal: vec![0.0; fft_size].into_boxed_slice(),
            power: vec![0.0; fft_size].into_boxed_slice(),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.signal.len()
    }

    pub fn lag_count(&self) -> usize {
        self.lag_count
    }

    /// The lags computed by the last call to [`compute`](FftAutocorr::compute).
    pub fn lags(&self) -> &[f32] {
        &self.signal[..self.lag_count]
    }

    pub fn compute(&mut self, frame: &[f32]) -> Result<&[f32]> {
        assert_eq!(frame.len(), self.frame_len, "unexpected frame length");
        let (head, padding) = self.signal.split_at_mut(self.frame_len);
        head.copy_from_slice(frame);
        padding.iter_mut().for_each(|sample| *sample = 0.0);

        let fft_size = self.signal.len();
        let spectrum = real_fft(&mut self.signal)?;
        // |X|^2. The Nyquist bin is packed into the imaginary part of DC.
        self.power[0] = spectrum[0].re * spectrum[0].re;
        self.power[spectrum.len()] = spectrum[0].im * spectrum[0].im;
        for (bin, value) in spectrum.iter().enumerate().skip(1) {
            let power = value.norm_sqr();
            self.power[bin] = power;
            self.power[fft_size - bin] = power;
        }

        // The power spectrum is real and even, so its forward transform
        // equals the inverse transform scaled by the FFT size.
        let correlation = real_fft(&mut self.power)?;
        let scale = 1.0 / fft_size as f32;
        for (lag, value) in self.signal.iter_mut().zip(correlation.iter()).take(self.lag_count) {
            *lag = value.re * scale;
        }
        Ok(self.lags())
    }
}

/// Time domain autocorrelation for the first `result.len()` lags.
/// Quadratic in the frame length.
pub fn autocorr_conv(frame: &[f32], result: &mut [f32]) {
    assert!(result.len() <= frame.len(), "more lags than samples");
    for (lag, value) in result.iter_mut().enumerate() {
        *value = frame.iter().zip(&frame[lag..]).map(|(a, b)| a * b).sum();
    }
}
