//! Autocorrelation (AKF) and average magnitude difference (AMDF) at
//! fractional lags, fused into a single similarity score.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::FftAutocorr;
use crate::error::Result;

/// How the autocorrelation of a frame is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AkfMethod {
    /// Sum over the frame for every requested lag, interpolating
    /// the signal between neighbouring samples.
    Direct,
    /// Compute the autocorrelation for all integer lags once per frame
    /// using FFT and interpolate between neighbouring lags.
    Fft,
}

/// Splits a fractional lag into its integer part and the interpolation weights
/// of the samples at `lag` and `lag + 1`.
fn split_lag(lag: f32) -> (usize, f32, f32) {
    let whole = lag as usize;
    let high = lag - whole as f32;
    (whole, 1.0 - high, high)
}

/// Autocorrelation of `windowed` at a fractional lag, normalized by the frame length.
pub fn akf_at_lag(windowed: &[f32], lag: f32) -> f32 {
    let (whole, low, high) = split_lag(lag);
    let frame_len = windowed.len();
    if whole + 1 >= frame_len {
        return 0.0;
    }
    let mut accum = 0.0;
    for (i, xn) in windowed[..frame_len - whole - 1].iter().enumerate() {
        let xnt = windowed[i + whole] * low + windowed[i + whole + 1] * high;
        accum += xn * xnt;
    }
    accum / frame_len as f32
}

/// Average magnitude difference of `samples` at a fractional lag,
/// normalized by the number of summed terms.
pub fn amdf_at_lag(samples: &[f32], lag: f32) -> f32 {
    let (whole, low, high) = split_lag(lag);
    let frame_len = samples.len();
    if whole + 1 >= frame_len {
        return 0.0;
    }
    let term_count = frame_len - whole - 1;
    let mut accum = 0.0;
    for (i, xn) in samples[..term_count].iter().enumerate() {
        let xnt = samples[i + whole] * low + samples[i + whole + 1] * high;
        accum += (xn - xnt).abs();
    }
    accum / term_count as f32
}

/// Combines AKF and AMDF as `akf / (amdf + 1)` (Kobayashi and Shimamura).
/// Peaks where both agree on periodicity are reinforced, peaks where only
/// the autocorrelation is high are suppressed.
pub fn fused_score(akf: f32, amdf: f32) -> f32 {
    akf / (amdf + 1.0)
}

/// Evaluates AKF, AMDF and the fused score for the current frame.
///
/// AKF is computed on the windowed frame, AMDF on the raw frame since
/// windowing distorts absolute magnitude differences.
pub(crate) struct Similarity {
    frame_len: usize,
    /// Integer lag autocorrelation of the current frame, `AkfMethod::Fft` only.
    fft: Option<FftAutocorr>,
}

impl Similarity {
    /// `max_lag` is the longest lag, in samples, that will be requested.
    pub(crate) fn new(method: AkfMethod, frame_len: usize, max_lag: f32) -> Result<Self> {
        let fft = match method {
            AkfMethod::Direct => None,
            AkfMethod::Fft => {
                let lag_count = (max_lag as usize + 2).min(frame_len);
                Some(FftAutocorr::new(frame_len, lag_count)?)
            }
        };
        Ok(Similarity { frame_len, fft })
    }

    /// Prepares the evaluation of a new windowed frame.
    pub(crate) fn prepare(&mut self, windowed: &[f32]) -> Result<()> {
        debug_assert_eq!(windowed.len(), self.frame_len);
        if let Some(fft) = self.fft.as_mut() {
            fft.compute(windowed)?;
        }
        Ok(())
    }

    /// AKF of the prepared frame at `lag`.
    pub(crate) fn akf(&self, windowed: &[f32], lag: f32) -> f32 {
        match &self.fft {
            None => akf_at_lag(windowed, lag),
            Some(fft) => {
                let lags = fft.lags();
                let (whole, low, high) = split_lag(lag);
                if whole + 1 >= lags.len() {
                    return 0.0;
                }
                (lags[whole] * low + lags[whole + 1] * high) / self.frame_len as f32
            }
        }
    }

    /// The zero lag AKF, i.e the mean energy of the windowed frame.
    pub(crate) fn energy(&self, windowed: &[f32]) -> f32 {
        self.akf(windowed, 0.0)
    }

    /// The fused similarity score at `lag`.
    pub(crate) fn score(&self, samples: &[f32], windowed: &[f32], lag: f32) -> f32 {
        fused_score(self.akf(windowed, lag), amdf_at_lag(samples, lag))
    }
}
