use thiserror::Error;

/// Errors reported when building tone tables or analyzers.
///
/// Only configuration problems are errors. Silence, noise and a ring buffer
/// that cannot supply a full frame all produce an unvoiced result instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("sample rate must be positive and finite, got {0}")]
    InvalidSampleRate(f32),
    #[error("base frequency must be positive and finite, got {0} Hz")]
    InvalidBaseFrequency(f64),
    #[error("half tone range {min}..={max} is empty")]
    EmptyToneRange { min: i32, max: i32 },
    #[error("highest analyzed tone ({frequency:.1} Hz) is not below the Nyquist frequency ({nyquist:.1} Hz)")]
    AboveNyquist { frequency: f64, nyquist: f64 },
    #[error("frame length {frame_len} cannot hold a period of {period:.1} samples")]
    FrameTooShort { frame_len: usize, period: f32 },
    #[error("step size must be in 1..={max}, got {step}")]
    InvalidStep { step: usize, max: usize },
    #[error("voicing ratio must be in (0, 1], got {0}")]
    InvalidVoicingRatio(f32),
    #[error("volume decay must be in (0, 1), got {0}")]
    InvalidVolumeDecay(f32),
    #[error("octave tolerance must be in [0, 1), got {0}")]
    InvalidOctaveTolerance(f32),
    #[error("peak count must be at least 1")]
    InvalidPeakCount,
    #[error("smoothing history must hold at least 1 tone")]
    InvalidSmoothing,
    #[error("unsupported FFT size {0}")]
    UnsupportedFftSize(usize),
    #[error("shared tone tables are in use with a different configuration")]
    TableConfigMismatch,
}

pub type Result<T> = core::result::Result<T, Error>;
