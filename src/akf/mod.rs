//! Real time half tone tracking of monophonic input, e.g a singing voice,
//! by combining autocorrelation (AKF) with the average magnitude difference
//! function (AMDF).
//!
//! Instead of searching all lags, the detector only evaluates the periods
//! of the half tones in a configurable range, which is all a singing game
//! needs to know. For every tone, the AKF of the windowed frame and the AMDF
//! of the raw frame are fused into the weight `akf / (amdf + 1)`. The
//! strongest peaks of the resulting weight curve are then refined at 1/3
//! half tone offsets, and the winner is accepted only if its autocorrelation
//! is a large enough fraction of the frame energy.
//!
//! * Tables (tone periods and the analysis window) are computed once and
//!   shared by all analyzers in the process.
//! * No memory is allocated after construction.
//! * Samples can be fed from an audio thread using a [`SampleSink`] while
//!   another thread polls for results.
//! * The autocorrelation can optionally be computed using real-only FFT.
//!
//! # Examples
//! ```
//! use micro_tone::akf::ToneAnalyzer;
//!
//! // Analyze a new frame every 1024 samples
//! let mut analyzer = ToneAnalyzer::new(1024).unwrap();
//!
//! // A pure tone at 440 Hz, sampled at 44.1 kHz
//! let sample_rate = 44100.0;
//! let samples: Vec<f32> = (0..4096)
//!     .map(|i| 0.5 * (2.0 * core::f32::consts::PI * 440.0 * (i as f32) / sample_rate).sin())
//!     .collect();
//! analyzer.input(&samples);
//!
//! let tables = analyzer.tables().clone();
//! let result = analyzer.get_note();
//! match result.tone {
//!     Some(tone) => {
//!         // Tone indices count half tones from C2
//!         assert_eq!(tone, 33);
//!         println!("{} Hz, clarity {}", tables.frequency(tone as f32), result.clarity);
//!     }
//!     None => panic!("a pure tone should be voiced"),
//! }
//! ```

mod analyzer;
mod estimator;
mod options;
mod peaks;
mod result;
mod similarity;
mod smoothing;
mod tables;

pub use analyzer::{SampleSink, ToneAnalyzer};
pub use options::AnalyzerOptions;
pub use result::{ToneResult, UNVOICED};
pub use similarity::{akf_at_lag, amdf_at_lag, fused_score, AkfMethod};
pub use tables::{TableConfig, ToneTables, FINE_OFFSET, HALF_TONE_RATIO};

/// The number of analyzable half tones with the default tables.
pub fn default_half_tone_count() -> usize {
    TableConfig::default().half_tone_count()
}
