//! Real time tone tracking for singing games and other interactive audio,
//! suitable for running next to an audio capture callback.
//!
//! * [`akf`] - the half tone detector, based on fused autocorrelation (AKF) and
//!   average magnitude difference (AMDF) over a fixed table of tone periods.
//! * [`common`] - window functions, FFT based autocorrelation, the sample ring buffer
//!   and MIDI note helpers used by the detector.
//!
//! # Examples
//! ```
//! use micro_tone::akf::{AnalyzerOptions, TableConfig, ToneAnalyzer};
//!
//! let options = AnalyzerOptions {
//!     volume_threshold: 0.02,
//!     ..AnalyzerOptions::with_step(512)
//! };
//! let mut analyzer = ToneAnalyzer::from_options(&TableConfig::default(), options).unwrap();
//!
//! // Samples typically arrive on the audio thread
//! let sink = analyzer.sink();
//! let silence = [0i16; 4096];
//! std::thread::spawn(move || sink.input_i16(&silence)).join().unwrap();
//!
//! let half_tone_count = analyzer.half_tone_count();
//! let result = analyzer.get_note();
//! assert!(!result.is_voiced());
//! assert_eq!(result.weights.len(), half_tone_count);
//! ```

pub mod akf;
pub mod common;
mod error;

pub use error::{Error, Result};
