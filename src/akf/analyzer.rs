use std::sync::Arc;

use super::estimator::{Estimate, ToneEstimator, Verdict};
use super::options::AnalyzerOptions;
use super::result::ToneResult;
use super::smoothing::ToneHistory;
use super::tables::{TableConfig, ToneTables};
use crate::common::RingBuffer;
use crate::error::Result;

const I16_SCALE: f32 = 1.0 / 32768.0;

fn insert_i16(buffer: &RingBuffer<f32>, samples: &[i16]) {
    buffer.insert_iter(samples.iter().map(|sample| f32::from(*sample) * I16_SCALE));
}

fn insert_pcm16_le(buffer: &RingBuffer<f32>, bytes: &[u8]) {
    buffer.insert_iter(
        bytes
            .chunks_exact(2)
            .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) * I16_SCALE),
    );
}

/// A handle for feeding samples to a [`ToneAnalyzer`] from another thread,
/// typically an audio capture callback.
#[derive(Clone)]
pub struct SampleSink {
    buffer: Arc<RingBuffer<f32>>,
}

impl SampleSink {
    /// Appends samples in the range [-1, 1].
    pub fn input(&self, samples: &[f32]) {
        self.buffer.insert(samples);
    }

    /// Appends signed 16 bit samples.
    pub fn input_i16(&self, samples: &[i16]) {
        insert_i16(&self.buffer, samples);
    }

    /// Appends signed 16 bit little endian PCM. A trailing odd byte is ignored.
    pub fn input_pcm16_le(&self, bytes: &[u8]) {
        insert_pcm16_le(&self.buffer, bytes);
    }
}

/// Tracks the tone of a monophonic input stream.
///
/// Samples are buffered as they arrive. Each call to
/// [`get_note`](ToneAnalyzer::get_note) analyzes every full frame that has
/// become available since the previous call, advancing by `step` samples
/// per frame, and reports the median of the most recent detections.
pub struct ToneAnalyzer {
    tables: Arc<ToneTables>,
    buffer: Arc<RingBuffer<f32>>,
    frame: Box<[f32]>,
    estimator: ToneEstimator,
    history: ToneHistory,
    options: AnalyzerOptions,
    result: ToneResult,
}

impl ToneAnalyzer {
    /// Creates an analyzer using the default tables and options,
    /// advancing `step` samples between frames.
    pub fn new(step: usize) -> Result<Self> {
        Self::from_options(&TableConfig::default(), AnalyzerOptions::with_step(step))
    }

    /// Creates an analyzer using the process-wide tables for `config`.
    pub fn from_options(config: &TableConfig, options: AnalyzerOptions) -> Result<Self> {
        Self::with_tables(ToneTables::shared(config)?, options)
    }

    /// Creates an analyzer using the given tables.
    pub fn with_tables(tables: Arc<ToneTables>, options: AnalyzerOptions) -> Result<Self> {
        let frame_len = tables.frame_len();
        options.validate(frame_len)?;
        let estimator = ToneEstimator::new(Arc::clone(&tables), &options)?;
        log::debug!(
            "tone analyzer: frame length {}, step {}, {:?} AKF",
            frame_len,
            options.step,
            options.akf_method
        );
        Ok(ToneAnalyzer {
            buffer: Arc::new(RingBuffer::new(2 * frame_len)),
            frame: vec![0.0; frame_len].into_boxed_slice(),
            estimator,
            history: ToneHistory::new(options.smoothing),
            result: ToneResult::new(tables.half_tone_count()),
            options,
            tables,
        })
    }

    /// Returns a handle that appends to this analyzer's sample buffer.
    pub fn sink(&self) -> SampleSink {
        SampleSink {
            buffer: Arc::clone(&self.buffer),
        }
    }

    /// Appends samples in the range [-1, 1]. If more samples arrive than can
    /// be buffered between calls to [`get_note`](Self::get_note), the oldest are dropped.
    pub fn input(&self, samples: &[f32]) {
        self.buffer.insert(samples);
    }

    /// Appends signed 16 bit samples.
    pub fn input_i16(&self, samples: &[i16]) {
        insert_i16(&self.buffer, samples);
    }

    /// Appends signed 16 bit little endian PCM. A trailing odd byte is ignored.
    pub fn input_pcm16_le(&self, bytes: &[u8]) {
        insert_pcm16_le(&self.buffer, bytes);
    }

    pub fn set_volume_threshold(&mut self, threshold: f32) {
        log::debug!("volume threshold {} -> {}", self.options.volume_threshold, threshold);
        self.options.volume_threshold = threshold;
    }

    pub fn volume_threshold(&self) -> f32 {
        self.options.volume_threshold
    }

    pub fn options(&self) -> &AnalyzerOptions {
        &self.options
    }

    /// The number of analyzable half tones, i.e the length of the result weights.
    pub fn half_tone_count(&self) -> usize {
        self.tables.half_tone_count()
    }

    pub fn tables(&self) -> &Arc<ToneTables> {
        &self.tables
    }

    /// The number of buffered samples not yet consumed by analysis.
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Analyzes all frames that became available since the last call and
    /// returns the updated result.
    ///
    /// If no frame was available the tone is left unchanged and the volume decays.
    pub fn get_note(&mut self) -> &ToneResult {
        let mut frame_count = 0;
        while self.buffer.read(&mut self.frame) {
            self.buffer.pop(self.options.step);
            let estimate = self
                .estimator
                .estimate(&self.frame, self.options.volume_threshold, &mut self.result.weights)
                .unwrap_or_else(|err| {
                    log::warn!("frame analysis failed: {}", err);
                    Estimate {
                        verdict: Verdict::NoPeak,
                        tone: None,
                        tone_exact: None,
                        volume: 0.0,
                        clarity: 0.0,
                    }
                });
            let volume = match estimate.verdict {
                Verdict::BelowThreshold => estimate.volume.max(self.result.max_volume * self.options.volume_decay),
                _ => estimate.volume,
            };
            self.history.push(estimate.tone);
            self.result.raw_tone = self.history.latest();
            self.result.tone_exact = estimate.tone_exact;
            self.result.clarity = estimate.clarity;
            self.result.max_volume = volume;
            frame_count += 1;
        }

        if frame_count > 0 {
            self.result.tone = self.history.median();
            log::trace!(
                "{} frames, tone {:?}, volume {:.4}",
                frame_count,
                self.result.tone,
                self.result.max_volume
            );
        } else {
            self.result.max_volume *= self.options.volume_decay;
        }
        self.result.frame_count = frame_count;
        &self.result
    }

    /// The result of the last call to [`get_note`](Self::get_note).
    pub fn result(&self) -> &ToneResult {
        &self.result
    }

    /// Drops all buffered samples and forgets previous detections.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.history.clear();
        self.result = ToneResult::new(self.tables.half_tone_count());
    }
}
