//! Period and window tables shared by all analyzers in a process.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use lazy_static::lazy_static;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::common::{freq_to_midi_note, WindowFunction};
use crate::error::{Error, Result};

/// 2^(1/12), the frequency ratio between two adjacent half tones.
pub const HALF_TONE_RATIO: f64 = 1.059_463_094_359_295_3;

/// Fine table entries sit this many half tones below and above each tone.
/// Thirds are used since halves would be ambiguous between neighbours.
pub const FINE_OFFSET: f64 = 1.0 / 3.0;

/// Parameters fixing the contents of the shared tables.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TableConfig {
    /// The audio sample rate in Hz.
    pub sample_rate: f32,
    /// The frequency of half tone 0 in Hz.
    pub base_frequency: f64,
    /// The lowest analyzable half tone, relative to `base_frequency`.
    pub min_half_tone: i32,
    /// The highest analyzable half tone, relative to `base_frequency`.
    pub max_half_tone: i32,
    /// Half tones above the range that are probed when the lag 0 peak
    /// reaches into the analyzable range.
    pub extra_half_tones: usize,
    /// The number of samples in an analysis frame.
    pub frame_len: usize,
    /// The window applied to frames before autocorrelation.
    pub window: WindowFunction,
}

impl Default for TableConfig {
    fn default() -> Self {
        TableConfig {
            sample_rate: 44100.0,
            base_frequency: 65.4064, // C2
            min_half_tone: 0,
            max_half_tone: 56,
            extra_half_tones: 4,
            frame_len: 2048,
            window: WindowFunction::Hamming,
        }
    }
}

impl TableConfig {
    /// The number of analyzable half tones, i.e the length of weight arrays.
    pub fn half_tone_count(&self) -> usize {
        (self.max_half_tone - self.min_half_tone + 1).max(0) as usize
    }

    /// The frequency of `half_tone` (relative to `base_frequency`, possibly fractional).
    fn frequency(&self, half_tone: f64) -> f64 {
        self.base_frequency * HALF_TONE_RATIO.powf(half_tone)
    }

    fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if !(self.base_frequency.is_finite() && self.base_frequency > 0.0) {
            return Err(Error::InvalidBaseFrequency(self.base_frequency));
        }
        if self.max_half_tone < self.min_half_tone {
            return Err(Error::EmptyToneRange {
                min: self.min_half_tone,
                max: self.max_half_tone,
            });
        }

        let highest_tone = f64::from(self.max_half_tone) + self.extra_half_tones as f64 + FINE_OFFSET;
        let frequency = self.frequency(highest_tone);
        let nyquist = 0.5 * f64::from(self.sample_rate);
        if frequency >= nyquist {
            return Err(Error::AboveNyquist { frequency, nyquist });
        }

        // The longest lag must leave at least one interpolated term.
        let period = (f64::from(self.sample_rate) / self.frequency(f64::from(self.min_half_tone) - FINE_OFFSET)) as f32;
        if period as usize + 2 > self.frame_len {
            return Err(Error::FrameTooShort {
                frame_len: self.frame_len,
                period,
            });
        }
        Ok(())
    }
}

/// Precomputed samples-per-period values for every analyzable half tone
/// (plus the extra probing tones) and the analysis window coefficients.
///
/// Tone indices used by the tables are relative to `min_half_tone`, so index
/// 0 is the lowest analyzable tone.
#[derive(Debug)]
pub struct ToneTables {
    config: TableConfig,
    samples_per_period: Box<[f32]>,
    /// Two entries per tone: 1/3 half tone below, 1/3 half tone above.
    samples_per_period_fine: Box<[f32]>,
    window: Box<[f32]>,
}

impl ToneTables {
    /// Builds a private set of tables. Most callers want [`ToneTables::shared`].
    pub fn build(config: TableConfig) -> Result<Self> {
        config.validate()?;
        let tone_count = config.half_tone_count() + config.extra_half_tones;
        let mut samples_per_period = Vec::with_capacity(tone_count);
        let mut samples_per_period_fine = Vec::with_capacity(2 * tone_count);
        let sample_rate = f64::from(config.sample_rate);
        for index in 0..tone_count {
            let half_tone = f64::from(config.min_half_tone) + index as f64;
            samples_per_period.push((sample_rate / config.frequency(half_tone)) as f32);
            samples_per_period_fine.push((sample_rate / config.frequency(half_tone - FINE_OFFSET)) as f32);
            samples_per_period_fine.push((sample_rate / config.frequency(half_tone + FINE_OFFSET)) as f32);
        }
        let window = config.window.table(config.frame_len);
        log::debug!(
            "built tone tables: {} half tones from {:.2} Hz, frame length {}",
            config.half_tone_count(),
            config.frequency(f64::from(config.min_half_tone)),
            config.frame_len
        );
        Ok(ToneTables {
            config,
            samples_per_period: samples_per_period.into_boxed_slice(),
            samples_per_period_fine: samples_per_period_fine.into_boxed_slice(),
            window,
        })
    }

    /// Returns the process-wide tables for `config`, building them if no
    /// analyzer currently holds them. The tables are freed when the last
    /// handle is dropped.
    ///
    /// Fails with [`Error::TableConfigMismatch`] if tables built from a
    /// different configuration are still alive.
    pub fn shared(config: &TableConfig) -> Result<Arc<Self>> {
        let mut registry = SHARED_TABLES.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(tables) = registry.upgrade() {
            if tables.config == *config {
                return Ok(tables);
            }
            log::warn!(
                "shared tone tables requested for {:?} while tables for {:?} are alive",
                config,
                tables.config
            );
            return Err(Error::TableConfigMismatch);
        }
        let tables = Arc::new(ToneTables::build(config.clone())?);
        *registry = Arc::downgrade(&tables);
        Ok(tables)
    }

    /// The number of handles to the process-wide tables that are alive.
    pub fn shared_count() -> usize {
        SHARED_TABLES
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .strong_count()
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The number of analyzable half tones.
    pub fn half_tone_count(&self) -> usize {
        self.config.half_tone_count()
    }

    /// The number of tones with period entries, including the extra probing tones.
    pub fn probe_tone_count(&self) -> usize {
        self.samples_per_period.len()
    }

    pub fn frame_len(&self) -> usize {
        self.config.frame_len
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// The period in samples of tone `tone`.
    pub fn samples_per_period(&self, tone: usize) -> f32 {
        self.samples_per_period[tone]
    }

    /// The period in samples of tone `tone` shifted by 1/3 half tone,
    /// downwards if `above` is false.
    pub fn samples_per_period_fine(&self, tone: usize, above: bool) -> f32 {
        self.samples_per_period_fine[2 * tone + above as usize]
    }

    /// The longest period in any table, in samples.
    pub fn max_samples_per_period(&self) -> f32 {
        self.samples_per_period_fine[0]
    }

    /// The frequency in Hz of a (possibly fractional) tone index.
    pub fn frequency(&self, tone: f32) -> f32 {
        self.config
            .frequency(f64::from(self.config.min_half_tone) + f64::from(tone)) as f32
    }

    /// The fractional tone index of `frequency`. The inverse of [`frequency`](Self::frequency).
    pub fn tone_from_frequency(&self, frequency: f32) -> f32 {
        let half_tones = 12.0 * (f64::from(frequency) / self.config.base_frequency).log2();
        (half_tones - f64::from(self.config.min_half_tone)) as f32
    }

    /// The MIDI note number of a (possibly fractional) tone index.
    pub fn midi_note(&self, tone: f32) -> f32 {
        freq_to_midi_note(self.frequency(tone))
    }
}

impl Drop for ToneTables {
    fn drop(&mut self) {
        log::debug!("released tone tables for {} half tones", self.half_tone_count());
    }
}

lazy_static! {
    static ref SHARED_TABLES: Mutex<Weak<ToneTables>> = Mutex::new(Weak::new());
}
