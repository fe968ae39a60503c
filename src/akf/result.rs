#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::tables::ToneTables;
use crate::common::level_to_db;

/// The tone index reported by [`ToneResult::tone_index`] for unvoiced results.
pub const UNVOICED: i32 = -1;

/// The outcome of the most recent call to [`get_note`](super::ToneAnalyzer::get_note).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ToneResult {
    /// The reported (smoothed) tone index, relative to the lowest analyzable
    /// half tone. `None` if unvoiced.
    pub tone: Option<usize>,
    /// The tone detected in the last analyzed frame, before smoothing.
    pub raw_tone: Option<usize>,
    /// The sub half tone estimate of `raw_tone` after fine refinement.
    pub tone_exact: Option<f32>,
    /// The peak absolute sample level. Decays while no frame can be analyzed.
    pub max_volume: f32,
    /// The AKF at the detected period divided by the frame energy.
    /// Compared against the voicing ratio.
    pub clarity: f32,
    /// One fused similarity score per analyzable half tone.
    pub weights: Box<[f32]>,
    /// The number of frames analyzed by the last call.
    pub frame_count: usize,
}

impl ToneResult {
    pub(crate) fn new(half_tone_count: usize) -> Self {
        ToneResult {
            tone: None,
            raw_tone: None,
            tone_exact: None,
            max_volume: 0.0,
            clarity: 0.0,
            weights: vec![0.0; half_tone_count].into_boxed_slice(),
            frame_count: 0,
        }
    }

    pub fn is_voiced(&self) -> bool {
        self.tone.is_some()
    }

    /// The reported tone as an integer, [`UNVOICED`] if there is none.
    pub fn tone_index(&self) -> i32 {
        self.tone.map_or(UNVOICED, |tone| tone as i32)
    }

    /// `max_volume` in dB relative to 1.
    pub fn max_volume_db(&self) -> f32 {
        level_to_db(self.max_volume)
    }

    /// The MIDI note number of the reported tone.
    pub fn midi_note(&self, tables: &ToneTables) -> Option<f32> {
        self.tone.map(|tone| tables.midi_note(tone as f32))
    }

    /// The frequency in Hz of the reported tone.
    pub fn frequency(&self, tables: &ToneTables) -> Option<f32> {
        self.tone.map(|tone| tables.frequency(tone as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::F32ArrayExt;

    #[test]
    fn test_volume_db_matches_peak_level_db() {
        let mut result = ToneResult::new(4);
        assert_eq!(result.max_volume_db(), f32::NEG_INFINITY);
        assert_eq!(result.tone_index(), UNVOICED);

        result.max_volume = 0.5;
        assert!((result.max_volume_db() + 6.0206).abs() < 0.01);
        assert_eq!(result.max_volume_db(), [0.1_f32, -0.5].peak_level_db());
    }
}
