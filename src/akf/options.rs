#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::similarity::AkfMethod;
use crate::error::{Error, Result};

/// Per analyzer calibration constants.
///
/// Several tunings of the voicing ratio (0.3 to 0.35) and peak count have
/// been used in practice, so none of them is baked into the algorithm.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnalyzerOptions {
    /// The number of samples between the starts of consecutive frames.
    pub step: usize,
    /// Frames whose peak level (over their second half) is below this are unvoiced.
    pub volume_threshold: f32,
    /// A frame is voiced only if the AKF at the detected period is at least
    /// this fraction of the frame energy (the AKF at lag 0).
    pub voicing_ratio: f32,
    /// The number of weight curve peaks considered for fine refinement.
    pub max_peaks: usize,
    /// The number of recent detections the reported tone is the median of.
    /// 1 disables smoothing.
    pub smoothing: usize,
    /// The factor applied to the reported volume when no new frame could be analyzed.
    pub volume_decay: f32,
    /// Peaks weaker than this fraction of the strongest peak are not refined.
    pub candidate_floor: f32,
    /// The winner is replaced by the tone an octave above when that scores
    /// within this fraction of the winner.
    pub octave_tolerance: f32,
    pub akf_method: AkfMethod,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            step: 1024,
            volume_threshold: 0.01,
            voicing_ratio: 0.33,
            max_peaks: 10,
            smoothing: 3,
            volume_decay: 0.85,
            candidate_floor: 1.0 / 3.0,
            octave_tolerance: 0.05,
            akf_method: AkfMethod::Direct,
        }
    }
}

impl AnalyzerOptions {
    pub fn with_step(step: usize) -> Self {
        AnalyzerOptions {
            step,
            ..AnalyzerOptions::default()
        }
    }

    /// `max_step` is the largest step that still lets frames overlap or touch.
    pub(crate) fn validate(&self, max_step: usize) -> Result<()> {
        if self.step == 0 || self.step > max_step {
            return Err(Error::InvalidStep {
                step: self.step,
                max: max_step,
            });
        }
        if !(self.voicing_ratio > 0.0 && self.voicing_ratio <= 1.0) {
            return Err(Error::InvalidVoicingRatio(self.voicing_ratio));
        }
        if !(self.volume_decay > 0.0 && self.volume_decay < 1.0) {
            return Err(Error::InvalidVolumeDecay(self.volume_decay));
        }
        if !(0.0..1.0).contains(&self.octave_tolerance) {
            return Err(Error::InvalidOctaveTolerance(self.octave_tolerance));
        }
        if self.max_peaks == 0 {
            return Err(Error::InvalidPeakCount);
        }
        if self.smoothing == 0 {
            return Err(Error::InvalidSmoothing);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        assert!(AnalyzerOptions::default().validate(2048).is_ok());
        assert_eq!(
            AnalyzerOptions::with_step(0).validate(2048),
            Err(Error::InvalidStep { step: 0, max: 2048 })
        );
        assert_eq!(
            AnalyzerOptions::with_step(4096).validate(2048),
            Err(Error::InvalidStep { step: 4096, max: 2048 })
        );
        let options = AnalyzerOptions {
            voicing_ratio: 0.0,
            ..AnalyzerOptions::default()
        };
        assert_eq!(options.validate(2048), Err(Error::InvalidVoicingRatio(0.0)));
        let options = AnalyzerOptions {
            smoothing: 0,
            ..AnalyzerOptions::default()
        };
        assert_eq!(options.validate(2048), Err(Error::InvalidSmoothing));
        let options = AnalyzerOptions {
            max_peaks: 0,
            ..AnalyzerOptions::default()
        };
        assert_eq!(options.validate(2048), Err(Error::InvalidPeakCount));
    }

    #[test]
    fn test_volume_decay_must_shrink() {
        for decay in [0.0_f32, 1.0, 1.2, -0.5].iter() {
            let options = AnalyzerOptions {
                volume_decay: *decay,
                ..AnalyzerOptions::default()
            };
            assert_eq!(options.validate(2048), Err(Error::InvalidVolumeDecay(*decay)));
        }
        let options = AnalyzerOptions {
            volume_decay: f32::NAN,
            ..AnalyzerOptions::default()
        };
        assert!(matches!(options.validate(2048), Err(Error::InvalidVolumeDecay(_))));
    }

    #[test]
    fn test_octave_tolerance_range() {
        let options = AnalyzerOptions {
            octave_tolerance: 0.0,
            ..AnalyzerOptions::default()
        };
        assert!(options.validate(2048).is_ok());
        let options = AnalyzerOptions {
            octave_tolerance: 1.0,
            ..AnalyzerOptions::default()
        };
        assert_eq!(options.validate(2048), Err(Error::InvalidOctaveTolerance(1.0)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_partial_options() {
        let options: AnalyzerOptions = serde_json::from_str(r#"{"step": 512, "akf_method": "Fft"}"#).unwrap();
        assert_eq!(options.step, 512);
        assert_eq!(options.akf_method, AkfMethod::Fft);
        assert_eq!(options.voicing_ratio, AnalyzerOptions::default().voicing_ratio);
    }
}
