use std::sync::Arc;

use super::options::AnalyzerOptions;
use super::peaks::PeakList;
use super::similarity::Similarity;
use super::tables::{ToneTables, FINE_OFFSET};
use crate::common::{apply_window, F32ArrayExt};
use crate::error::Result;

/// Weights below this are treated as no peak at all.
const MIN_PEAK_WEIGHT: f32 = 1e-5;

const OCTAVE: usize = 12;

/// The period of `tone`, optionally shifted by 1/3 half tone (`Some(true)` is above).
fn period(tables: &ToneTables, tone: usize, fine: Option<bool>) -> f32 {
    match fine {
        None => tables.samples_per_period(tone),
        Some(above) => tables.samples_per_period_fine(tone, above),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// The frame peak level is below the volume threshold.
    BelowThreshold,
    /// The weight curve has no usable peak.
    NoPeak,
    /// The best candidate explains too little of the frame energy.
    Aperiodic,
    Voiced,
}

/// The single frame outcome of [`ToneEstimator::estimate`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Estimate {
    pub(crate) verdict: Verdict,
    pub(crate) tone: Option<usize>,
    pub(crate) tone_exact: Option<f32>,
    pub(crate) volume: f32,
    pub(crate) clarity: f32,
}

impl Estimate {
    fn unvoiced(verdict: Verdict, volume: f32, clarity: f32) -> Self {
        Estimate {
            verdict,
            tone: None,
            tone_exact: None,
            volume,
            clarity,
        }
    }
}

/// Estimates the tone of individual frames. Holds the scratch memory
/// needed for one frame, so estimating never allocates.
pub(crate) struct ToneEstimator {
    tables: Arc<ToneTables>,
    windowed: Box<[f32]>,
    similarity: Similarity,
    peaks: PeakList,
    voicing_ratio: f32,
    candidate_floor: f32,
    octave_tolerance: f32,
}

impl ToneEstimator {
    pub(crate) fn new(tables: Arc<ToneTables>, options: &AnalyzerOptions) -> Result<Self> {
        let similarity = Similarity::new(options.akf_method, tables.frame_len(), tables.max_samples_per_period())?;
        Ok(ToneEstimator {
            windowed: vec![0.0; tables.frame_len()].into_boxed_slice(),
            similarity,
            peaks: PeakList::new(options.max_peaks),
            voicing_ratio: options.voicing_ratio,
            candidate_floor: options.candidate_floor,
            octave_tolerance: options.octave_tolerance,
            tables,
        })
    }

    /// Estimates the tone of `frame`, writing one fused score per analyzable
    /// half tone to `weights`.
    pub(crate) fn estimate(&mut self, frame: &[f32], volume_threshold: f32, weights: &mut [f32]) -> Result<Estimate> {
        let frame_len = self.tables.frame_len();
        assert_eq!(frame.len(), frame_len);
        assert_eq!(weights.len(), self.tables.half_tone_count());

        // The first half of the frame was already covered by the previous frame.
        let volume = frame[frame_len / 2..].peak_level();
        if volume < volume_threshold {
            weights.iter_mut().for_each(|weight| *weight = 0.0);
            return Ok(Estimate::unvoiced(Verdict::BelowThreshold, volume, 0.0));
        }

        apply_window(self.tables.window(), frame, &mut self.windowed);
        self.similarity.prepare(&self.windowed)?;

        let tables = &self.tables;
        let similarity = &self.similarity;
        let windowed = &self.windowed[..];
        let last = weights.len() - 1;

        // Score every tone, remembering where the curve last started falling.
        let mut last_valid: isize = 0;
        let mut last_weight = 1.0;
        let mut best_tone = 0;
        let mut best_weight = f32::MIN;
        for tone in 0..=last {
            let weight = similarity.score(frame, windowed, tables.samples_per_period(tone));
            weights[tone] = weight;
            if weight > best_weight {
                best_weight = weight;
                best_tone = tone;
            }
            if weight < last_weight {
                last_valid = tone as isize - 1;
            }
            last_weight = weight;
        }

        // The flank of the lag 0 peak reaches into the range. Probe the extra
        // tones above it for the point where the AKF starts falling and
        // discard everything up to there.
        if best_tone == last || (last > 0 && weights[last] > weights[last - 1]) {
            let mut previous = similarity.akf(windowed, tables.samples_per_period(last));
            for tone in last + 1..tables.probe_tone_count() {
                let akf = similarity.akf(windowed, tables.samples_per_period(tone));
                if akf < previous {
                    last_valid = tone as isize - 1;
                    break;
                }
                previous = akf;
            }
            if last_valid < 0 {
                return Ok(Estimate::unvoiced(Verdict::NoPeak, volume, 0.0));
            }
            let start = (last_valid as usize + 1).min(weights.len());
            weights[start..].iter_mut().for_each(|weight| *weight = 0.0);
        }

        self.peaks.collect(weights);
        let mut max_weight = match self.peaks.best() {
            Some(peak) if peak.weight >= MIN_PEAK_WEIGHT => peak.weight,
            _ => return Ok(Estimate::unvoiced(Verdict::NoPeak, volume, 0.0)),
        };
        let mut max_tone = self.peaks.best().map_or(0, |peak| peak.tone);
        // The fine offset of the winner: None, or Some(true) for 1/3 above.
        let mut max_fine: Option<bool> = None;

        // Weakest first, so the floor rises as candidates are refined.
        for peak in self.peaks.as_slice().iter().rev() {
            if peak.weight < self.candidate_floor * max_weight {
                continue;
            }
            let tone = peak.tone;
            let below = similarity.score(frame, windowed, tables.samples_per_period_fine(tone, false));
            let (weight, shift_up) = if below > peak.weight {
                (below, false)
            } else {
                let above = similarity.score(frame, windowed, tables.samples_per_period_fine(tone, true));
                if above > peak.weight {
                    (above, true)
                } else {
                    continue;
                }
            };
            weights[tone] = weight;
            if weight > max_weight {
                max_weight = weight;
                max_tone = tone;
                max_fine = Some(shift_up);
            }

            // The neighbour in the direction of the shift, probed 1/3 towards this tone.
            let neighbour = if shift_up {
                Some(tone + 1).filter(|other| *other <= last)
            } else {
                tone.checked_sub(1)
            };
            if let Some(other) = neighbour {
                let other_weight = similarity.score(frame, windowed, tables.samples_per_period_fine(other, !shift_up));
                if other_weight > weights[other] {
                    weights[other] = other_weight;
                    if other_weight > max_weight {
                        max_weight = other_weight;
                        max_tone = other;
                        max_fine = Some(!shift_up);
                    }
                }
            }
        }

        // A tone scores almost as high at twice its period as at its period.
        // Of two near-equal octave-spaced candidates, the higher one wins.
        while max_tone + OCTAVE <= last {
            let octave = max_tone + OCTAVE;
            let octave_weight = similarity.score(frame, windowed, period(tables, octave, max_fine));
            if octave_weight < (1.0 - self.octave_tolerance) * max_weight {
                break;
            }
            log::trace!("tone {} replaced by its octave {}", max_tone, octave);
            weights[octave] = weights[octave].max(octave_weight);
            max_tone = octave;
            max_weight = octave_weight;
        }

        // Reject candidates that explain too little of the frame energy.
        let lag = period(tables, max_tone, max_fine);
        let energy = similarity.energy(windowed);
        let clarity = if energy > 0.0 {
            similarity.akf(windowed, lag) / energy
        } else {
            0.0
        };
        if clarity < self.voicing_ratio {
            log::trace!("tone {} rejected, clarity {:.3}", max_tone, clarity);
            return Ok(Estimate::unvoiced(Verdict::Aperiodic, volume, clarity));
        }

        let offset = match max_fine {
            None => 0.0,
            Some(true) => FINE_OFFSET as f32,
            Some(false) => -FINE_OFFSET as f32,
        };
        Ok(Estimate {
            verdict: Verdict::Voiced,
            tone: Some(max_tone),
            tone_exact: Some(max_tone as f32 + offset),
            volume,
            clarity,
        })
    }
}
