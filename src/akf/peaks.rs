#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A local maximum of the weight curve, i.e a candidate for the sung tone.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Peak {
    /// The tone index of the maximum.
    pub tone: usize,
    /// The fused similarity score at `tone`.
    pub weight: f32,
}

/// Keeps the `capacity` strongest peaks, strongest first.
///
/// Insertion walks the short list instead of sorting all peaks, and
/// no memory is allocated after construction.
pub(crate) struct PeakList {
    peaks: Vec<Peak>,
    capacity: usize,
}

impl PeakList {
    pub(crate) fn new(capacity: usize) -> Self {
        PeakList {
            peaks: Vec::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.peaks.clear();
    }

    pub(crate) fn push(&mut self, peak: Peak) {
        let position = self
            .peaks
            .iter()
            .position(|existing| existing.weight <= peak.weight)
            .unwrap_or_else(|| self.peaks.len());
        if position < self.capacity {
            self.peaks.insert(position, peak);
            self.peaks.truncate(self.capacity);
        }
    }

    /// The strongest peak, if any.
    pub(crate) fn best(&self) -> Option<Peak> {
        self.peaks.first().copied()
    }

    pub(crate) fn as_slice(&self) -> &[Peak] {
        &self.peaks
    }

    /// Scans `weights` for rising-then-falling patterns and keeps the strongest.
    /// A curve still rising at its last element counts as a peak there if the
    /// weight is clearly positive.
    pub(crate) fn collect(&mut self, weights: &[f32]) {
        self.clear();
        let mut rising = true;
        for (tone, pair) in weights.windows(2).enumerate() {
            if pair[0] > pair[1] {
                if rising {
                    self.push(Peak {
                        tone,
                        weight: pair[0],
                    });
                    rising = false;
                }
            } else {
                rising = true;
            }
        }
        if let Some(last) = weights.last() {
            if rising && *last > 0.001 {
                self.push(Peak {
                    tone: weights.len() - 1,
                    weight: *last,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_strongest_in_order() {
        let mut peaks = PeakList::new(3);
        for (tone, weight) in [(0, 0.1), (1, 0.5), (2, 0.3), (3, 0.05), (4, 0.4)].iter() {
            peaks.push(Peak {
                tone: *tone,
                weight: *weight,
            });
        }
        let tones: Vec<usize> = peaks.as_slice().iter().map(|peak| peak.tone).collect();
        assert_eq!(tones, vec![1, 4, 2]);
        assert_eq!(peaks.best().unwrap().tone, 1);
    }

    #[test]
    fn test_collect_local_maxima() {
        let weights = [0.0_f32, 0.2, 0.1, 0.1, 0.6, 0.3, 0.35, 0.5];
        let mut peaks = PeakList::new(10);
        peaks.collect(&weights);
        let tones: Vec<usize> = peaks.as_slice().iter().map(|peak| peak.tone).collect();
        // The curve still rises at the end, so the last tone is a peak too
        assert_eq!(tones, vec![4, 7, 1]);
    }

    #[test]
    fn test_collect_flat_and_empty() {
        let mut peaks = PeakList::new(4);
        peaks.collect(&[]);
        assert!(peaks.best().is_none());
        peaks.collect(&[0.0; 8]);
        assert!(peaks.best().is_none());
        // A plateau followed by a drop counts once
        peaks.collect(&[0.0, 0.2, 0.2, 0.1]);
        assert_eq!(peaks.as_slice(), &[Peak { tone: 2, weight: 0.2 }]);
    }
}
