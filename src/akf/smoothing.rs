/// The most recent raw tone detections, reported as their median.
pub(crate) struct ToneHistory {
    tones: Box<[Option<usize>]>,
    next: usize,
    sorted: Vec<usize>,
}

impl ToneHistory {
    pub(crate) fn new(len: usize) -> Self {
        ToneHistory {
            tones: vec![None; len].into_boxed_slice(),
            next: 0,
            sorted: Vec::with_capacity(len),
        }
    }

    pub(crate) fn push(&mut self, tone: Option<usize>) {
        self.tones[self.next] = tone;
        self.next = (self.next + 1) % self.tones.len();
    }

    /// The most recently pushed detection.
    pub(crate) fn latest(&self) -> Option<usize> {
        let len = self.tones.len();
        self.tones[(self.next + len - 1) % len]
    }

    /// The median of the voiced entries, or the mean of the two middle ones
    /// for an even count. `None` if no entry is voiced.
    pub(crate) fn median(&mut self) -> Option<usize> {
        self.sorted.clear();
        for tone in self.tones.iter().flatten() {
            let position = self
                .sorted
                .iter()
                .position(|sorted| sorted > tone)
                .unwrap_or_else(|| self.sorted.len());
            self.sorted.insert(position, *tone);
        }
        let count = self.sorted.len();
        match count {
            0 => None,
            _ if count % 2 == 0 => Some((self.sorted[count / 2 - 1] + self.sorted[count / 2]) / 2),
            _ => Some(self.sorted[count / 2]),
        }
    }

    pub(crate) fn clear(&mut self) {
        for tone in self.tones.iter_mut() {
            *tone = None;
        }
        self.next = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::ToneHistory;

    #[test]
    fn test_median_of_voiced() {
        let mut history = ToneHistory::new(3);
        assert_eq!(history.median(), None);
        history.push(Some(10));
        assert_eq!(history.median(), Some(10));
        history.push(None);
        history.push(Some(14));
        // Even number of voiced entries: mean of the middle two
        assert_eq!(history.median(), Some(12));
        history.push(Some(11));
        // 11, None, 14 -> still two voiced entries
        assert_eq!(history.median(), Some(12));
        history.push(Some(30));
        // 11, 30, 14
        assert_eq!(history.median(), Some(14));
        assert_eq!(history.latest(), Some(30));
    }

    #[test]
    fn test_outlier_is_rejected() {
        let mut history = ToneHistory::new(3);
        for tone in [20, 8, 20].iter() {
            history.push(Some(*tone));
        }
        assert_eq!(history.median(), Some(20));
    }

    #[test]
    fn test_single_entry_history() {
        let mut history = ToneHistory::new(1);
        history.push(Some(3));
        history.push(Some(5));
        assert_eq!(history.median(), Some(5));
        history.push(None);
        assert_eq!(history.median(), None);
        assert_eq!(history.latest(), None);
    }

    #[test]
    fn test_clear() {
        let mut history = ToneHistory::new(3);
        history.push(Some(1));
        history.clear();
        assert_eq!(history.median(), None);
    }
}
