//! [Window functions](https://en.wikipedia.org/wiki/Window_function).

use core::f64::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WindowFunction {
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    Hamming,
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    Hann,
}

impl WindowFunction {
    /// The value of the window function at index `i` of a window of length `len`.
    pub fn coefficient(self, i: usize, len: usize) -> f32 {
        if len < 2 {
            return 1.0;
        }
        let phase = 2.0 * PI * (i as f64) / ((len - 1) as f64);
        let value = match self {
            WindowFunction::Hamming => 0.54 - 0.46 * phase.cos(),
            WindowFunction::Hann => 0.5 - 0.5 * phase.cos(),
        };
        value as f32
    }

    /// Precomputes the window coefficients for a window of length `len`.
    pub fn table(self, len: usize) -> Box<[f32]> {
        (0..len).map(|i| self.coefficient(i, len)).collect()
    }
}

/// Writes the point-wise product of `buffer` and `window` to `result`.
pub fn apply_window(window: &[f32], buffer: &[f32], result: &mut [f32]) {
    if window.len() != buffer.len() || buffer.len() != result.len() {
        panic!("Window, input and output buffers must have the same length")
    }
    for ((out, sample), coefficient) in result.iter_mut().zip(buffer).zip(window) {
        *out = sample * coefficient;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hamming_window() {
        let table = WindowFunction::Hamming.table(11);
        assert!((table[0] - 0.08).abs() <= 1e-6);
        assert!((table[5] - 1.0).abs() <= 1e-6);
        assert!((table[10] - 0.08).abs() <= 1e-6);
        for i in 0..5 {
            assert!((table[i] - table[10 - i]).abs() <= 1e-6);
        }
    }

    #[test]
    fn test_hann_window() {
        let table = WindowFunction::Hann.table(5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (value, expected) in table.iter().zip(expected.iter()) {
            assert!((value - expected).abs() <= 1e-6);
        }
    }

    #[test]
    fn test_degenerate_length() {
        assert_eq!(WindowFunction::Hamming.table(1)[0], 1.0);
        assert!(WindowFunction::Hann.table(0).is_empty());
    }

    #[test]
    fn test_apply_window() {
        let window = WindowFunction::Hann.table(5);
        let buffer = [2.0_f32; 5];
        let mut result = [0.0_f32; 5];
        apply_window(&window, &buffer, &mut result);
        assert!((result[1] - 1.0).abs() <= 1e-6);
        assert!((result[2] - 2.0).abs() <= 1e-6);
    }
}
