//! `[f32]` extensions.

use micromath::F32Ext;

/// Converts a linear level to dB relative to 1. Silence maps to -inf.
pub fn level_to_db(level: f32) -> f32 {
    if level <= 0. {
        return f32::NEG_INFINITY;
    }
    20. * F32Ext::log10(level)
}

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the maximum absolute value.
    fn peak_level(&self) -> f32;
    /// Returns the maximum absolute value in dB relative to 1,
    /// i.e 0 dB corresponds to a level of 1.
    fn peak_level_db(&self) -> f32;
}

impl F32ArrayExt for [f32] {
    fn peak_level(&self) -> f32 {
        self.iter().fold(0.0_f32, |max, sample| max.max(sample.abs()))
    }

    fn peak_level_db(&self) -> f32 {
        level_to_db(self.peak_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{level_to_db, F32ArrayExt};

    #[test]
    fn test_peak_ignores_sign() {
        let frame = [0.1_f32, -0.5, 0.25];
        assert_eq!(frame.peak_level(), 0.5);
        assert!((frame.peak_level_db() + 6.0206).abs() < 0.01);
        assert!([1.0_f32, -1.0].peak_level_db().abs() < 0.05);
    }

    #[test]
    fn test_silence() {
        let empty: [f32; 0] = [];
        assert_eq!(empty.peak_level(), 0.0);
        assert_eq!([0.0_f32; 16].peak_level(), 0.0);
        assert_eq!([0.0_f32; 16].peak_level_db(), f32::NEG_INFINITY);
        assert_eq!(level_to_db(0.0), f32::NEG_INFINITY);
    }
}
