use std::f32::consts::PI;

/// A tone held for a while. A frequency of 0 is a rest.
#[derive(Clone, Copy, Debug)]
pub struct Note {
    pub frequency: f32,
    pub seconds: f32,
}

/// Renders `notes` as a sine with a slight vibrato, keeping the phase
/// continuous across note changes.
pub fn melody(notes: &[Note], sample_rate: f32, amplitude: f32) -> Vec<f32> {
    let vibrato_rate = 5.0;
    let vibrato_depth = 0.004;
    let mut samples = Vec::new();
    let mut phase = 0.0_f32;
    for note in notes {
        let len = (note.seconds * sample_rate) as usize;
        for i in 0..len {
            if note.frequency <= 0.0 {
                samples.push(0.0);
                continue;
            }
            let t = i as f32 / sample_rate;
            let frequency = note.frequency * (1.0 + vibrato_depth * (2.0 * PI * vibrato_rate * t).sin());
            phase = (phase + 2.0 * PI * frequency / sample_rate) % (2.0 * PI);
            samples.push(amplitude * phase.sin());
        }
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_melody_length_and_rests() {
        let notes = [
            Note {
                frequency: 440.0,
                seconds: 0.5,
            },
            Note {
                frequency: 0.0,
                seconds: 0.25,
            },
        ];
        let samples = melody(&notes, 1000.0, 0.5);
        assert_eq!(samples.len(), 750);
        assert!(samples[..500].iter().any(|sample| *sample > 0.45));
        assert!(samples[500..].iter().all(|sample| *sample == 0.0));
    }
}
