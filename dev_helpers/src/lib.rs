mod signal;
mod wav;

pub use signal::{melody, Note};
pub use wav::{read_wav_mono, WavData};

pub fn note_number_to_string(note_number: f32) -> String {
    let note_names = [
        "    C", "C#/D♭", "    D", "D#/E♭", "    E", "    F", "F#/G♭", "    G", "G#/A♭", "    A", "A#/B♭", "    B",
    ];
    let nearest_midi_note = note_number.round().max(0.0) as usize;
    // MIDI note 0 is C-1
    let octave = (nearest_midi_note / 12) as i32 - 1;
    let cent_offset = (100.0 * (note_number - (nearest_midi_note as f32))).round() as i32;
    let cent_sign = if cent_offset > 0 { "+" } else { "-" };
    format!(
        "{}{} | {}{:02} cents",
        note_names[nearest_midi_note % 12],
        octave,
        cent_sign,
        cent_offset.abs()
    )
}

#[cfg(test)]
mod tests {
    use super::note_number_to_string;

    #[test]
    fn test_note_names() {
        assert_eq!(note_number_to_string(69.0), "    A4 | -00 cents");
        assert_eq!(note_number_to_string(60.25), "    C4 | +25 cents");
        assert_eq!(note_number_to_string(36.9), "C#/D♭2 | -10 cents");
    }
}
