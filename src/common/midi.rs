use micromath::F32Ext;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Converts a frequency in Hz to a [MIDI](https://en.wikipedia.org/wiki/MIDI) note number (with a fractional part).
pub fn freq_to_midi_note(freq: f32) -> f32 {
    12.0 * F32Ext::log2(freq) - 36.376316562295926
}

/// Converts a (possibly fractional) MIDI note number to a frequency in Hz.
pub fn midi_note_to_freq(note: f32) -> f32 {
    440.0 * 2.0_f32.powf((note - 69.0) / 12.0)
}

/// Returns the name and octave of the MIDI note nearest to `note`,
/// e.g `("A", 4)` for 69.
pub fn note_name(note: f32) -> (&'static str, i32) {
    let nearest = note.round() as i32;
    let name = NOTE_NAMES[nearest.rem_euclid(12) as usize];
    (name, nearest.div_euclid(12) - 1)
}
