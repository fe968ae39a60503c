//! Common algorithms and utilities.

mod autocorr;
mod f32_array_ext;
mod fft;
mod midi;
mod ring_buffer;
mod window_function;

pub use autocorr::{autocorr_conv, autocorr_fft_size, FftAutocorr};
pub use f32_array_ext::{level_to_db, F32ArrayExt};
pub use fft::{real_fft, MAX_FFT_SIZE};
pub use midi::{freq_to_midi_note, midi_note_to_freq, note_name};
pub use ring_buffer::RingBuffer;
pub use window_function::{apply_window, WindowFunction};
