use std::env;
use std::thread;
use std::time::Duration;

use dev_helpers::{melody, note_number_to_string, read_wav_mono, Note};

use micro_tone::akf::{AnalyzerOptions, TableConfig, ToneAnalyzer};

fn main() {
    env_logger::init();

    // Track the tone of a wav file if one is given, otherwise of a short synthesized melody.
    let (sample_rate, samples) = match env::args().nth(1) {
        Some(path) => {
            let wav = read_wav_mono(&path).expect("failed to read wav file");
            println!("Tracking {} ({} Hz)", path, wav.sample_rate);
            (wav.sample_rate as f32, wav.samples)
        }
        None => {
            let sample_rate = 44100.0;
            let notes: Vec<Note> = [261.63, 293.66, 329.63, 0.0, 392.0, 440.0, 196.0]
                .iter()
                .map(|frequency| Note {
                    frequency: *frequency,
                    seconds: 0.4,
                })
                .collect();
            println!("Tracking a synthesized melody. Pass a wav file path to track that instead.");
            (sample_rate, melody(&notes, sample_rate, 0.5))
        }
    };

    let config = TableConfig {
        sample_rate,
        ..TableConfig::default()
    };
    let mut analyzer = ToneAnalyzer::from_options(&config, AnalyzerOptions::with_step(512))
        .expect("failed to create tone analyzer");
    let tables = analyzer.tables().clone();

    // Feed the samples from another thread in chunks, like an audio capture callback would.
    let sink = analyzer.sink();
    let chunk_size = 256;
    let chunk_duration = Duration::from_secs_f32(chunk_size as f32 / sample_rate);
    let producer = thread::spawn(move || {
        for chunk in samples.chunks(chunk_size) {
            sink.input(chunk);
            thread::sleep(chunk_duration);
        }
    });

    let poll_interval = Duration::from_millis(30);
    let mut last_tone = None;
    loop {
        thread::sleep(poll_interval);
        let finished = producer.is_finished();
        let result = analyzer.get_note();
        if result.tone != last_tone {
            match result.tone {
                Some(tone) => println!(
                    "{} | {:.2} Hz | clarity {:.2} | {:.1} dB",
                    note_number_to_string(tables.midi_note(tone as f32)),
                    tables.frequency(tone as f32),
                    result.clarity,
                    result.max_volume_db()
                ),
                None => println!("-"),
            }
            last_tone = result.tone;
        }
        if finished {
            break;
        }
    }
    producer.join().expect("producer thread panicked");
}
