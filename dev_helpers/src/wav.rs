use hound::{SampleFormat, WavReader};

pub struct WavData {
    pub sample_rate: u32,
    /// Samples in [-1, 1], averaged over all channels.
    pub samples: Vec<f32>,
}

pub fn read_wav_mono(path: &str) -> Result<WavData, hound::Error> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channels = usize::from(spec.channels.max(1));
    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect();
    Ok(WavData {
        sample_rate: spec.sample_rate,
        samples,
    })
}
