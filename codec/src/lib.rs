mod au;
mod decoder;
mod resampler;

pub use decoder::decode_file;
pub use resampler::resample;

/// Decoded mono audio.
#[derive(Debug, Clone)]
pub struct Audio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Audio {
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Keep at most the first `seconds` of audio.
    pub fn truncate(&mut self, seconds: f64) {
        let max_samples = (seconds * f64::from(self.sample_rate)).round() as usize;
        self.samples.truncate(max_samples);
    }
}

/// Load an audio file for analysis: decode, keep at most `max_seconds`,
/// resample to `target_rate` mono.
pub fn load_analysis_audio(
    path: &std::path::Path,
    max_seconds: f64,
    target_rate: u32,
) -> anyhow::Result<Audio> {
    let mut audio = decode_file(path)?;
    audio.truncate(max_seconds);
    resample(audio, target_rate)
}
