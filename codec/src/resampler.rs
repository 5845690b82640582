use anyhow::Context;
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

use crate::Audio;

/// Resample mono audio to `target_rate` in a single pass.
///
/// Identity when the rates already match.
pub fn resample(audio: Audio, target_rate: u32) -> anyhow::Result<Audio> {
    if audio.sample_rate == target_rate || audio.samples.is_empty() {
        return Ok(Audio {
            samples: audio.samples,
            sample_rate: target_rate,
        });
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = f64::from(target_rate) / f64::from(audio.sample_rate);

    // Chunk size = input length: one process call for the whole signal.
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, audio.samples.len(), 1)
        .context("Failed to create resampler")?;

    let output = resampler
        .process(&[audio.samples], None)
        .context("Resampling failed")?;

    let samples = output.into_iter().next().unwrap_or_default();

    Ok(Audio {
        samples,
        sample_rate: target_rate,
    })
}
