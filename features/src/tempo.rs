use ndarray::Array2;

use crate::config::{MAX_TEMPO, MIN_TEMPO, TEMPO_PRIOR_BPM};

/// Onset strength envelope: mean positive spectral flux across mel bands,
/// one value per frame (the first frame is zero).
pub fn onset_strength(log_mel: &Array2<f64>) -> Vec<f64> {
    let n_frames = log_mel.ncols();
    let n_bands = log_mel.nrows();

    let mut envelope = vec![0.0; n_frames];
    for frame in 1..n_frames {
        let flux: f64 = (0..n_bands)
            .map(|band| (log_mel[[band, frame]] - log_mel[[band, frame - 1]]).max(0.0))
            .sum();
        envelope[frame] = flux / n_bands as f64;
    }
    envelope
}

/// Global tempo estimate in BPM from an onset envelope.
///
/// Autocorrelation over lags in the valid tempo range, weighted by a
/// log-normal prior centered at `TEMPO_PRIOR_BPM`. Returns 0.0 when the
/// envelope carries no periodic energy (e.g. silence or a steady tone).
pub fn estimate_tempo(envelope: &[f64], sample_rate: u32, hop_length: usize) -> f64 {
    let frame_duration = hop_length as f64 / f64::from(sample_rate);

    let min_lag = ((60.0 / (MAX_TEMPO * frame_duration)).floor() as usize).max(1);
    let max_lag = (60.0 / (MIN_TEMPO * frame_duration)).ceil() as usize;
    let max_lag = max_lag.min(envelope.len() / 2);

    if min_lag >= max_lag {
        return 0.0;
    }

    let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;
    let centered: Vec<f64> = envelope.iter().map(|&x| x - mean).collect();

    let energy: f64 = centered.iter().map(|&x| x * x).sum();
    if energy < 1e-12 {
        return 0.0;
    }

    let n = centered.len();
    let mut best_bpm = 0.0;
    let mut best_score = f64::NEG_INFINITY;

    for lag in min_lag..=max_lag {
        let correlation: f64 = centered[..n - lag]
            .iter()
            .zip(&centered[lag..])
            .map(|(&a, &b)| a * b)
            .sum::<f64>()
            / energy;

        if correlation <= 0.0 {
            continue;
        }

        let bpm = 60.0 / (lag as f64 * frame_duration);
        let score = correlation * prior(bpm);

        if score > best_score {
            best_score = score;
            best_bpm = bpm;
        }
    }

    best_bpm
}

/// Log-normal preference for tempi near the prior, one octave of standard
/// deviation.
fn prior(bpm: f64) -> f64 {
    let octaves = (bpm / TEMPO_PRIOR_BPM).log2();
    (-0.5 * octaves * octaves).exp()
}
