use ndarray::Array2;

/// Per-frame spectral centroid in Hz (magnitude-weighted mean frequency).
pub fn centroid(spectrogram: &Array2<f64>, frequencies: &[f64]) -> Vec<f64> {
    spectrogram
        .columns()
        .into_iter()
        .map(|frame| {
            let total: f64 = frame.sum();
            if total <= 0.0 {
                return 0.0;
            }
            frame
                .iter()
                .zip(frequencies)
                .map(|(&m, &f)| m * f)
                .sum::<f64>()
                / total
        })
        .collect()
}

/// Per-frame spectral bandwidth: magnitude-weighted standard deviation of
/// frequency around the centroid.
pub fn bandwidth(spectrogram: &Array2<f64>, frequencies: &[f64], centroids: &[f64]) -> Vec<f64> {
    spectrogram
        .columns()
        .into_iter()
        .zip(centroids)
        .map(|(frame, &center)| {
            let total: f64 = frame.sum();
            if total <= 0.0 {
                return 0.0;
            }
            let variance = frame
                .iter()
                .zip(frequencies)
                .map(|(&m, &f)| m / total * (f - center).powi(2))
                .sum::<f64>();
            variance.sqrt()
        })
        .collect()
}

/// Per-frame roll-off frequency: the lowest frequency below which
/// `percent` of the frame's magnitude is contained.
pub fn rolloff(spectrogram: &Array2<f64>, frequencies: &[f64], percent: f64) -> Vec<f64> {
    spectrogram
        .columns()
        .into_iter()
        .map(|frame| {
            let threshold = percent * frame.sum();
            if threshold <= 0.0 {
                return 0.0;
            }
            let mut cumulative = 0.0;
            for (&m, &f) in frame.iter().zip(frequencies) {
                cumulative += m;
                if cumulative >= threshold {
                    return f;
                }
            }
            *frequencies.last().unwrap_or(&0.0)
        })
        .collect()
}

/// Per-frame zero-crossing rate over the raw signal.
pub fn zero_crossing_rate(signal: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    frames(signal, frame_length, hop_length)
        .map(|frame| {
            let crossings = frame
                .windows(2)
                .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
                .count();
            crossings as f64 / frame.len() as f64
        })
        .collect()
}

/// Per-frame root-mean-square energy over the raw signal.
pub fn rms(signal: &[f32], frame_length: usize, hop_length: usize) -> Vec<f64> {
    frames(signal, frame_length, hop_length)
        .map(|frame| {
            let mean_square = frame
                .iter()
                .map(|&s| f64::from(s) * f64::from(s))
                .sum::<f64>()
                / frame.len() as f64;
            mean_square.sqrt()
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Full frames over the signal; a signal shorter than one frame yields
/// itself as a single partial frame.
fn frames(signal: &[f32], frame_length: usize, hop_length: usize) -> impl Iterator<Item = &[f32]> {
    let count = if signal.len() >= frame_length {
        (signal.len() - frame_length) / hop_length + 1
    } else {
        usize::from(!signal.is_empty())
    };

    (0..count).map(move |i| {
        let start = i * hop_length;
        &signal[start..(start + frame_length).min(signal.len())]
    })
}
