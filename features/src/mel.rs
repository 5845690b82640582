use ndarray::Array2;

// Slaney-style mel scale: linear below 1 kHz, logarithmic above.
const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

const AMIN: f64 = 1e-10;
const TOP_DB: f64 = 80.0;

pub fn hz_to_mel(hz: f64) -> f64 {
    if hz < MIN_LOG_HZ {
        hz / F_SP
    } else {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / logstep()
    }
}

pub fn mel_to_hz(mel: f64) -> f64 {
    if mel < MIN_LOG_MEL {
        mel * F_SP
    } else {
        MIN_LOG_HZ * ((mel - MIN_LOG_MEL) * logstep()).exp()
    }
}

fn logstep() -> f64 {
    6.4f64.ln() / 27.0
}

/// Triangular mel filterbank, shape `(n_mels, n_fft / 2 + 1)`, with Slaney
/// area normalization.
pub fn mel_filterbank(sample_rate: u32, n_fft: usize, n_mels: usize) -> Array2<f64> {
    let n_bins = n_fft / 2 + 1;
    let nyquist = f64::from(sample_rate) / 2.0;

    let mel_max = hz_to_mel(nyquist);
    let band_edges: Vec<f64> = (0..n_mels + 2)
        .map(|i| mel_to_hz(mel_max * i as f64 / (n_mels + 1) as f64))
        .collect();

    let bin_frequencies = crate::stft::fft_frequencies(sample_rate, n_fft);

    let mut filterbank = Array2::zeros((n_mels, n_bins));

    for m in 0..n_mels {
        let (lower, center, upper) = (band_edges[m], band_edges[m + 1], band_edges[m + 2]);
        let norm = 2.0 / (upper - lower);

        for (bin, &freq) in bin_frequencies.iter().enumerate() {
            let rising = (freq - lower) / (center - lower);
            let falling = (upper - freq) / (upper - center);
            let weight = rising.min(falling).max(0.0);
            filterbank[[m, bin]] = weight * norm;
        }
    }

    filterbank
}

/// Mel-band power spectrogram, shape `(n_mels, n_frames)`.
pub fn mel_power_spectrogram(
    power_spectrogram: &Array2<f64>,
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
) -> Array2<f64> {
    mel_filterbank(sample_rate, n_fft, n_mels).dot(power_spectrogram)
}

/// Convert power to decibels, clamped to `TOP_DB` below the peak.
pub fn power_to_db(power: &Array2<f64>) -> Array2<f64> {
    let mut db = power.mapv(|p| 10.0 * p.max(AMIN).log10());
    let peak = db.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let floor = peak - TOP_DB;
    db.mapv_inplace(|v| v.max(floor));
    db
}
