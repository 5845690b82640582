use ndarray::Array2;

const AMIN: f64 = 1e-10;

/// Spectral contrast: per-band difference between spectral peaks and
/// valleys in dB. Shape `(n_bands + 1, n_frames)` — `n_bands` octave bands
/// above `fmin` plus the sub-band below it.
pub fn spectral_contrast(
    power_spectrogram: &Array2<f64>,
    frequencies: &[f64],
    fmin: f64,
    n_bands: usize,
    quantile: f64,
) -> Array2<f64> {
    let n_frames = power_spectrogram.ncols();
    let nyquist = *frequencies.last().unwrap_or(&0.0);

    // Band edges: [0, fmin, 2*fmin, ..., fmin * 2^n_bands], clamped to Nyquist.
    let mut edges = Vec::with_capacity(n_bands + 2);
    edges.push(0.0);
    for octave in 0..=n_bands {
        edges.push((fmin * 2f64.powi(octave as i32)).min(nyquist));
    }

    let mut contrast = Array2::zeros((n_bands + 1, n_frames));

    for band in 0..=n_bands {
        let low = edges[band];
        let high = edges[band + 1];

        let bins: Vec<usize> = frequencies
            .iter()
            .enumerate()
            .filter(|(_, &f)| f >= low && (f < high || (band == n_bands && f <= high)))
            .map(|(bin, _)| bin)
            .collect();

        if bins.is_empty() {
            continue;
        }

        // At least one bin per quantile end.
        let n_quantile = ((bins.len() as f64 * quantile).round() as usize).max(1);

        for frame in 0..n_frames {
            let mut band_power: Vec<f64> = bins
                .iter()
                .map(|&bin| power_spectrogram[[bin, frame]])
                .collect();
            band_power.sort_by(f64::total_cmp);

            let valley: f64 =
                band_power[..n_quantile].iter().sum::<f64>() / n_quantile as f64;
            let peak: f64 = band_power[band_power.len() - n_quantile..]
                .iter()
                .sum::<f64>()
                / n_quantile as f64;

            contrast[[band, frame]] =
                10.0 * (peak.max(AMIN).log10() - valley.max(AMIN).log10());
        }
    }

    contrast
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stft;

    #[test]
    fn test_shape() {
        let power = Array2::from_elem((1025, 5), 1.0);
        let freqs = stft::fft_frequencies(22050, 2048);
        let contrast = spectral_contrast(&power, &freqs, 200.0, 6, 0.02);

        assert_eq!(&[7, 5], contrast.shape());
    }

    #[test]
    fn test_flat_spectrum_has_no_contrast() {
        let power = Array2::from_elem((1025, 3), 0.5);
        let freqs = stft::fft_frequencies(22050, 2048);
        let contrast = spectral_contrast(&power, &freqs, 200.0, 6, 0.02);

        assert!(contrast.iter().all(|&c| c.abs() < 1e-9));
    }

    #[test]
    fn test_peaky_band_has_positive_contrast() {
        let freqs = stft::fft_frequencies(22050, 2048);
        let mut power = Array2::from_elem((1025, 1), 1e-6);

        // Strong peak at ~1 kHz, which falls in the 800-1600 Hz octave band.
        let peak_bin = freqs.iter().position(|&f| f >= 1000.0).unwrap();
        power[[peak_bin, 0]] = 1.0;

        let contrast = spectral_contrast(&power, &freqs, 200.0, 6, 0.02);

        // Bands: sub-200, 200-400, 400-800, 800-1600, ...
        assert!(contrast[[3, 0]] > 10.0);
        assert!(contrast[[1, 0]].abs() < 1e-9);
    }

    #[test]
    fn test_values_are_finite() {
        let power = Array2::zeros((1025, 4));
        let freqs = stft::fft_frequencies(22050, 2048);
        let contrast = spectral_contrast(&power, &freqs, 200.0, 6, 0.02);

        assert!(contrast.iter().all(|c| c.is_finite()));
    }
}
