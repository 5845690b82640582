use std::f64::consts::PI;

use ndarray::Array2;

/// MFCCs from a log-power mel spectrogram: orthonormal DCT-II along the mel
/// axis, keeping the first `n_mfcc` coefficients. Shape `(n_mfcc, n_frames)`.
pub fn mfcc(log_mel: &Array2<f64>, n_mfcc: usize) -> Array2<f64> {
    let n_mels = log_mel.nrows();
    let n_frames = log_mel.ncols();

    let scale_0 = (1.0 / n_mels as f64).sqrt();
    let scale_k = (2.0 / n_mels as f64).sqrt();

    let mut coefficients = Array2::zeros((n_mfcc, n_frames));

    for k in 0..n_mfcc {
        let scale = if k == 0 { scale_0 } else { scale_k };
        for t in 0..n_frames {
            let sum: f64 = (0..n_mels)
                .map(|m| {
                    log_mel[[m, t]] * (PI * k as f64 * (2 * m + 1) as f64 / (2 * n_mels) as f64).cos()
                })
                .sum();
            coefficients[[k, t]] = scale * sum;
        }
    }

    coefficients
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let log_mel = Array2::zeros((128, 10));
        let coefficients = mfcc(&log_mel, 13);
        assert_eq!(&[13, 10], coefficients.shape());
    }

    #[test]
    fn test_constant_input_loads_only_dc() {
        // A flat spectrum has all its energy in coefficient 0.
        let log_mel = Array2::from_elem((64, 4), -20.0);
        let coefficients = mfcc(&log_mel, 13);

        let expected_dc = -20.0 * 64.0 * (1.0 / 64.0f64).sqrt();
        for t in 0..4 {
            assert!((coefficients[[0, t]] - expected_dc).abs() < 1e-9);
            for k in 1..13 {
                assert!(coefficients[[k, t]].abs() < 1e-9, "k={k}");
            }
        }
    }

    #[test]
    fn test_orthonormal_energy_preserved() {
        // Parseval: full DCT preserves the column's energy.
        let n_mels = 16;
        let values: Vec<f64> = (0..n_mels).map(|i| (i as f64 * 0.7).sin()).collect();
        let log_mel = Array2::from_shape_vec((n_mels, 1), values.clone()).unwrap();

        let coefficients = mfcc(&log_mel, n_mels);

        let input_energy: f64 = values.iter().map(|v| v * v).sum();
        let output_energy: f64 = coefficients.iter().map(|v| v * v).sum();
        assert!((input_energy - output_energy).abs() < 1e-9);
    }
}
