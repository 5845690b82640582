use std::f64::consts::PI;

use ndarray::Array2;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Centered magnitude spectrogram, shape `(n_fft / 2 + 1, n_frames)`.
///
/// The signal is reflect-padded by `n_fft / 2` on both sides so frame `t`
/// is centered on sample `t * hop_length`, and each frame is Hann-windowed.
pub fn magnitude_spectrogram(signal: &[f32], n_fft: usize, hop_length: usize) -> Array2<f64> {
    let padded = reflect_pad(signal, n_fft / 2);

    let n_bins = n_fft / 2 + 1;
    let n_frames = if padded.len() >= n_fft {
        (padded.len() - n_fft) / hop_length + 1
    } else {
        0
    };

    let window = hann_window(n_fft);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n_fft);

    let mut spectrogram = Array2::zeros((n_bins, n_frames));
    let mut buffer = vec![Complex::new(0.0, 0.0); n_fft];

    for frame in 0..n_frames {
        let start = frame * hop_length;
        for (i, slot) in buffer.iter_mut().enumerate() {
            *slot = Complex::new(padded[start + i] * window[i], 0.0);
        }

        fft.process(&mut buffer);

        for bin in 0..n_bins {
            spectrogram[[bin, frame]] = buffer[bin].norm();
        }
    }

    spectrogram
}

pub fn power(spectrogram: &Array2<f64>) -> Array2<f64> {
    spectrogram.mapv(|m| m * m)
}

/// Center frequency of every FFT bin.
pub fn fft_frequencies(sample_rate: u32, n_fft: usize) -> Vec<f64> {
    (0..=n_fft / 2)
        .map(|bin| bin as f64 * f64::from(sample_rate) / n_fft as f64)
        .collect()
}

/// Periodic Hann window.
fn hann_window(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / n as f64).cos()))
        .collect()
}

fn reflect_pad(signal: &[f32], pad: usize) -> Vec<f64> {
    let len = signal.len();
    if len == 0 {
        return vec![0.0; 2 * pad];
    }

    (0..len + 2 * pad)
        .map(|i| f64::from(signal[reflect_index(i as isize - pad as isize, len)]))
        .collect()
}

/// Reflect an out-of-range position back into `0..len` without repeating
/// the edge sample.
fn reflect_index(position: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let wrapped = position.rem_euclid(period);
    let index = if wrapped < len as isize {
        wrapped
    } else {
        period - wrapped
    };
    index as usize
}
