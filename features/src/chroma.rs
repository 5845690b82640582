use ndarray::Array2;

use crate::config::N_CHROMA;

// A4 = 440 Hz = MIDI note 69; pitch class 0 is C.
const A4_HZ: f64 = 440.0;
const A4_MIDI: f64 = 69.0;

/// Chroma spectrogram: STFT bin energies folded onto the 12 pitch classes,
/// each frame normalized by its maximum. Shape `(12, n_frames)`.
pub fn chroma(power_spectrogram: &Array2<f64>, frequencies: &[f64]) -> Array2<f64> {
    let n_frames = power_spectrogram.ncols();
    let mut chromagram = Array2::zeros((N_CHROMA, n_frames));

    let classes: Vec<Option<usize>> = frequencies.iter().map(|&f| pitch_class(f)).collect();

    for frame in 0..n_frames {
        for (bin, class) in classes.iter().enumerate() {
            if let Some(class) = class {
                chromagram[[*class, frame]] += power_spectrogram[[bin, frame]];
            }
        }

        let peak = chromagram
            .column(frame)
            .iter()
            .copied()
            .fold(0.0f64, f64::max);
        if peak > 0.0 {
            for class in 0..N_CHROMA {
                chromagram[[class, frame]] /= peak;
            }
        }
    }

    chromagram
}

/// Pitch class of a frequency, `None` for DC and sub-audible bins.
fn pitch_class(frequency: f64) -> Option<usize> {
    if frequency < 16.0 {
        return None;
    }
    let midi = 12.0 * (frequency / A4_HZ).log2() + A4_MIDI;
    let class = (midi.round() as i64).rem_euclid(12);
    Some(class as usize)
}
