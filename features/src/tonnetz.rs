use std::f64::consts::PI;

use ndarray::Array2;

use crate::config::{N_CHROMA, N_TONNETZ};

/// Tonal centroid (tonnetz) features from a chroma spectrogram.
///
/// Each L1-normalized chroma frame is projected onto three circles —
/// fifths (r=1), minor thirds (r=1) and major thirds (r=0.5) — giving a
/// 6-D sin/cos coordinate per frame. Shape `(6, n_frames)`.
pub fn tonnetz(chromagram: &Array2<f64>) -> Array2<f64> {
    let n_frames = chromagram.ncols();
    let basis = transform_basis();

    let mut centroids = Array2::zeros((N_TONNETZ, n_frames));

    for frame in 0..n_frames {
        let column = chromagram.column(frame);
        let total: f64 = column.iter().map(|c| c.abs()).sum();
        if total <= 0.0 {
            continue;
        }

        for dim in 0..N_TONNETZ {
            centroids[[dim, frame]] = column
                .iter()
                .enumerate()
                .map(|(class, &energy)| basis[[dim, class]] * energy / total)
                .sum();
        }
    }

    centroids
}

fn transform_basis() -> Array2<f64> {
    // Angular step per pitch class on each interval circle.
    let angles = [
        7.0 * PI / 6.0, // circle of fifths
        3.0 * PI / 2.0, // minor thirds
        2.0 * PI / 3.0, // major thirds
    ];
    let radii = [1.0, 1.0, 0.5];

    let mut basis = Array2::zeros((N_TONNETZ, N_CHROMA));
    for (circle, (&angle, &radius)) in angles.iter().zip(&radii).enumerate() {
        for class in 0..N_CHROMA {
            let phase = angle * class as f64;
            basis[[2 * circle, class]] = radius * phase.sin();
            basis[[2 * circle + 1, class]] = radius * phase.cos();
        }
    }
    basis
}
