use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Per-column standardization learned from training data.
///
/// Columns with zero variance keep a unit scale, so they pass through
/// centered instead of dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Array1<f64>,
    scales: Array1<f64>,
}

impl StandardScaler {
    pub fn fit(data: &Array2<f64>) -> Self {
        assert!(data.nrows() > 0, "Cannot fit a scaler on zero rows");

        let means = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(data.ncols()));
        let scales = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s > 0.0 { s } else { 1.0 });

        Self { means, scales }
    }

    pub fn transform(&self, data: &Array2<f64>) -> Array2<f64> {
        (data - &self.means) / &self.scales
    }

    pub fn transform_row(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.means.iter())
            .zip(self.scales.iter())
            .map(|((&value, &mean), &scale)| (value - mean) / scale)
            .collect()
    }

    pub fn columns(&self) -> usize {
        self.means.len()
    }
}
