use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

const EXACT_MATCH_EPSILON: f64 = 1e-12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Metric {
    Euclidean,
    Manhattan,
}

impl Metric {
    fn distance<'a, I>(self, a: &[f64], b: I) -> f64
    where
        I: IntoIterator<Item = &'a f64>,
    {
        match self {
            Self::Euclidean => a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f64>()
                .sqrt(),
            Self::Manhattan => a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum(),
        }
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            other => Err(format!("Unknown metric: {other}")),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Euclidean => write!(f, "euclidean"),
            Self::Manhattan => write!(f, "manhattan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    Uniform,
    Distance,
}

impl FromStr for Weighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(Self::Uniform),
            "distance" => Ok(Self::Distance),
            other => Err(format!("Unknown weighting: {other}")),
        }
    }
}

impl fmt::Display for Weighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uniform => write!(f, "uniform"),
            Self::Distance => write!(f, "distance"),
        }
    }
}

/// Brute-force k-nearest-neighbors classifier over dense feature vectors.
///
/// Labels are class indices; mapping indices to names is the caller's
/// concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnnClassifier {
    k: usize,
    metric: Metric,
    weighting: Weighting,
    samples: Array2<f64>,
    labels: Vec<usize>,
    n_classes: usize,
}

impl KnnClassifier {
    pub fn fit(
        k: usize,
        metric: Metric,
        weighting: Weighting,
        samples: Array2<f64>,
        labels: Vec<usize>,
        n_classes: usize,
    ) -> Self {
        assert!(k > 0, "Neighbor count must be positive");
        assert_eq!(
            samples.nrows(),
            labels.len(),
            "Samples and labels mismatch"
        );
        assert!(
            labels.iter().all(|&label| label < n_classes),
            "Label out of class range"
        );

        Self {
            k,
            metric,
            weighting,
            samples,
            labels,
            n_classes,
        }
    }

    /// Class probabilities for one query, aligned with class indices.
    pub fn predict_proba(&self, query: &[f64]) -> Vec<f64> {
        let mut neighbors: Vec<(f64, usize)> = self
            .samples
            .rows()
            .into_iter()
            .zip(&self.labels)
            .map(|(row, &label)| (self.metric.distance(query, row.iter()), label))
            .collect();
        neighbors.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));
        neighbors.truncate(self.k.min(neighbors.len()));

        let mut votes = vec![0.0; self.n_classes];

        if self.weighting == Weighting::Distance
            && neighbors
                .iter()
                .any(|&(distance, _)| distance < EXACT_MATCH_EPSILON)
        {
            // Exact matches dominate: only zero-distance neighbors vote.
            for &(distance, label) in &neighbors {
                if distance < EXACT_MATCH_EPSILON {
                    votes[label] += 1.0;
                }
            }
        } else {
            for &(distance, label) in &neighbors {
                votes[label] += match self.weighting {
                    Weighting::Uniform => 1.0,
                    Weighting::Distance => 1.0 / distance,
                };
            }
        }

        let total: f64 = votes.iter().sum();
        if total > 0.0 {
            for vote in &mut votes {
                *vote /= total;
            }
        }
        votes
    }

    /// Most probable class index for one query.
    pub fn predict(&self, query: &[f64]) -> usize {
        self.predict_proba(query)
            .into_iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(class, _)| class)
            .unwrap_or_default()
    }

    pub fn neighbors(&self) -> usize {
        self.k
    }
}
