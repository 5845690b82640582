use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use dataset::FeatureTable;

use crate::knn::{KnnClassifier, Metric, Weighting};
use crate::scaler::StandardScaler;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Cannot fit on an empty training set")]
    EmptyTrainingSet,
    #[error("Expected {expected} feature values, got {actual}")]
    ArityMismatch { expected: usize, actual: usize },
    #[error("File does not contain a fitted model")]
    NotFitted,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize model: {0}")]
    Serialize(bincode::Error),
}

/// Scale and neighbor settings for a pipeline, fixed at construction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub neighbors: usize,
    pub metric: Metric,
    pub weighting: Weighting,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            neighbors: 10,
            metric: Metric::Manhattan,
            weighting: Weighting::Distance,
        }
    }
}

/// An unfit standardize+KNN pipeline. `fit` consumes it and yields a
/// [`FittedPipeline`]; prediction and persistence exist only on the fitted
/// form.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn fit(self, table: &FeatureTable) -> Result<FittedPipeline, ModelError> {
        if table.is_empty() {
            return Err(ModelError::EmptyTrainingSet);
        }

        let classes: Vec<String> = table
            .rows()
            .iter()
            .map(|row| row.genre.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let columns = table.feature_columns().len();
        let mut matrix = Array2::zeros((table.len(), columns));
        let mut labels = Vec::with_capacity(table.len());

        for (index, row) in table.rows().iter().enumerate() {
            for (column, &value) in row.values.iter().enumerate() {
                matrix[[index, column]] = value;
            }
            // Safe: classes was built from these very rows.
            let label = classes
                .binary_search(&row.genre)
                .unwrap_or_default();
            labels.push(label);
        }

        let scaler = StandardScaler::fit(&matrix);
        let scaled = scaler.transform(&matrix);

        let knn = KnnClassifier::fit(
            self.config.neighbors,
            self.config.metric,
            self.config.weighting,
            scaled,
            labels,
            classes.len(),
        );

        Ok(FittedPipeline {
            config: self.config,
            feature_columns: table.feature_columns().to_vec(),
            classes,
            scaler,
            knn,
        })
    }
}

/// A fitted pipeline: scaler statistics, classifier state and class names
/// in one persistable blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FittedPipeline {
    config: PipelineConfig,
    feature_columns: Vec<String>,
    classes: Vec<String>,
    scaler: StandardScaler,
    knn: KnnClassifier,
}

impl FittedPipeline {
    /// Predicted class name for one raw (unscaled) feature vector.
    pub fn predict(&self, values: &[f64]) -> Result<&str, ModelError> {
        self.check_arity(values)?;
        let scaled = self.scaler.transform_row(values);
        Ok(&self.classes[self.knn.predict(&scaled)])
    }

    /// Class probabilities aligned with [`Self::classes`].
    pub fn predict_proba(&self, values: &[f64]) -> Result<Vec<f64>, ModelError> {
        self.check_arity(values)?;
        let scaled = self.scaler.transform_row(values);
        Ok(self.knn.predict_proba(&scaled))
    }

    /// Fraction of rows whose predicted genre matches the label.
    pub fn evaluate(&self, table: &FeatureTable) -> Result<f64, ModelError> {
        if table.is_empty() {
            return Ok(0.0);
        }

        let mut correct = 0;
        for row in table.rows() {
            if self.predict(&row.values)? == row.genre {
                correct += 1;
            }
        }
        Ok(f64::from(correct) / table.len() as f64)
    }

    /// Predicted genre for every row, in table order.
    pub fn predict_table(&self, table: &FeatureTable) -> Result<Vec<String>, ModelError> {
        table
            .rows()
            .iter()
            .map(|row| self.predict(&row.values).map(String::from))
            .collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self).map_err(ModelError::Serialize)
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let reader = BufReader::new(File::open(path)?);
        bincode::deserialize_from(reader).map_err(|_| ModelError::NotFitted)
    }

    fn check_arity(&self, values: &[f64]) -> Result<(), ModelError> {
        if values.len() == self.feature_columns.len() {
            Ok(())
        } else {
            Err(ModelError::ArityMismatch {
                expected: self.feature_columns.len(),
                actual: values.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dataset::FeatureRow;

    fn toy_table() -> FeatureTable {
        let mut table = FeatureTable::new(vec!["a".to_string(), "b".to_string()]);
        let rows = [
            (vec![0.0, 0.0], "blues"),
            (vec![0.1, 0.1], "blues"),
            (vec![0.2, 0.0], "blues"),
            (vec![5.0, 5.0], "rock"),
            (vec![5.1, 5.1], "rock"),
            (vec![5.2, 5.0], "rock"),
        ];
        for (values, genre) in rows {
            table
                .push(FeatureRow {
                    values,
                    genre: genre.to_string(),
                    filename: format!("{genre}.wav"),
                })
                .unwrap();
        }
        table
    }

    fn toy_config() -> PipelineConfig {
        PipelineConfig {
            neighbors: 3,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_fit_rejects_empty_table() {
        let table = FeatureTable::new(vec!["a".to_string()]);
        let result = Pipeline::new(PipelineConfig::default()).fit(&table);
        assert!(matches!(result, Err(ModelError::EmptyTrainingSet)));
    }

    #[test]
    fn test_fit_and_predict() {
        let fitted = Pipeline::new(toy_config()).fit(&toy_table()).unwrap();

        assert_eq!(vec!["blues".to_string(), "rock".to_string()], fitted.classes());
        assert_eq!("blues", fitted.predict(&[0.1, 0.0]).unwrap());
        assert_eq!("rock", fitted.predict(&[5.0, 5.2]).unwrap());
    }

    #[test]
    fn test_predict_proba_aligned_with_classes() {
        let fitted = Pipeline::new(toy_config()).fit(&toy_table()).unwrap();

        let proba = fitted.predict_proba(&[0.1, 0.0]).unwrap();
        assert_eq!(fitted.classes().len(), proba.len());
        assert!((proba.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(proba[0] > proba[1]);
    }

    #[test]
    fn test_arity_mismatch() {
        let fitted = Pipeline::new(toy_config()).fit(&toy_table()).unwrap();
        let result = fitted.predict(&[1.0]);
        assert!(matches!(
            result,
            Err(ModelError::ArityMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_evaluate_on_training_data() {
        let fitted = Pipeline::new(toy_config()).fit(&toy_table()).unwrap();
        let accuracy = fitted.evaluate(&toy_table()).unwrap();
        assert_eq!(1.0, accuracy);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");

        let fitted = Pipeline::new(toy_config()).fit(&toy_table()).unwrap();
        fitted.save(&path).unwrap();
        let loaded = FittedPipeline::load(&path).unwrap();

        assert_eq!(fitted.classes(), loaded.classes());
        for query in [[0.1, 0.0], [2.5, 2.5], [5.0, 5.2]] {
            assert_eq!(
                fitted.predict(&query).unwrap(),
                loaded.predict(&query).unwrap()
            );
            assert_eq!(
                fitted.predict_proba(&query).unwrap(),
                loaded.predict_proba(&query).unwrap()
            );
        }
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        std::fs::write(&path, b"not a model").unwrap();

        let result = FittedPipeline::load(&path);
        assert!(matches!(result, Err(ModelError::NotFitted)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = FittedPipeline::load(Path::new("/nonexistent/model.bin"));
        assert!(matches!(result, Err(ModelError::Io(_))));
    }
}
