pub mod knn;
pub mod metrics;
pub mod pipeline;
pub mod scaler;

pub use knn::{KnnClassifier, Metric, Weighting};
pub use metrics::{accuracy, classification_report};
pub use pipeline::{FittedPipeline, ModelError, Pipeline, PipelineConfig};
pub use scaler::StandardScaler;
