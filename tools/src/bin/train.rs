use std::path::PathBuf;

use clap::Parser;

use dataset::FeatureTable;
use trainer::{Metric, Pipeline, PipelineConfig, Weighting};

#[derive(Parser)]
#[clap(about = "Trains the genre classifier on prepared split CSVs.")]
struct Args {
    /// Directory containing the train/val/test feature CSVs.
    #[clap(short, long)]
    data: PathBuf,

    /// Output model file.
    #[clap(short, long, default_value = "model.knn")]
    model: PathBuf,

    /// Number of neighbors.
    #[clap(short, long, default_value_t = 10)]
    neighbors: usize,

    /// Distance metric: euclidean or manhattan.
    #[clap(long, default_value_t = Metric::Manhattan)]
    metric: Metric,

    /// Neighbor weighting: uniform or distance.
    #[clap(long, default_value_t = Weighting::Distance)]
    weighting: Weighting,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let train = FeatureTable::load_csv(&args.data.join("train_features.csv"))?;
    let val = FeatureTable::load_csv(&args.data.join("val_features.csv"))?;
    let test = FeatureTable::load_csv(&args.data.join("test_features.csv"))?;

    println!(
        "Training on {} samples x {} features, k={}, {} metric, {} weighting",
        train.len(),
        train.feature_columns().len(),
        args.neighbors,
        args.metric,
        args.weighting
    );

    let pipeline = Pipeline::new(PipelineConfig {
        neighbors: args.neighbors,
        metric: args.metric,
        weighting: args.weighting,
    });
    let fitted = pipeline.fit(&train)?;

    let val_accuracy = fitted.evaluate(&val)?;
    println!("Validation accuracy: {:.2}%", val_accuracy * 100.0);

    let predicted = fitted.predict_table(&test)?;
    let actual: Vec<String> = test.rows().iter().map(|row| row.genre.clone()).collect();
    println!("Test set report:");
    println!("{}", trainer::classification_report(&predicted, &actual));

    fitted.save(&args.model)?;
    println!("Model saved to {}", args.model.display());

    Ok(())
}
