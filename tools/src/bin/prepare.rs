use std::path::PathBuf;

use clap::Parser;

use dataset::FeatureTable;

#[derive(Parser)]
#[clap(about = "Extracts audio features and writes stratified split CSVs.")]
struct Args {
    /// Input directory with one subdirectory per genre.
    #[clap(short, long)]
    input: PathBuf,

    /// Output directory for the CSV artifacts.
    #[clap(short, long)]
    output: PathBuf,

    /// Split RNG seed.
    #[clap(short, long, default_value_t = dataset::DEFAULT_SEED)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let table = features::extract_from_directory(&args.input)?;
    anyhow::ensure!(
        !table.is_empty(),
        "No features extracted from {}",
        args.input.display()
    );

    std::fs::create_dir_all(&args.output)?;
    table.save_csv(&args.output.join("features.csv"))?;

    let (train, val, test) = dataset::split(&table, args.seed)?;

    println!(
        "Split {} rows: train={}, val={}, test={}",
        table.len(),
        train.len(),
        val.len(),
        test.len()
    );
    for (name, subset) in [("train", &train), ("val", &val), ("test", &test)] {
        print_distribution(name, subset);
        subset.save_csv(&args.output.join(format!("{name}_features.csv")))?;
    }

    println!("Artifacts written to {}", args.output.display());

    Ok(())
}

fn print_distribution(name: &str, subset: &FeatureTable) {
    let genres = subset
        .genre_distribution()
        .into_iter()
        .map(|(genre, count)| format!("{genre}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!("{name:>5}: {genres}");
}
