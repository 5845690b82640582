use std::path::PathBuf;

use clap::Parser;

use gtzan::Corpus;

#[derive(Parser)]
#[clap(about = "Downloads the GTZAN-Genre corpus into the local cache.")]
struct Args {
    /// Corpus cache directory. Default "~/.gtzan".
    #[clap(short, long)]
    data_home: Option<PathBuf>,

    /// Print dataset info without downloading.
    #[clap(long, default_value_t = false, action)]
    info_only: bool,

    /// Check every canonical track against disk after the download.
    #[clap(long, default_value_t = false, action)]
    validate: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let corpus = Corpus::new(args.data_home);
    println!("{}", corpus.info());

    if args.info_only {
        return Ok(());
    }

    corpus.resolve_and_download()?;

    println!("Genre distribution:");
    for (genre, count) in corpus.genre_distribution()? {
        println!("{genre:>12}: {count}");
    }

    if args.validate {
        let (missing, total) = corpus.validate()?;
        if missing > 0 {
            println!("Missing {missing} of {total} tracks");
        } else {
            println!("All {total} tracks present");
        }
    }

    Ok(())
}
