use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use kdam::{tqdm, BarExt};

use crate::corpus::CorpusError;

const CHUNK: usize = 64 * 1024;

/// Download a `.tar.gz` archive into `destination` and unpack it there.
/// The archive file itself is removed after a successful unpack.
pub fn fetch_and_unpack(url: &str, destination: &Path) -> Result<(), CorpusError> {
    let archive_path = destination.join("genres.tar.gz");

    println!("Downloading {url}");
    download_to(url, &archive_path)?;

    println!("Unpacking {}", archive_path.display());
    let reader = BufReader::new(File::open(&archive_path)?);
    tar::Archive::new(GzDecoder::new(reader))
        .unpack(destination)
        .map_err(|err| CorpusError::Unavailable(format!("Failed to unpack archive: {err}")))?;

    std::fs::remove_file(&archive_path)?;
    Ok(())
}

fn download_to(url: &str, path: &Path) -> Result<(), CorpusError> {
    let mut response = reqwest::blocking::get(url)
        .map_err(|err| CorpusError::Unavailable(err.to_string()))?;

    if !response.status().is_success() {
        return Err(CorpusError::Unavailable(format!(
            "HTTP {} for {url}",
            response.status()
        )));
    }

    let total = response.content_length().unwrap_or(0) as usize;
    let mut pb = tqdm!(
        total = total,
        desc = "genres.tar.gz",
        unit = "B",
        unit_scale = true
    );

    let mut file = File::create(path)?;
    let mut buffer = [0u8; CHUNK];
    loop {
        let read = response
            .read(&mut buffer)
            .map_err(|err| CorpusError::Unavailable(err.to_string()))?;
        if read == 0 {
            break;
        }
        file.write_all(&buffer[..read])?;
        pb.update(read)?;
    }
    file.flush()?;
    eprintln!();

    Ok(())
}
