use std::path::{Path, PathBuf};

use dataset::{FeatureRow, FeatureTable};

use crate::config::{
    CONTRAST_FMIN, CONTRAST_QUANTILE, HOP_LENGTH, MAX_DURATION_SECONDS, N_CHROMA,
    N_CONTRAST_BANDS, N_FFT, N_MELS, N_MFCC, N_TONNETZ, ROLLOFF_PERCENT, SAMPLE_RATE,
};
use crate::{chroma, contrast, mel, mfcc, spectral, stft, tempo, tonnetz};

/// 13 MFCC + 4 spectral statistics + 7 contrast bands + 12 chroma bins +
/// 6 tonnetz dimensions + tempo + rms.
pub const FEATURE_COUNT: usize = N_MFCC + 4 + (N_CONTRAST_BANDS + 1) + N_CHROMA + N_TONNETZ + 2;

const ALLOWED_EXTENSIONS: [&str; 5] = ["wav", "au", "mp3", "flac", "ogg"];

const PROGRESS_EVERY: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Table(#[from] dataset::TableError),
}

/// An audio file discovered under a genre directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    pub path: PathBuf,
    pub filename: String,
    pub genre: String,
}

/// Fixed feature column names, in CSV order.
pub fn feature_names() -> Vec<String> {
    let mut names = Vec::with_capacity(FEATURE_COUNT);
    names.extend((1..=N_MFCC).map(|i| format!("mfcc_{i}")));
    names.push("spectral_centroid".to_string());
    names.push("spectral_rolloff".to_string());
    names.push("spectral_bandwidth".to_string());
    names.push("zcr".to_string());
    names.extend((1..=N_CONTRAST_BANDS + 1).map(|i| format!("spectral_contrast_{i}")));
    names.extend((1..=N_CHROMA).map(|i| format!("chroma_{i}")));
    names.extend((1..=N_TONNETZ).map(|i| format!("tonnetz_{i}")));
    names.push("tempo".to_string());
    names.push("rms".to_string());
    names
}

/// Extract the feature vector from one audio file.
///
/// Loads at most the first 30 seconds resampled to 22050 Hz mono. Any
/// failure — unreadable, undecodable, too short to analyze — is reported
/// and swallowed: a bad file yields `None`, never an error to the caller.
pub fn extract_single_file(path: &Path) -> Option<Vec<f64>> {
    let result = codec::load_analysis_audio(path, MAX_DURATION_SECONDS, SAMPLE_RATE)
        .and_then(|audio| compute_features(&audio.samples, SAMPLE_RATE));

    match result {
        Ok(values) => Some(values),
        Err(err) => {
            eprintln!("Failed to extract {}: {err:#}", path.display());
            None
        }
    }
}

/// Compute the `FEATURE_COUNT` descriptors from mono samples, as
/// time-averaged statistics over per-frame values.
pub fn compute_features(samples: &[f32], sample_rate: u32) -> anyhow::Result<Vec<f64>> {
    let spectrogram = stft::magnitude_spectrogram(samples, N_FFT, HOP_LENGTH);
    anyhow::ensure!(spectrogram.ncols() > 0, "Signal too short for analysis");

    let power = stft::power(&spectrogram);
    let frequencies = stft::fft_frequencies(sample_rate, N_FFT);

    let mel_power = mel::mel_power_spectrogram(&power, sample_rate, N_FFT, N_MELS);
    let log_mel = mel::power_to_db(&mel_power);

    let mut values = Vec::with_capacity(FEATURE_COUNT);

    let mfccs = mfcc::mfcc(&log_mel, N_MFCC);
    values.extend(mfccs.rows().into_iter().map(|row| row.mean().unwrap_or(0.0)));

    let centroids = spectral::centroid(&spectrogram, &frequencies);
    values.push(spectral::mean(&centroids));
    values.push(spectral::mean(&spectral::rolloff(
        &spectrogram,
        &frequencies,
        ROLLOFF_PERCENT,
    )));
    values.push(spectral::mean(&spectral::bandwidth(
        &spectrogram,
        &frequencies,
        &centroids,
    )));
    values.push(spectral::mean(&spectral::zero_crossing_rate(
        samples, N_FFT, HOP_LENGTH,
    )));

    let contrasts = contrast::spectral_contrast(
        &power,
        &frequencies,
        CONTRAST_FMIN,
        N_CONTRAST_BANDS,
        CONTRAST_QUANTILE,
    );
    values.extend(
        contrasts
            .rows()
            .into_iter()
            .map(|row| row.mean().unwrap_or(0.0)),
    );

    let chromagram = chroma::chroma(&power, &frequencies);
    values.extend(
        chromagram
            .rows()
            .into_iter()
            .map(|row| row.mean().unwrap_or(0.0)),
    );

    let centroids6 = tonnetz::tonnetz(&chromagram);
    values.extend(
        centroids6
            .rows()
            .into_iter()
            .map(|row| row.mean().unwrap_or(0.0)),
    );

    values.push(tempo::estimate_tempo(
        &tempo::onset_strength(&log_mel),
        sample_rate,
        HOP_LENGTH,
    ));
    values.push(spectral::mean(&spectral::rms(samples, N_FFT, HOP_LENGTH)));

    debug_assert_eq!(FEATURE_COUNT, values.len());
    anyhow::ensure!(
        values.iter().all(|v| v.is_finite()),
        "Non-finite feature value"
    );

    Ok(values)
}

/// List audio files under `root`, where each immediate subdirectory is a
/// genre label. Files are sorted within each genre for determinism.
pub fn list_audio_files(root: &Path) -> Result<Vec<AudioFile>, ExtractError> {
    if !root.is_dir() {
        return Err(ExtractError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut genre_dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    genre_dirs.sort();

    let mut files = Vec::new();

    for genre_dir in genre_dirs {
        let Some(genre) = genre_dir.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let genre = genre.to_string();

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&genre_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && has_allowed_extension(path))
            .collect();
        paths.sort();

        for path in paths {
            let Some(filename) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            files.push(AudioFile {
                filename: filename.to_string(),
                genre: genre.clone(),
                path,
            });
        }
    }

    Ok(files)
}

fn has_allowed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// Extract features for every audio file under `root` into one table.
///
/// Files that fail extraction are dropped; the result can be empty when no
/// file survives, and callers must check before proceeding.
pub fn extract_from_directory(root: &Path) -> Result<FeatureTable, ExtractError> {
    let files = list_audio_files(root)?;
    let genres = files
        .iter()
        .map(|f| f.genre.as_str())
        .collect::<std::collections::BTreeSet<_>>();
    println!(
        "Found {} audio files in {} genres",
        files.len(),
        genres.len()
    );

    let mut table = FeatureTable::new(feature_names());

    for (i, file) in files.iter().enumerate() {
        if let Some(values) = extract_single_file(&file.path) {
            table.push(FeatureRow {
                values,
                genre: file.genre.clone(),
                filename: file.filename.clone(),
            })?;
        }

        if (i + 1) % PROGRESS_EVERY == 0 {
            println!("  {}/{} files processed", i + 1, files.len());
        }
    }

    println!(
        "Extracted {} samples x {} features",
        table.len(),
        table.feature_columns().len()
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_count_and_names() {
        assert_eq!(44, FEATURE_COUNT);

        let names = feature_names();
        assert_eq!(FEATURE_COUNT, names.len());
        assert_eq!("mfcc_1", names[0]);
        assert_eq!("spectral_centroid", names[13]);
        assert_eq!("zcr", names[16]);
        assert_eq!("spectral_contrast_7", names[23]);
        assert_eq!("chroma_12", names[35]);
        assert_eq!("tonnetz_6", names[41]);
        assert_eq!("tempo", names[42]);
        assert_eq!("rms", names[43]);
    }

    #[test]
    fn test_compute_features_on_tone() {
        let sample_rate = 22050;
        let samples: Vec<f32> = (0..sample_rate as usize * 2)
            .map(|i| {
                let t = i as f64 / f64::from(sample_rate);
                (2.0 * std::f64::consts::PI * 440.0 * t).sin() as f32
            })
            .collect();

        let values = compute_features(&samples, sample_rate).unwrap();

        assert_eq!(FEATURE_COUNT, values.len());
        assert!(values.iter().all(|v| v.is_finite()));

        // A 440 Hz tone centers its spectrum near 440 Hz.
        let centroid = values[13];
        assert!((centroid - 440.0).abs() < 150.0, "centroid {centroid}");
        // RMS of a unit sine.
        let rms = values[43];
        assert!((rms - 1.0 / 2.0f64.sqrt()).abs() < 0.02, "rms {rms}");
    }

    #[test]
    fn test_compute_features_deterministic() {
        let samples: Vec<f32> = (0..44100).map(|i| ((i % 100) as f32 - 50.0) / 50.0).collect();
        assert_eq!(
            compute_features(&samples, 22050).unwrap(),
            compute_features(&samples, 22050).unwrap()
        );
    }

    #[test]
    fn test_compute_features_rejects_empty_signal() {
        // Zero samples produce frames of pure padding, but stay finite;
        // the truly degenerate case is no frames at all, which cannot
        // happen after padding, so an empty signal still yields a vector.
        let values = compute_features(&[], 22050).unwrap();
        assert_eq!(FEATURE_COUNT, values.len());
    }

    #[test]
    fn test_extract_single_file_missing_path() {
        assert!(extract_single_file(Path::new("/nonexistent/file.wav")).is_none());
    }

    #[test]
    fn test_list_audio_files_missing_root() {
        let result = list_audio_files(Path::new("/nonexistent/genres"));
        assert!(matches!(result, Err(ExtractError::DirectoryNotFound(_))));
    }

    #[test]
    fn test_list_audio_files_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        for genre in ["rock", "blues"] {
            std::fs::create_dir(root.join(genre)).unwrap();
        }
        for name in ["blues.00001.wav", "blues.00000.wav", "notes.txt"] {
            std::fs::write(root.join("blues").join(name), b"").unwrap();
        }
        std::fs::write(root.join("rock").join("rock.00000.au"), b"").unwrap();
        std::fs::write(root.join("stray.wav"), b"").unwrap();

        let files = list_audio_files(root).unwrap();

        // Genres sorted, files sorted within genre, non-audio and
        // top-level strays ignored.
        assert_eq!(3, files.len());
        assert_eq!("blues.00000.wav", files[0].filename);
        assert_eq!("blues.00001.wav", files[1].filename);
        assert_eq!("rock.00000.au", files[2].filename);
        assert_eq!("blues", files[0].genre);
        assert_eq!("rock", files[2].genre);
    }
}
