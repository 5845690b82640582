use std::path::Path;

use features::{extract_from_directory, feature_names, list_audio_files, ExtractError, FEATURE_COUNT};

fn write_wav(path: &Path, frequency: f64, seconds: f64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 22050,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..(22050.0 * seconds) as usize {
        let t = i as f64 / 22050.0;
        let sample = (2.0 * std::f64::consts::PI * frequency * t).sin() * 0.5;
        writer
            .write_sample((sample * f64::from(i16::MAX)) as i16)
            .unwrap();
    }
    writer.finalize().unwrap();
}

fn genre_directory(tracks_per_genre: usize) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (genre, frequency) in [("blues", 220.0), ("rock", 660.0)] {
        let genre_dir = dir.path().join(genre);
        std::fs::create_dir(&genre_dir).unwrap();
        for index in 0..tracks_per_genre {
            write_wav(
                &genre_dir.join(format!("{genre}.{index:05}.wav")),
                frequency + index as f64 * 5.0,
                2.0,
            );
        }
    }
    dir
}

#[test]
fn extracts_every_valid_file() {
    let dir = genre_directory(3);

    let table = extract_from_directory(dir.path()).unwrap();

    assert_eq!(6, table.len());
    assert_eq!(feature_names(), table.feature_columns());

    let distribution = table.genre_distribution();
    assert_eq!(3, distribution["blues"]);
    assert_eq!(3, distribution["rock"]);

    for row in table.rows() {
        assert_eq!(FEATURE_COUNT, row.values.len());
        assert!(row.values.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn corrupt_file_is_skipped() {
    let dir = genre_directory(3);
    std::fs::write(dir.path().join("rock").join("rock.00099.wav"), b"garbage").unwrap();

    let table = extract_from_directory(dir.path()).unwrap();

    // 6 good files plus one corrupt one: the bad file is dropped.
    assert_eq!(6, table.len());
    assert_eq!(3, table.genre_distribution()["rock"]);
}

#[test]
fn missing_directory_is_an_error() {
    let result = extract_from_directory(Path::new("/nonexistent/genres"));
    assert!(matches!(result, Err(ExtractError::DirectoryNotFound(_))));
}

#[test]
fn rows_follow_listing_order() {
    let dir = genre_directory(2);

    let files = list_audio_files(dir.path()).unwrap();
    let table = extract_from_directory(dir.path()).unwrap();

    let filenames: Vec<&str> = table.rows().iter().map(|r| r.filename.as_str()).collect();
    let expected: Vec<&str> = files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(expected, filenames);
}
