use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::download;

pub const GENRES: [&str; 10] = [
    "blues",
    "classical",
    "country",
    "disco",
    "hiphop",
    "jazz",
    "metal",
    "pop",
    "reggae",
    "rock",
];

pub const TRACKS_PER_GENRE: usize = 100;

const DEFAULT_ARCHIVE_URL: &str = "https://zenodo.org/record/5920334/files/genres.tar.gz";

const AUDIO_EXTENSIONS: [&str; 2] = ["wav", "au"];

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("Corpus unavailable: {0}")]
    Unavailable(String),
    #[error("Track not found: {0}")]
    TrackNotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One corpus track, audio decoded on demand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub genre: String,
    pub audio_path: PathBuf,
}

impl Track {
    pub fn audio(&self) -> anyhow::Result<codec::Audio> {
        codec::decode_file(&self.audio_path)
    }
}

/// Local GTZAN corpus rooted at a data home, `~/.gtzan` by default.
/// Audio lives under `<data_home>/genres/<genre>/<genre>.<index>.wav`.
#[derive(Debug, Clone)]
pub struct Corpus {
    data_home: PathBuf,
    archive_url: String,
}

impl Corpus {
    pub fn new(data_home: Option<PathBuf>) -> Self {
        let data_home = data_home.unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".gtzan")
        });

        Self {
            data_home,
            archive_url: DEFAULT_ARCHIVE_URL.to_string(),
        }
    }

    pub fn with_archive_url(mut self, url: impl Into<String>) -> Self {
        self.archive_url = url.into();
        self
    }

    pub fn data_home(&self) -> &Path {
        &self.data_home
    }

    pub fn genres_dir(&self) -> PathBuf {
        self.data_home.join("genres")
    }

    pub fn is_downloaded(&self) -> bool {
        GENRES
            .iter()
            .all(|genre| self.genres_dir().join(genre).is_dir())
    }

    /// Fetch and unpack the corpus archive unless it is already present.
    pub fn resolve_and_download(&self) -> Result<(), CorpusError> {
        if self.is_downloaded() {
            println!("Corpus already present at {}", self.genres_dir().display());
            return Ok(());
        }

        std::fs::create_dir_all(&self.data_home)?;
        download::fetch_and_unpack(&self.archive_url, &self.data_home)?;

        if !self.is_downloaded() {
            return Err(CorpusError::Unavailable(format!(
                "Archive did not contain the expected layout under {}",
                self.genres_dir().display()
            )));
        }
        Ok(())
    }

    /// Sorted ids of all tracks found on disk, e.g. `blues.00042`.
    pub fn list_track_ids(&self) -> Result<Vec<String>, CorpusError> {
        let genres_dir = self.genres_dir();
        if !genres_dir.is_dir() {
            return Err(CorpusError::Unavailable(format!(
                "{} does not exist, run the download first",
                genres_dir.display()
            )));
        }

        let mut ids = Vec::new();

        let mut genre_dirs: Vec<PathBuf> = std::fs::read_dir(&genres_dir)?
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        genre_dirs.sort();

        for genre_dir in genre_dirs {
            for entry in std::fs::read_dir(&genre_dir)? {
                let path = entry?.path();
                if !is_audio_file(&path) {
                    continue;
                }
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Look a track up by id. The genre is the id prefix before the first
    /// dot.
    pub fn get_track(&self, id: &str) -> Result<Track, CorpusError> {
        let genre = id
            .split('.')
            .next()
            .filter(|genre| !genre.is_empty())
            .ok_or_else(|| CorpusError::TrackNotFound(id.to_string()))?;

        let genre_dir = self.genres_dir().join(genre);
        for extension in AUDIO_EXTENSIONS {
            let audio_path = genre_dir.join(format!("{id}.{extension}"));
            if audio_path.is_file() {
                return Ok(Track {
                    id: id.to_string(),
                    genre: genre.to_string(),
                    audio_path,
                });
            }
        }

        Err(CorpusError::TrackNotFound(id.to_string()))
    }

    pub fn list_tracks(&self) -> Result<BTreeMap<String, Track>, CorpusError> {
        self.list_track_ids()?
            .into_iter()
            .map(|id| self.get_track(&id).map(|track| (id, track)))
            .collect()
    }

    /// Number of tracks on disk per genre.
    pub fn genre_distribution(&self) -> Result<BTreeMap<String, usize>, CorpusError> {
        let mut distribution = BTreeMap::new();
        for track in self.list_tracks()?.into_values() {
            *distribution.entry(track.genre).or_insert(0) += 1;
        }
        Ok(distribution)
    }

    /// Check the canonical track list against disk: `(missing, total)`.
    pub fn validate(&self) -> Result<(usize, usize), CorpusError> {
        let total = GENRES.len() * TRACKS_PER_GENRE;
        let mut missing = 0;

        for genre in GENRES {
            for index in 0..TRACKS_PER_GENRE {
                let id = format!("{genre}.{index:05}");
                if self.get_track(&id).is_err() {
                    missing += 1;
                }
            }
        }

        Ok((missing, total))
    }

    pub fn info(&self) -> String {
        format!(
            "GTZAN-Genre: {} genres x {} tracks, 30s 22050Hz mono\n\
             Data home: {}\n\
             Source: {}",
            GENRES.len(),
            TRACKS_PER_GENRE,
            self.data_home.display(),
            self.archive_url
        )
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}
