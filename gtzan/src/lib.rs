//! Accessor for the GTZAN-Genre corpus: 10 genres, 100 tracks each,
//! 30 seconds of 22050 Hz mono audio per track.

mod corpus;
mod download;

pub use corpus::{Corpus, CorpusError, Track, GENRES, TRACKS_PER_GENRE};
