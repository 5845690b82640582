pub mod chroma;
pub mod config;
pub mod contrast;
pub mod extract;
pub mod mel;
pub mod mfcc;
pub mod spectral;
pub mod stft;
pub mod tempo;
pub mod tonnetz;

pub use extract::{
    compute_features, extract_from_directory, extract_single_file, feature_names,
    list_audio_files, AudioFile, ExtractError, FEATURE_COUNT,
};
