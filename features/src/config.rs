pub const SAMPLE_RATE: u32 = 22050;

// FFT 2048 / hop 512 matches the analysis defaults the feature set was
// calibrated against.
pub const N_FFT: usize = 2048;
pub const HOP_LENGTH: usize = 512;
pub const N_MELS: usize = 128;

pub const N_MFCC: usize = 13;
pub const N_CHROMA: usize = 12;
pub const N_TONNETZ: usize = 6;

// 6 octave bands above CONTRAST_FMIN plus the sub-band below it.
pub const N_CONTRAST_BANDS: usize = 6;
pub const CONTRAST_FMIN: f64 = 200.0;
pub const CONTRAST_QUANTILE: f64 = 0.02;

pub const ROLLOFF_PERCENT: f64 = 0.85;

pub const MAX_DURATION_SECONDS: f64 = 30.0;

pub const MIN_TEMPO: f64 = 30.0;
pub const MAX_TEMPO: f64 = 300.0;
pub const TEMPO_PRIOR_BPM: f64 = 120.0;
