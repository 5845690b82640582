mod split;
mod table;

pub use split::{split, SplitError, DEFAULT_SEED};
pub use table::{FeatureRow, FeatureTable, TableError};

pub const GENRE_COLUMN: &str = "genre";
pub const FILENAME_COLUMN: &str = "filename";
