use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::{FeatureTable, TableError};

pub const DEFAULT_SEED: u64 = 42;

/// Number of target subsets; every genre needs at least this many rows for
/// stratification to be feasible.
const SUBSETS: usize = 3;

const TEST_FRACTION: f64 = 0.2;
const VAL_FRACTION_OF_REMAINDER: f64 = 0.25;

#[derive(Debug, thiserror::Error)]
pub enum SplitError {
    #[error("Table has no genre labels to stratify on")]
    MissingGenreColumn,
    #[error("Insufficient samples for a stratified split: {0}")]
    InsufficientSamples(String),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Stratified train/val/test split with target proportions 60/20/20.
///
/// Two successive partitions per genre: 20% of rows go to `test`, then 25%
/// of the remainder to `val`. The result is a pure function of
/// `(table, seed)`; genres are processed in sorted order and all shuffling
/// comes from one seeded RNG stream.
pub fn split(
    table: &FeatureTable,
    seed: u64,
) -> Result<(FeatureTable, FeatureTable, FeatureTable), SplitError> {
    if table.is_empty() {
        return Err(SplitError::MissingGenreColumn);
    }

    let by_genre = group_by_genre(table);

    if by_genre.len() < 2 {
        return Err(SplitError::InsufficientSamples(format!(
            "need at least 2 genres, found {}",
            by_genre.len()
        )));
    }

    for (genre, indices) in &by_genre {
        if indices.len() < SUBSETS {
            return Err(SplitError::InsufficientSamples(format!(
                "genre '{genre}' has {} rows, need at least {SUBSETS}",
                indices.len()
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);

    let mut train = table.empty_like();
    let mut val = table.empty_like();
    let mut test = table.empty_like();

    for indices in by_genre.into_values() {
        let mut indices = indices;
        indices.shuffle(&mut rng);

        let n_test = carve(indices.len(), TEST_FRACTION);
        let remainder = indices.len() - n_test;
        let n_val = carve(remainder, VAL_FRACTION_OF_REMAINDER);

        let (test_part, rest) = indices.split_at(n_test);
        let (val_part, train_part) = rest.split_at(n_val);

        for &i in test_part {
            test.push(table.rows()[i].clone())?;
        }
        for &i in val_part {
            val.push(table.rows()[i].clone())?;
        }
        for &i in train_part {
            train.push(table.rows()[i].clone())?;
        }
    }

    Ok((train, val, test))
}

/// Rows to carve off for a subset, at least one per genre.
fn carve(count: usize, fraction: f64) -> usize {
    ((count as f64 * fraction).round() as usize).max(1)
}

fn group_by_genre(table: &FeatureTable) -> BTreeMap<String, Vec<usize>> {
    let mut by_genre: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        by_genre.entry(row.genre.clone()).or_default().push(i);
    }
    by_genre
}
