use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::{FILENAME_COLUMN, GENRE_COLUMN};

#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Row has {found} feature values, table has {expected} feature columns")]
    ArityMismatch { expected: usize, found: usize },
    #[error("Missing expected column '{0}'")]
    MissingColumn(&'static str),
    #[error("Bad numeric value '{value}' in column '{column}'")]
    BadValue { column: String, value: String },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// One labelled feature vector: fixed-order numeric values plus the two
/// label/identifier fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub values: Vec<f64>,
    pub genre: String,
    pub filename: String,
}

/// An ordered collection of feature rows sharing one column schema.
///
/// Every row carries exactly `feature_columns.len()` values; the CSV form
/// appends `genre` and `filename` as the two trailing columns.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    feature_columns: Vec<String>,
    rows: Vec<FeatureRow>,
}

impl FeatureTable {
    pub fn new(feature_columns: Vec<String>) -> Self {
        Self {
            feature_columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: FeatureRow) -> Result<(), TableError> {
        if row.values.len() != self.feature_columns.len() {
            return Err(TableError::ArityMismatch {
                expected: self.feature_columns.len(),
                found: row.values.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }

    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    /// New table with the same schema and no rows.
    pub fn empty_like(&self) -> Self {
        Self::new(self.feature_columns.clone())
    }

    pub fn genre_distribution(&self) -> BTreeMap<String, usize> {
        let mut distribution = BTreeMap::new();
        for row in &self.rows {
            *distribution.entry(row.genre.clone()).or_insert(0) += 1;
        }
        distribution
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), TableError> {
        let mut writer = csv::Writer::from_writer(BufWriter::new(File::create(path)?));

        let mut header: Vec<&str> = self.feature_columns.iter().map(String::as_str).collect();
        header.push(GENRE_COLUMN);
        header.push(FILENAME_COLUMN);
        writer.write_record(&header)?;

        for row in &self.rows {
            let mut record: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
            record.push(row.genre.clone());
            record.push(row.filename.clone());
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn load_csv(path: &Path) -> Result<Self, TableError> {
        let mut reader = csv::Reader::from_reader(BufReader::new(File::open(path)?));

        let header: Vec<String> = reader
            .headers()?
            .iter()
            .map(ToString::to_string)
            .collect();

        if header.len() < 2 || header[header.len() - 2] != GENRE_COLUMN {
            return Err(TableError::MissingColumn(GENRE_COLUMN));
        }
        if header[header.len() - 1] != FILENAME_COLUMN {
            return Err(TableError::MissingColumn(FILENAME_COLUMN));
        }

        let feature_columns = header[..header.len() - 2].to_vec();
        let mut table = Self::new(feature_columns);

        for record in reader.records() {
            let record = record?;
            let fields: Vec<&str> = record.iter().collect();

            let values = fields[..fields.len() - 2]
                .iter()
                .zip(table.feature_columns.iter())
                .map(|(value, column)| {
                    value.parse::<f64>().map_err(|_| TableError::BadValue {
                        column: column.clone(),
                        value: (*value).to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;

            table.push(FeatureRow {
                values,
                genre: fields[fields.len() - 2].to_string(),
                filename: fields[fields.len() - 1].to_string(),
            })?;
        }

        Ok(table)
    }
}
