use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::models::{FeatureVector, Song, FEATURE_COLUMNS};

/// Errors raised while loading the song catalog
///
/// All variants are fatal at startup: a catalog that cannot be read in
/// full is rejected rather than partially loaded.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Read(#[from] csv::Error),

    #[error("catalog record {row} is malformed: {source}")]
    Malformed {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("catalog record {row} has a non-finite value in column `{column}`")]
    NonFinite { row: usize, column: &'static str },

    #[error("catalog contains no songs")]
    Empty,
}

/// Immutable collection of songs, loaded once at startup
///
/// Lookup and search compare names case-insensitively. When several songs
/// share a name, the first one in storage order wins; this is the
/// documented tie policy, not an accident of iteration.
#[derive(Debug)]
pub struct SongCatalog {
    songs: Vec<Song>,
}

impl SongCatalog {
    /// Loads the catalog from a CSV file
    ///
    /// Every record must carry all required columns with numeric feature
    /// values. A single bad record aborts the load; rows are never
    /// silently dropped or defaulted.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let reader = csv::Reader::from_path(path)?;
        Self::from_reader(reader)
    }

    /// Loads the catalog from any CSV source, e.g. an in-memory buffer
    pub fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, CatalogError> {
        let mut songs = Vec::new();

        for (index, record) in reader.deserialize::<Song>().enumerate() {
            // 1-based data record number, header excluded
            let row = index + 1;
            let song = record.map_err(|source| CatalogError::Malformed { row, source })?;

            for (column, value) in FEATURE_COLUMNS.iter().copied().zip(song.feature_vector()) {
                if !value.is_finite() {
                    return Err(CatalogError::NonFinite { row, column });
                }
            }

            songs.push(song);
        }

        Self::from_songs(songs)
    }

    /// Builds a catalog from already-constructed songs
    pub fn from_songs(songs: Vec<Song>) -> Result<Self, CatalogError> {
        if songs.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { songs })
    }

    /// Finds a song by exact name, case-insensitively
    ///
    /// Returns the first match in storage order, or `None` when no entry
    /// matches.
    pub fn find_by_name(&self, name: &str) -> Option<&Song> {
        let needle = name.to_lowercase();
        self.songs.iter().find(|song| song.name.to_lowercase() == needle)
    }

    /// Finds songs whose name contains the query, case-insensitively
    ///
    /// Results keep storage order and are capped at `limit`. An empty
    /// query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&Song> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.songs
            .iter()
            .filter(|song| song.name.to_lowercase().contains(&needle))
            .take(limit)
            .collect()
    }

    /// All catalog entries in storage order
    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    /// Feature vectors for all entries, in storage order
    pub fn feature_matrix(&self) -> Vec<FeatureVector> {
        self.songs.iter().map(Song::feature_vector).collect()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}
