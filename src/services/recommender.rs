use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use crate::catalog::SongCatalog;
use crate::models::{FeatureVector, SongSummary, FEATURE_COUNT};
use crate::services::scaler::FeatureScaler;

/// Error types for the recommender
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecommendError {
    #[error("seed song not found in catalog: {0}")]
    SeedNotFound(String),
}

/// What to do when a seed name has no catalog match
///
/// `FailBatch` reproduces the documented all-or-nothing behavior: one
/// unknown seed invalidates the whole request. `SkipUnknown` drops unknown
/// seeds individually and recommends from the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedPolicy {
    FailBatch,
    SkipUnknown,
}

/// Nearest-neighbor song recommender
///
/// Holds the catalog, the fitted scaler, and the catalog matrix scaled once
/// at construction. All state is immutable afterwards, so a single instance
/// serves concurrent requests without synchronization.
pub struct Recommender {
    catalog: Arc<SongCatalog>,
    scaler: FeatureScaler,
    scaled_rows: Vec<FeatureVector>,
    seed_policy: SeedPolicy,
}

impl Recommender {
    /// Creates a recommender, scaling the full catalog through the fitted
    /// transform
    pub fn new(catalog: Arc<SongCatalog>, scaler: FeatureScaler, seed_policy: SeedPolicy) -> Self {
        let scaled_rows = scaler.transform_all(&catalog.feature_matrix());
        Self {
            catalog,
            scaler,
            scaled_rows,
            seed_policy,
        }
    }

    /// Recommends up to `n` songs closest to the seed songs
    ///
    /// Seed names are resolved case-insensitively; blank entries are
    /// dropped first. The resolved feature vectors are averaged into a
    /// center, the center is scaled, and catalog entries are ranked by
    /// ascending Euclidean distance to it. Seed names and duplicate names
    /// are skipped while selecting, so the result never echoes a seed and
    /// never repeats a name. Fewer than `n` entries come back when the
    /// catalog is small or heavily excluded.
    ///
    /// An empty seed list and `n == 0` both yield an empty result. Under
    /// `SeedPolicy::FailBatch` an unresolvable seed fails the whole batch.
    pub fn recommend(
        &self,
        seed_names: &[String],
        n: usize,
    ) -> Result<Vec<SongSummary>, RecommendError> {
        let seeds: Vec<&str> = seed_names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .collect();

        if seeds.is_empty() || n == 0 {
            return Ok(Vec::new());
        }

        let mut seed_vectors = Vec::with_capacity(seeds.len());
        let mut excluded: HashSet<String> = HashSet::new();
        for name in &seeds {
            match self.catalog.find_by_name(name) {
                Some(song) => seed_vectors.push(song.feature_vector()),
                None => match self.seed_policy {
                    SeedPolicy::FailBatch => {
                        return Err(RecommendError::SeedNotFound((*name).to_string()))
                    }
                    SeedPolicy::SkipUnknown => {
                        tracing::warn!(seed = %name, "seed song not found, skipping");
                    }
                },
            }
            excluded.insert(name.to_lowercase());
        }

        if seed_vectors.is_empty() {
            return Ok(Vec::new());
        }

        let center = self.scaler.transform(&mean_vector(&seed_vectors));

        let mut ranked: Vec<(usize, f64)> = self
            .scaled_rows
            .iter()
            .enumerate()
            .map(|(index, row)| (index, euclidean_distance(&center, row)))
            .collect();
        // Stable sort: equally distant entries keep storage order.
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let songs = self.catalog.songs();
        let mut recommendations = Vec::with_capacity(n.min(songs.len()));
        for (index, _) in ranked {
            let candidate = &songs[index];
            let key = candidate.name.to_lowercase();
            if excluded.contains(&key) {
                continue;
            }
            excluded.insert(key);
            recommendations.push(candidate.summary());
            if recommendations.len() == n {
                break;
            }
        }

        tracing::debug!(
            seeds = seeds.len(),
            resolved = seed_vectors.len(),
            returned = recommendations.len(),
            "recommendation computed"
        );

        Ok(recommendations)
    }
}

/// Arithmetic column mean of the seed vectors
fn mean_vector(vectors: &[FeatureVector]) -> FeatureVector {
    let count = vectors.len() as f64;
    let mut mean = [0.0; FEATURE_COUNT];
    for vector in vectors {
        for (column, &value) in vector.iter().enumerate() {
            mean[column] += value;
        }
    }
    for value in &mut mean {
        *value /= count;
    }
    mean
}

fn euclidean_distance(a: &FeatureVector, b: &FeatureVector) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Song;

    fn song(name: &str, valence: f64) -> Song {
        Song {
            name: name.to_string(),
            artists: format!("['{name} Artist']"),
            year: 2000,
            valence,
            acousticness: 0.5,
            danceability: 0.5,
            duration_ms: 200_000.0,
            energy: 0.5,
            explicit: 0.0,
            instrumentalness: 0.0,
            key: 5.0,
            liveness: 0.1,
            loudness: -8.0,
            mode: 1.0,
            popularity: 50.0,
            speechiness: 0.05,
            tempo: 120.0,
        }
    }

    // Only valence varies, so post-normalization distances follow valence
    // differences: d(A, B) < d(A, C) < d(A, D).
    fn recommender_with(songs: Vec<Song>, policy: SeedPolicy) -> Recommender {
        let catalog = Arc::new(SongCatalog::from_songs(songs).unwrap());
        let scaler = FeatureScaler::fit(&catalog.feature_matrix()).unwrap();
        Recommender::new(catalog, scaler, policy)
    }

    fn four_song_recommender() -> Recommender {
        recommender_with(
            vec![
                song("A", 0.0),
                song("B", 0.1),
                song("C", 0.5),
                song("D", 1.0),
            ],
            SeedPolicy::FailBatch,
        )
    }

    #[test]
    fn test_ranks_by_distance_and_excludes_seed() {
        let recommender = four_song_recommender();

        let result = recommender.recommend(&["A".to_string()], 2).unwrap();
        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);
    }

    #[test]
    fn test_seed_lookup_is_case_insensitive() {
        let recommender = four_song_recommender();

        let lower = recommender.recommend(&["a".to_string()], 2).unwrap();
        let upper = recommender.recommend(&["A".to_string()], 2).unwrap();
        assert_eq!(lower, upper);
        assert!(lower.iter().all(|s| !s.name.eq_ignore_ascii_case("a")));
    }

    #[test]
    fn test_multi_seed_center_is_the_mean() {
        let recommender = four_song_recommender();

        // Center of A (0.0) and D (1.0) sits exactly on C (0.5).
        let result = recommender
            .recommend(&["A".to_string(), "D".to_string()], 2)
            .unwrap();
        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[test]
    fn test_unknown_seed_fails_the_whole_batch() {
        let recommender = four_song_recommender();

        let err = recommender
            .recommend(&["A".to_string(), "unknown-song".to_string()], 2)
            .unwrap_err();
        assert_eq!(err, RecommendError::SeedNotFound("unknown-song".to_string()));
    }

    #[test]
    fn test_skip_unknown_policy_recommends_from_remainder() {
        let recommender = recommender_with(
            vec![
                song("A", 0.0),
                song("B", 0.1),
                song("C", 0.5),
                song("D", 1.0),
            ],
            SeedPolicy::SkipUnknown,
        );

        let result = recommender
            .recommend(&["A".to_string(), "unknown-song".to_string()], 2)
            .unwrap();
        let names: Vec<&str> = result.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C"]);

        // All seeds unknown still yields an empty result, not an error.
        let empty = recommender
            .recommend(&["nope".to_string()], 2)
            .unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_empty_inputs_yield_empty_results() {
        let recommender = four_song_recommender();

        assert!(recommender.recommend(&[], 5).unwrap().is_empty());
        assert!(recommender
            .recommend(&["  ".to_string(), String::new()], 5)
            .unwrap()
            .is_empty());
        assert!(recommender.recommend(&["A".to_string()], 0).unwrap().is_empty());
    }

    #[test]
    fn test_returns_at_most_available_entries() {
        let recommender = four_song_recommender();

        // Catalog holds 4 songs, one is the seed.
        let result = recommender.recommend(&["A".to_string()], 10).unwrap();
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_duplicate_catalog_names_appear_once() {
        let recommender = recommender_with(
            vec![
                song("A", 0.0),
                song("Twin", 0.1),
                song("Twin", 0.2),
                song("C", 0.5),
            ],
            SeedPolicy::FailBatch,
        );

        let result = recommender.recommend(&["A".to_string()], 10).unwrap();
        let twins = result.iter().filter(|s| s.name == "Twin").count();
        assert_eq!(twins, 1);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_recommend_is_idempotent() {
        let recommender = four_song_recommender();

        let seeds = vec!["A".to_string(), "B".to_string()];
        let first = recommender.recommend(&seeds, 3).unwrap();
        let second = recommender.recommend(&seeds, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_carries_metadata_only_projection() {
        let recommender = four_song_recommender();

        let result = recommender.recommend(&["A".to_string()], 1).unwrap();
        assert_eq!(result[0].name, "B");
        assert_eq!(result[0].artists, "['B Artist']");
        assert_eq!(result[0].year, 2000);
    }
}
