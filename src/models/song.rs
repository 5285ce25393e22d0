use serde::{Deserialize, Serialize};

/// Number of numeric features used for similarity calculations
pub const FEATURE_COUNT: usize = 15;

/// Canonical column order shared by the scaler and the recommender.
/// Every feature vector in the system uses exactly this order.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "valence",
    "year",
    "acousticness",
    "danceability",
    "duration_ms",
    "energy",
    "explicit",
    "instrumentalness",
    "key",
    "liveness",
    "loudness",
    "mode",
    "popularity",
    "speechiness",
    "tempo",
];

/// A song's numeric features in canonical column order
pub type FeatureVector = [f64; FEATURE_COUNT];

/// One catalog entry: identity plus the numeric audio features
///
/// Deserialized straight from the catalog CSV; columns not named here
/// (track ids, release dates) are ignored by the reader.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Song {
    pub name: String,
    pub artists: String,
    pub year: i32,
    pub valence: f64,
    pub acousticness: f64,
    pub danceability: f64,
    pub duration_ms: f64,
    pub energy: f64,
    pub explicit: f64,
    pub instrumentalness: f64,
    pub key: f64,
    pub liveness: f64,
    pub loudness: f64,
    pub mode: f64,
    pub popularity: f64,
    pub speechiness: f64,
    pub tempo: f64,
}

impl Song {
    /// Returns the song's features in canonical column order
    pub fn feature_vector(&self) -> FeatureVector {
        [
            self.valence,
            f64::from(self.year),
            self.acousticness,
            self.danceability,
            self.duration_ms,
            self.energy,
            self.explicit,
            self.instrumentalness,
            self.key,
            self.liveness,
            self.loudness,
            self.mode,
            self.popularity,
            self.speechiness,
            self.tempo,
        ]
    }

    /// Projects the entry down to the metadata returned to callers
    pub fn summary(&self) -> SongSummary {
        SongSummary {
            name: self.name.clone(),
            artists: self.artists.clone(),
            year: self.year,
        }
    }
}

/// The (name, artists, year) projection of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SongSummary {
    pub name: String,
    pub artists: String,
    pub year: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_song() -> Song {
        Song {
            name: "Clair de Lune".to_string(),
            artists: "['Claude Debussy']".to_string(),
            year: 1905,
            valence: 0.1,
            acousticness: 0.99,
            danceability: 0.3,
            duration_ms: 300_000.0,
            energy: 0.05,
            explicit: 0.0,
            instrumentalness: 0.9,
            key: 1.0,
            liveness: 0.1,
            loudness: -25.0,
            mode: 1.0,
            popularity: 60.0,
            speechiness: 0.04,
            tempo: 66.0,
        }
    }

    #[test]
    fn test_feature_vector_follows_canonical_order() {
        let song = test_song();
        let vector = song.feature_vector();

        assert_eq!(vector.len(), FEATURE_COLUMNS.len());
        assert_eq!(vector[0], song.valence);
        assert_eq!(vector[1], f64::from(song.year));
        assert_eq!(vector[4], song.duration_ms);
        assert_eq!(vector[14], song.tempo);
    }

    #[test]
    fn test_summary_projection() {
        let song = test_song();
        let summary = song.summary();

        assert_eq!(summary.name, "Clair de Lune");
        assert_eq!(summary.artists, "['Claude Debussy']");
        assert_eq!(summary.year, 1905);
    }

    #[test]
    fn test_summary_serializes_metadata_only() {
        let json = serde_json::to_value(test_song().summary()).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 3);
        assert!(object.contains_key("name"));
        assert!(object.contains_key("artists"));
        assert!(object.contains_key("year"));
    }
}
