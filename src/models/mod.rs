mod song;

pub use song::{FeatureVector, Song, SongSummary, FEATURE_COLUMNS, FEATURE_COUNT};
