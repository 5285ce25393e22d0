pub mod recommender;
pub mod scaler;

pub use recommender::{RecommendError, Recommender, SeedPolicy};
pub use scaler::{FeatureScaler, ScalerError};
