use thiserror::Error;

use crate::models::{FeatureVector, FEATURE_COUNT};

/// Errors raised while fitting the scaler
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScalerError {
    #[error("cannot fit scaler on an empty catalog")]
    EmptyInput,
}

/// Two-stage feature transform fitted once over the full catalog
///
/// Stage one range-scales each column to [0, 1] using the fitted per-column
/// min/max. Stage two standardizes each range-scaled column to zero mean and
/// unit variance using statistics computed over the range-scaled catalog.
/// Catalog rows and query vectors must pass through both stages in that
/// order; queries never influence the fitted parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureScaler {
    mins: FeatureVector,
    maxs: FeatureVector,
    means: FeatureVector,
    stds: FeatureVector,
}

impl FeatureScaler {
    /// Fits both stages over the given catalog rows
    ///
    /// Must be called exactly once, before any `transform` call. Columns
    /// with zero range collapse to 0.0 in stage one, so a constant column
    /// never divides by zero; the same holds for zero-variance columns in
    /// stage two.
    pub fn fit(rows: &[FeatureVector]) -> Result<Self, ScalerError> {
        if rows.is_empty() {
            return Err(ScalerError::EmptyInput);
        }

        let mut mins = [f64::INFINITY; FEATURE_COUNT];
        let mut maxs = [f64::NEG_INFINITY; FEATURE_COUNT];
        for row in rows {
            for (column, &value) in row.iter().enumerate() {
                mins[column] = mins[column].min(value);
                maxs[column] = maxs[column].max(value);
            }
        }

        // Standardization statistics come from the range-scaled rows, not
        // the raw ones.
        let scaled: Vec<FeatureVector> = rows
            .iter()
            .map(|row| range_scale(row, &mins, &maxs))
            .collect();

        let count = scaled.len() as f64;
        let mut means = [0.0; FEATURE_COUNT];
        for row in &scaled {
            for (column, &value) in row.iter().enumerate() {
                means[column] += value;
            }
        }
        for mean in &mut means {
            *mean /= count;
        }

        let mut stds = [0.0; FEATURE_COUNT];
        for row in &scaled {
            for (column, &value) in row.iter().enumerate() {
                stds[column] += (value - means[column]).powi(2);
            }
        }
        for std in &mut stds {
            *std = (*std / count).sqrt();
        }

        Ok(Self {
            mins,
            maxs,
            means,
            stds,
        })
    }

    /// Applies range scaling then standardization to a single vector
    ///
    /// Values outside the fitted range scale outside [0, 1]; there is no
    /// clamping. Deterministic given fitted state.
    pub fn transform(&self, vector: &FeatureVector) -> FeatureVector {
        let scaled = range_scale(vector, &self.mins, &self.maxs);

        let mut standardized = [0.0; FEATURE_COUNT];
        for (column, &value) in scaled.iter().enumerate() {
            standardized[column] = if self.stds[column] > 0.0 {
                (value - self.means[column]) / self.stds[column]
            } else {
                0.0
            };
        }
        standardized
    }

    /// Transforms every row, producing the scaled catalog matrix
    pub fn transform_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|row| self.transform(row)).collect()
    }
}

fn range_scale(vector: &FeatureVector, mins: &FeatureVector, maxs: &FeatureVector) -> FeatureVector {
    let mut scaled = [0.0; FEATURE_COUNT];
    for (column, &value) in vector.iter().enumerate() {
        let range = maxs[column] - mins[column];
        scaled[column] = if range > 0.0 {
            (value - mins[column]) / range
        } else {
            0.0
        };
    }
    scaled
}
