use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Song, SongSummary};
use crate::services::RecommendError;

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub seed_songs: Vec<String>,
    pub n_recommendations: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<SongResponse>,
}

#[derive(Debug, Serialize)]
pub struct SongResponse {
    pub name: String,
    pub artists: String,
    pub year: i32,
}

impl From<SongSummary> for SongResponse {
    fn from(summary: SongSummary) -> Self {
        Self {
            name: summary.name,
            artists: summary.artists,
            year: summary.year,
        }
    }
}

impl From<&Song> for SongResponse {
    fn from(song: &Song) -> Self {
        Self {
            name: song.name.clone(),
            artists: song.artists.clone(),
            year: song.year,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Search songs by name fragment
pub async fn search_songs(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Json<Vec<SongResponse>>> {
    let query = params.q.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "search query must not be empty".to_string(),
        ));
    }

    let matches: Vec<SongResponse> = state
        .catalog
        .search(query, state.config.search_limit)
        .into_iter()
        .map(SongResponse::from)
        .collect();

    Ok(Json(matches))
}

/// Look up a single song by exact name, case-insensitively
pub async fn get_song(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> AppResult<Json<SongResponse>> {
    state
        .catalog
        .find_by_name(&name)
        .map(|song| Json(SongResponse::from(song)))
        .ok_or_else(|| AppError::NotFound(format!("no song named '{name}' in catalog")))
}

/// Recommend songs similar to the seed songs
///
/// A request that cannot produce recommendations (unknown seed under the
/// fail-batch policy, no valid seeds) comes back as an empty list rather
/// than an error; the caller treats an empty list as "nothing to
/// recommend".
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let n = request
        .n_recommendations
        .unwrap_or(state.config.default_recommendations);

    tracing::info!(
        seeds = request.seed_songs.len(),
        n_recommendations = n,
        "processing recommendation request"
    );

    let recommendations = match state.recommender.recommend(&request.seed_songs, n) {
        Ok(summaries) => summaries.into_iter().map(SongResponse::from).collect(),
        Err(RecommendError::SeedNotFound(name)) => {
            tracing::warn!(seed = %name, "seed song not in catalog, returning no recommendations");
            Vec::new()
        }
    };

    Json(RecommendResponse { recommendations })
}
