//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::{SearchRequest, SearchResult};
use crate::service::ServiceError;

use super::AppState;

/// Response for `GET /`
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

/// Response for `GET /health`
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error body for every non-2xx response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Upstream(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Root endpoint for health check
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: state.app.name.clone(),
        version: state.app.version.clone(),
        status: "healthy".to_string(),
    })
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}

/// Search papers on arXiv
///
/// The search runs on its own task so that a panic inside the pipeline is
/// reported as an internal error instead of dropping the connection.
pub async fn search_papers(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResult>, ServiceError> {
    let Json(request) = payload.map_err(|e| ServiceError::Validation(e.body_text()))?;

    let service = state.service.clone();
    let result = tokio::spawn(async move { service.search_papers(&request.query).await })
        .await
        .map_err(|e| {
            tracing::error!("Search task failed: {}", e);
            ServiceError::Internal(e.to_string())
        })??;

    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::SourceError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Upstream(SourceError::Network("down".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_message() {
        assert_eq!(
            ServiceError::Internal("boom".into()).to_string(),
            "Internal server error: boom"
        );
    }
}
