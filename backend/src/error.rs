use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::league::LeagueError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl From<LeagueError> for AppError {
    fn from(err: LeagueError) -> Self {
        match err {
            LeagueError::Validation(msg) => AppError::Validation(msg),
            LeagueError::NotFound(what) => AppError::NotFound(what),
            LeagueError::Database(e) => AppError::Database(e),
            e if e.is_precondition() => AppError::BadRequest(e.to_string()),
            e => AppError::Internal(anyhow::Error::new(e)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = match &self {
            AppError::BadRequest(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(what) => format!("{} not found", what),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_errors_map_to_status() {
        let status = |err: LeagueError| AppError::from(err).into_response().status();

        assert_eq!(
            status(LeagueError::NoFixtures { week: 1 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(LeagueError::WeekIncomplete {
                week: 2,
                unplayed: 1
            }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(LeagueError::Validation("bad score".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(LeagueError::not_found("Match 3")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status(LeagueError::ContractViolation("broken".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(status(LeagueError::Cancelled), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
