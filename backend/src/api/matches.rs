use axum::{
    extract::{Path, State},
    response::Redirect,
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};

use super::AppState;

/// Scores arrive as raw strings so malformed input becomes a 400 with a
/// readable message.
#[derive(Debug, Deserialize)]
pub struct EditResultForm {
    pub home_score: Option<String>,
    pub guest_score: Option<String>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/matches/:id/edit", post(edit_result))
}

fn parse_score(field: &str, value: Option<&str>) -> Result<i64> {
    let raw = value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("{} is required", field)))?;

    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a whole number, got '{}'", field, raw)))
}

async fn edit_result(
    State(state): State<Arc<AppState>>,
    Path(match_id): Path<i64>,
    Form(form): Form<EditResultForm>,
) -> Result<Redirect> {
    let home_score = parse_score("home_score", form.home_score.as_deref())?;
    let guest_score = parse_score("guest_score", form.guest_score.as_deref())?;

    let _guard = state.write_lock.lock().await;

    let season = state.league.current_season().await?;
    state
        .league
        .edit_result(season.id, match_id, home_score, guest_score, &state.shutdown)
        .await?;

    Ok(Redirect::to("/matches"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("home_score", Some(" 4 ")).unwrap(), 4);
        assert_eq!(parse_score("home_score", Some("-1")).unwrap(), -1);
        assert!(matches!(
            parse_score("home_score", Some("two")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_score("guest_score", Some("")),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            parse_score("guest_score", None),
            Err(AppError::BadRequest(_))
        ));
    }
}
