use crate::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::DynastyStore;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct StandingsPathParams {
    dynasty_id: String,
    season: i32,
}

/// Every team's standings row for one season, unsorted — callers pick
/// their own ordering (win pct, division, etc).
pub async fn standings_get_action(State(state): State<AppState>, Path(params): Path<StandingsPathParams>) -> ApiResult<Response> {
    let StandingsPathParams { dynasty_id, season } = params;
    let rows = state.store.read(
        &dynasty_id,
        Box::new(move |tables| {
            tables
                .standings
                .iter()
                .filter(|(&(s, _), _)| s == season)
                .map(|(_, row)| row.clone())
                .collect::<Vec<_>>()
        }),
    )?;
    Ok(Json(rows).into_response())
}
