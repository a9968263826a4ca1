use crate::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::playoff;
use dynasty_core::DynastyStore;
use dynasty_core::Event;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct PlayoffsPathParams {
    dynasty_id: String,
    season: i32,
}

#[derive(Serialize)]
pub struct BracketViewModel {
    pub scheduled_rounds: Vec<String>,
    pub games: Vec<Event>,
}

/// Bracket state for a season, recomputed from event rows rather than a
/// stored bracket table (see `playoff.rs`'s progressive-scheduling design).
pub async fn playoffs_get_action(State(state): State<AppState>, Path(params): Path<PlayoffsPathParams>) -> ApiResult<Response> {
    let PlayoffsPathParams { dynasty_id, season } = params;
    let model = state.store.read(
        &dynasty_id,
        Box::new(move |tables| {
            let scheduled_rounds = playoff::scheduled_rounds(tables, season).into_iter().map(str::to_string).collect();
            let games = tables
                .events_by_structured_prefix(&format!("playoff_{season}_"))
                .into_iter()
                .cloned()
                .collect();
            BracketViewModel { scheduled_rounds, games }
        }),
    )?;
    Ok(Json(model).into_response())
}
