use crate::{ApiError, ApiResult, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::cap_ledger;
use dynasty_core::DynastyStore;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct CapPathParams {
    dynasty_id: String,
    season: i32,
    team_id: u32,
}

#[derive(Serialize)]
pub struct CapViewModel {
    pub team_id: u32,
    pub season: i32,
    pub cap_limit: i64,
    pub dead_money: i64,
    pub carryover: i64,
    pub active_cap_hits: i64,
    pub cap_space: i64,
}

pub async fn cap_get_action(State(state): State<AppState>, Path(params): Path<CapPathParams>) -> ApiResult<Response> {
    let CapPathParams { dynasty_id, season, team_id } = params;
    let model = state.store.read(
        &dynasty_id,
        Box::new(move |tables| {
            let active = cap_ledger::active_cap_hits(tables, team_id, season);
            tables.cap_records.get(&(season, team_id)).map(|record| CapViewModel {
                team_id,
                season,
                cap_limit: record.cap_limit,
                dead_money: record.dead_money,
                carryover: record.carryover,
                active_cap_hits: active,
                cap_space: record.cap_space(active),
            })
        }),
    )?;

    let model = model.ok_or_else(|| ApiError::NotFound(format!("no cap record for team {team_id} season {season}")))?;
    Ok(Json(model).into_response())
}
