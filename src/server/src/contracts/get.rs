use crate::{ApiResult, AppState};
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::DynastyStore;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct ContractsPathParams {
    dynasty_id: String,
    team_id: u32,
}

/// A team's active contracts (spec §6 `player_contracts`, scoped by
/// team since a released/traded-away contract is no longer "for" it).
pub async fn contracts_get_action(State(state): State<AppState>, Path(params): Path<ContractsPathParams>) -> ApiResult<Response> {
    let ContractsPathParams { dynasty_id, team_id } = params;
    let contracts = state
        .store
        .read(&dynasty_id, Box::new(move |tables| tables.contracts_for_team(team_id).into_iter().cloned().collect::<Vec<_>>()))?;
    Ok(Json(contracts).into_response())
}
