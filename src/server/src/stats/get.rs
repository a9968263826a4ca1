use crate::{ApiResult, AppState};
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use dynasty_core::DynastyStore;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct StatsPathParams {
    dynasty_id: String,
    season: i32,
}

#[derive(Deserialize)]
pub struct StatLeadersQuery {
    stat: String,
    season_type: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
pub struct StatLeaderEntry {
    pub player_id: u32,
    pub value: f64,
}

/// Top `limit` (default 10) players by `stat`'s value within a season's
/// aggregated stat blobs (spec §6 `player_season_stats`). The stat key
/// itself is opaque to this engine — it is whatever key the injected
/// `GameSimulator` chose to report.
pub async fn stat_leaders_get_action(
    State(state): State<AppState>,
    Path(params): Path<StatsPathParams>,
    Query(query): Query<StatLeadersQuery>,
) -> ApiResult<Response> {
    let StatsPathParams { dynasty_id, season } = params;
    let StatLeadersQuery { stat, season_type, limit } = query;
    let limit = limit.unwrap_or(10);

    let mut leaders = state.store.read(
        &dynasty_id,
        Box::new(move |tables| {
            tables
                .player_season_stats
                .iter()
                .filter(|(&(s, _, season_type_key), _)| {
                    s == season
                        && season_type
                            .as_deref()
                            .map_or(true, |wanted| format!("{season_type_key:?}").eq_ignore_ascii_case(wanted))
                })
                .filter_map(|(&(_, player_id, _), stats)| stats.get(&stat).and_then(|v| v.as_f64()).map(|value| StatLeaderEntry { player_id, value }))
                .collect::<Vec<_>>()
        }),
    )?;

    leaders.sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    leaders.truncate(limit);
    Ok(Json(leaders).into_response())
}
