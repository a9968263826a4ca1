pub mod get;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;

pub fn stats_routes() -> Router<AppState> {
    Router::new().route("/dynasties/{dynasty_id}/stat-leaders/{season}", get_method(get::stat_leaders_get_action))
}
