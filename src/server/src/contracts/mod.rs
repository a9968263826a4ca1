pub mod get;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;

pub fn contracts_routes() -> Router<AppState> {
    Router::new().route("/dynasties/{dynasty_id}/contracts/{team_id}", get_method(get::contracts_get_action))
}
