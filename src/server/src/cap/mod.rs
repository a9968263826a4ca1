pub mod get;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;

pub fn cap_routes() -> Router<AppState> {
    Router::new().route("/dynasties/{dynasty_id}/cap/{season}/{team_id}", get_method(get::cap_get_action))
}
