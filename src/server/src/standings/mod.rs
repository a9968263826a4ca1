pub mod get;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;

pub fn standings_routes() -> Router<AppState> {
    Router::new().route("/dynasties/{dynasty_id}/standings/{season}", get_method(get::standings_get_action))
}
