pub mod get;

use crate::AppState;
use axum::routing::get as get_method;
use axum::Router;

pub fn playoff_routes() -> Router<AppState> {
    Router::new().route("/dynasties/{dynasty_id}/playoffs/{season}", get_method(get::playoffs_get_action))
}
