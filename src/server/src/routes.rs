use crate::cap::cap_routes;
use crate::contracts::contracts_routes;
use crate::playoffs::playoff_routes;
use crate::stats::stats_routes;
use crate::standings::standings_routes;
use crate::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

pub struct ServerRoutes;

impl ServerRoutes {
    pub fn create() -> Router<AppState> {
        Router::<AppState>::new()
            .merge(standings_routes())
            .merge(cap_routes())
            .merge(contracts_routes())
            .merge(playoff_routes())
            .merge(stats_routes())
            .layer(ServiceBuilder::new().layer(CatchPanicLayer::new()).layer(TraceLayer::new_for_http()))
    }
}
