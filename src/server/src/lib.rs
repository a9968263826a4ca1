pub mod cap;
pub mod contracts;
pub mod controller;
pub mod error;
pub mod playoffs;
pub mod routes;
pub mod stats;
pub mod standings;

use database::JsonDynastyStore;
use std::sync::Arc;

pub use controller::build_controller;
pub use error::{ApiError, ApiResult};

/// Axum handler state: one store backing every dynasty this process
/// answers queries for. Unlike the teacher's `GameAppData` (an
/// `Arc<RwLock<Option<SimulatorData>>>` swapped wholesale on every
/// simulation tick), `JsonDynastyStore` already serializes writes
/// per-dynasty internally, so the state here is just a handle to it.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonDynastyStore>,
}

impl AppState {
    pub fn new(store: Arc<JsonDynastyStore>) -> Self {
        AppState { store }
    }
}

pub struct DynastyQueryServer {
    state: AppState,
}

impl DynastyQueryServer {
    pub fn new(state: AppState) -> Self {
        DynastyQueryServer { state }
    }

    pub async fn run(self, addr: &str) {
        let app = routes::ServerRoutes::create().with_state(self.state);
        let listener = tokio::net::TcpListener::bind(addr).await.expect("binding server address");
        log::info!("listening on {addr}");
        axum::serve(listener, app).await.expect("server exited unexpectedly");
    }
}
