//! `(store_path, dynasty_id, season_year, verbose)` controller factory
//! (spec §6): wires a `JsonDynastyStore` and the caller's collaborators
//! into a `SeasonController`, mirroring the teacher's `main.rs`
//! `DatabaseLoader::load` -> `DatabaseGenerator::generate` -> server
//! wiring sequence.

use chrono::NaiveDate;
use database::JsonDynastyStore;
use dynasty_core::external::{DraftOrderService, GameSimulator, PlayoffSeedingService};
use dynasty_core::{CoreResult, SeasonController};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds a controller and hands back the store it opened so the caller
/// can reuse the same handle for read-only HTTP queries (`AppState`)
/// instead of opening the store file twice.
pub fn build_controller<Sim, Draft, Seed>(
    store_path: impl Into<PathBuf>,
    dynasty_id: String,
    season_year: i32,
    start_date: NaiveDate,
    verbose: bool,
    simulator: Sim,
    draft_order_service: Draft,
    seeding_service: Seed,
) -> CoreResult<(Arc<JsonDynastyStore>, SeasonController<Arc<JsonDynastyStore>, Sim, Draft, Seed>)>
where
    Sim: GameSimulator,
    Draft: DraftOrderService,
    Seed: PlayoffSeedingService,
{
    let store_path = store_path.into();
    if verbose {
        info!("opening dynasty store at {} for dynasty {dynasty_id}", store_path.display());
    }
    let store = Arc::new(JsonDynastyStore::new(store_path)?);
    let controller = SeasonController::new(
        store.clone(),
        dynasty_id,
        simulator,
        draft_order_service,
        seeding_service,
        season_year,
        start_date,
    )?;
    Ok((store, controller))
}
