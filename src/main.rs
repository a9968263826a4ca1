mod collaborators;

use chrono::NaiveDate;
use collaborators::{DefaultDraftOrder, DefaultPlayoffSeeding, DemoSimulator};
use database::JsonDynastyStore;
use dynasty_core::models::{Conference, Division, Team};
use dynasty_core::store::DynastyStore;
use env_logger::Env;
use log::info;
use server::{build_controller, AppState, DynastyQueryServer};
use std::env;

#[tokio::main]
async fn main() {
    color_eyre::install().unwrap();
    env_logger::Builder::from_env(Env::default().default_filter_or("debug")).init();

    let store_path = env::var("STORE_PATH").unwrap_or_else(|_| "./dynasty_store".to_string());
    let dynasty_id = env::var("DYNASTY_ID").unwrap_or_else(|_| "default".to_string());
    let season_year: i32 = env::var("SEASON_YEAR").ok().and_then(|v| v.parse().ok()).unwrap_or(2025);
    let verbose = env::var("VERBOSE").is_ok();
    let is_one_shot_game = env::var("MODE") == Ok(String::from("ONESHOT"));

    let start_date = NaiveDate::from_ymd_opt(season_year, 7, 1).unwrap();
    let (store, mut controller) = build_controller(
        &store_path,
        dynasty_id.clone(),
        season_year,
        start_date,
        verbose,
        DemoSimulator::default(),
        DefaultDraftOrder,
        DefaultPlayoffSeeding,
    )
    .expect("building season controller");

    seed_league_if_empty(&store, &dynasty_id);

    if is_one_shot_game {
        info!("one shot game started");
        let result = controller.advance_day().expect("advancing day");
        info!(
            "advanced to {}: {} events executed, {} failed, phase changed: {}",
            result.date, result.executed_events, result.failed_events, result.phase_changed
        );
        return;
    }

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let query_server = DynastyQueryServer::new(AppState::new(store));

    let season_task = tokio::task::spawn_blocking(move || {
        let summary = controller.simulate_to_end_of_season().expect("simulating season");
        info!("season {} complete, champion team {:?}", summary.season_year, summary.champion_team_id);
    });

    tokio::select! {
        _ = query_server.run(&bind_addr) => {},
        _ = season_task => {},
    }
}

/// First-run convenience: a freshly created dynasty has no teams, and
/// `SeasonController` never invents league membership on its own (spec
/// §1 Non-goals — team/division alignment is fixed input, not
/// generated). Seeds the standard 32-team, 2-conference, 4-division
/// alignment once, if it isn't already there.
fn seed_league_if_empty(store: &JsonDynastyStore, dynasty_id: &str) {
    let has_teams = store.read(&dynasty_id.to_string(), Box::new(|tables| !tables.teams.is_empty())).unwrap_or(false);
    if has_teams {
        return;
    }

    store
        .with_transaction(
            &dynasty_id.to_string(),
            Box::new(|tables| {
                for team_id in 1u32..=32 {
                    let conference = if team_id <= 16 { Conference::Afc } else { Conference::Nfc };
                    let division = match (team_id - 1) % 4 {
                        0 => Division::North,
                        1 => Division::South,
                        2 => Division::East,
                        _ => Division::West,
                    };
                    tables.teams.insert(team_id, Team::new(team_id, format!("Team {team_id}"), conference, division));
                }
                Ok(())
            }),
        )
        .expect("seeding initial league alignment");
}
