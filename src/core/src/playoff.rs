//! Seeds the bracket from standings, schedules rounds progressively,
//! and re-seeds at Divisional and beyond (spec §4.11). Idempotent: a
//! mid-playoffs reconstruction must not double-schedule a round.

use crate::external::PlayoffSeedingService;
use crate::models::{Conference, GameType, SeasonType, StandingsRow};
use crate::store::DynastyTables;
use crate::structured_id::{is_playoff_id_for_season, parse_playoff_round, playoff_id};
use chrono::NaiveDate;
use log::info;

const ROUNDS: [&str; 4] = ["wild_card", "divisional", "conference", "super_bowl"];

/// One conference's seed order, 1 (best) through 7 (worst).
pub struct ConferenceSeeds {
    pub conference: Conference,
    pub seeds: Vec<u32>,
}

/// Seed both conferences from final standings via the injected seeding
/// contract (spec §4.6, §4.11).
pub fn seed_conferences<P: PlayoffSeedingService>(
    seeding_service: &P,
    standings: &[StandingsRow],
    teams_by_id: &std::collections::HashMap<u32, crate::models::Team>,
) -> Vec<ConferenceSeeds> {
    let mut by_conference: std::collections::HashMap<Conference, Vec<StandingsRow>> = std::collections::HashMap::new();
    for row in standings {
        if let Some(team) = teams_by_id.get(&row.team_id) {
            by_conference.entry(team.conference).or_default().push(row.clone());
        }
    }

    by_conference
        .into_iter()
        .map(|(conference, rows)| ConferenceSeeds {
            conference,
            seeds: seeding_service.seed(&rows),
        })
        .collect()
}

/// Schedule the 6 Wild Card games (spec §4.11): seed 2 vs 7, 3 vs 6, 4
/// vs 5 in each conference (seed 1 has a bye). Idempotent via
/// `DynastyTables::insert_event`'s structured-id dedup.
pub fn schedule_wild_card_round(
    tables: &mut DynastyTables,
    season: i32,
    date: NaiveDate,
    conference_seeds: &[ConferenceSeeds],
) {
    let mut index = 1u32;
    for seeds in conference_seeds {
        for (high_seed_idx, low_seed_idx) in [(1usize, 6usize), (2, 5), (3, 4)] {
            let Some(&home) = seeds.seeds.get(high_seed_idx) else { continue };
            let Some(&away) = seeds.seeds.get(low_seed_idx) else { continue };
            let structured_id = playoff_id(season, "wild_card", index);
            let payload = serde_json::json!({
                "game_id": structured_id,
                "season": season,
                "season_type": "playoffs",
                "game_type": "wild_card",
                "home_team_id": home,
                "away_team_id": away,
            });
            tables.insert_event(structured_id.clone(), date, crate::events::EventKind::Game, payload);
            index += 1;
        }
    }
    info!("scheduled {} wild card games for season {season}", index - 1);
}

/// Whether every game of `round` for `season` has been marked executed
/// (spec §4.11 "progressive scheduling").
pub fn round_complete(tables: &DynastyTables, season: i32, round: &str) -> bool {
    let prefix = format!("playoff_{season}_{round}_");
    let events = tables.events_by_structured_prefix(&prefix);
    !events.is_empty() && events.iter().all(|e| e.status == crate::events::EventStatus::Executed)
}

/// Re-seed the next round from teams still alive, per the winners of
/// the just-completed round (spec §4.11 "highest remaining seed plays
/// the lowest remaining seed"). `remaining_seeds` maps team id to its
/// original conference seed number; `conference_of` maps team id to its
/// conference so Divisional/Conference re-seeding never crosses
/// conferences (only the Super Bowl does).
pub fn schedule_next_round(
    tables: &mut DynastyTables,
    season: i32,
    date: NaiveDate,
    completed_round: &str,
    remaining_seeds: &std::collections::HashMap<u32, u32>,
    conference_of: &std::collections::HashMap<u32, Conference>,
) -> Option<String> {
    let next_round = match completed_round {
        "wild_card" => "divisional",
        "divisional" => "conference",
        "conference" => "super_bowl",
        _ => return None,
    };

    if !tables.events_by_structured_prefix(&format!("playoff_{season}_{next_round}_")).is_empty() {
        return Some(next_round.to_string());
    }

    let prefix = format!("playoff_{season}_{completed_round}_");
    let mut winners: Vec<u32> = tables
        .events_by_structured_prefix(&prefix)
        .into_iter()
        .filter_map(|e| e.result.as_ref())
        .filter_map(|r| r.get("winner_team_id").and_then(|v| v.as_u64()))
        .map(|v| v as u32)
        .collect();

    // The Wild Card round has no game for each conference's #1 seed
    // (bye); it advances straight to Divisional without appearing among
    // that round's winners.
    if completed_round == "wild_card" {
        for (&team_id, &seed) in remaining_seeds {
            if seed == 1 && conference_of.contains_key(&team_id) && !winners.contains(&team_id) {
                winners.push(team_id);
            }
        }
    }

    winners.sort_by_key(|team_id| remaining_seeds.get(team_id).copied().unwrap_or(u32::MAX));

    if next_round == "super_bowl" {
        if winners.len() == 2 {
            let structured_id = playoff_id(season, "super_bowl", 1);
            let payload = serde_json::json!({
                "game_id": structured_id,
                "season": season,
                "season_type": "playoffs",
                "game_type": "super_bowl",
                "home_team_id": winners[0],
                "away_team_id": winners[1],
            });
            tables.insert_event(structured_id, date, crate::events::EventKind::Game, payload);
        }
    } else {
        let mut afc: Vec<u32> = winners.iter().copied().filter(|t| conference_of.get(t) == Some(&Conference::Afc)).collect();
        let mut nfc: Vec<u32> = winners.iter().copied().filter(|t| conference_of.get(t) == Some(&Conference::Nfc)).collect();
        afc.sort_by_key(|t| remaining_seeds.get(t).copied().unwrap_or(u32::MAX));
        nfc.sort_by_key(|t| remaining_seeds.get(t).copied().unwrap_or(u32::MAX));

        let mut index = 1u32;
        for conference_winners in [&afc, &nfc] {
            let mid = conference_winners.len() / 2;
            for (&high, &low) in conference_winners.iter().take(mid).zip(conference_winners.iter().rev().take(mid)) {
                let structured_id = playoff_id(season, next_round, index);
                let payload = serde_json::json!({
                    "game_id": structured_id,
                    "season": season,
                    "season_type": "playoffs",
                    "game_type": next_round,
                    "home_team_id": high,
                    "away_team_id": low,
                });
                tables.insert_event(structured_id, date, crate::events::EventKind::Game, payload);
                index += 1;
            }
        }
    }

    Some(next_round.to_string())
}

/// Idempotent reload check (spec §4.11 "Idempotence"): the set of
/// rounds already scheduled for `season`, derived purely from
/// structured-id prefixes, never the store's internal event id.
pub fn scheduled_rounds(tables: &DynastyTables, season: i32) -> Vec<&'static str> {
    ROUNDS
        .iter()
        .copied()
        .filter(|round| {
            tables
                .events
                .iter()
                .any(|e| is_playoff_id_for_season(&e.structured_id, season) && parse_playoff_round(&e.structured_id).map(|(r, _)| r) == Some(*round))
        })
        .collect()
}

pub fn season_type_for_game_type(game_type: &str) -> SeasonType {
    if game_type == "regular" {
        SeasonType::RegularSeason
    } else {
        SeasonType::Playoffs
    }
}

pub fn game_type_from_round(round: &str) -> GameType {
    match round {
        "wild_card" => GameType::WildCard,
        "divisional" => GameType::Divisional,
        "conference" => GameType::Conference,
        "super_bowl" => GameType::SuperBowl,
        _ => GameType::Regular,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSeeding;
    impl PlayoffSeedingService for FixedSeeding {
        fn seed(&self, conference_standings: &[StandingsRow]) -> Vec<u32> {
            let mut rows = conference_standings.to_vec();
            rows.sort_by(|a, b| b.win_pct().partial_cmp(&a.win_pct()).unwrap());
            rows.into_iter().map(|r| r.team_id).collect()
        }
    }

    #[test]
    fn scheduling_wild_card_round_twice_is_idempotent() {
        let mut tables = DynastyTables::new();
        let conference_seeds = vec![ConferenceSeeds {
            conference: Conference::Afc,
            seeds: (1..=7).collect(),
        }];
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        schedule_wild_card_round(&mut tables, 2025, date, &conference_seeds);
        let first_count = tables.events_by_structured_prefix("playoff_2025_wild_card_").len();
        schedule_wild_card_round(&mut tables, 2025, date, &conference_seeds);
        let second_count = tables.events_by_structured_prefix("playoff_2025_wild_card_").len();
        assert_eq!(first_count, second_count);
        assert_eq!(first_count, 3);
    }

    #[test]
    fn divisional_round_includes_the_conference_bye_team() {
        use crate::events::EventStatus;

        let mut tables = DynastyTables::new();
        let season = 2025;
        let date = NaiveDate::from_ymd_opt(2026, 1, 10).unwrap();
        let conference_seeds = vec![ConferenceSeeds {
            conference: Conference::Afc,
            seeds: (1..=7).collect(),
        }];
        schedule_wild_card_round(&mut tables, season, date, &conference_seeds);

        // Seed 1 (team 1) never plays a wild card game; mark the three
        // games that were scheduled as won by the home team.
        let game_ids: Vec<u64> = tables.events_by_structured_prefix(&format!("playoff_{season}_wild_card_")).iter().map(|e| e.id).collect();
        for id in game_ids {
            let home = tables.events.iter().find(|e| e.id == id).unwrap().payload["home_team_id"].as_u64().unwrap() as u32;
            tables.mark_executed(id, EventStatus::Executed, Some(serde_json::json!({ "winner_team_id": home }))).unwrap();
        }

        let remaining_seeds: std::collections::HashMap<u32, u32> = (1u32..=7).map(|seed| (seed, seed)).collect();
        let conference_of: std::collections::HashMap<u32, Conference> = (1u32..=7).map(|team_id| (team_id, Conference::Afc)).collect();
        schedule_next_round(&mut tables, season, date, "wild_card", &remaining_seeds, &conference_of);

        let divisional_games = tables.events_by_structured_prefix(&format!("playoff_{season}_divisional_"));
        assert_eq!(divisional_games.len(), 2, "4 surviving teams (including the bye) should play 2 divisional games");
        let participants: Vec<u32> = divisional_games
            .iter()
            .flat_map(|e| {
                [
                    e.payload["home_team_id"].as_u64().unwrap() as u32,
                    e.payload["away_team_id"].as_u64().unwrap() as u32,
                ]
            })
            .collect();
        assert!(participants.contains(&1), "seed 1's bye must still reach the divisional round");
    }
}
