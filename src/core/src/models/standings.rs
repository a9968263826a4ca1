use serde::{Deserialize, Serialize};

/// Per `(dynasty, team, season)` win/loss record (spec §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: u32,
    pub season: i32,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub division_wins: u32,
    pub conference_wins: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub schedule: Vec<u32>,
}

impl StandingsRow {
    pub fn new(team_id: u32, season: i32) -> Self {
        StandingsRow {
            team_id,
            season,
            wins: 0,
            losses: 0,
            ties: 0,
            division_wins: 0,
            conference_wins: 0,
            points_for: 0,
            points_against: 0,
            schedule: Vec::new(),
        }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    pub fn win_pct(&self) -> f64 {
        let games = self.games_played();
        if games == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / games as f64
    }

    /// Record one result for this team against `opponent_id`; call once
    /// per team per executed game (spec §4.5 step 3).
    pub fn record_result(
        &mut self,
        opponent_id: u32,
        points_for: u32,
        points_against: u32,
        same_division: bool,
        same_conference: bool,
    ) {
        self.schedule.push(opponent_id);
        self.points_for += points_for;
        self.points_against += points_against;

        use std::cmp::Ordering;
        match points_for.cmp(&points_against) {
            Ordering::Greater => {
                self.wins += 1;
                if same_division {
                    self.division_wins += 1;
                }
                if same_conference {
                    self.conference_wins += 1;
                }
            }
            Ordering::Less => self.losses += 1,
            Ordering::Equal => self.ties += 1,
        }
    }
}
