use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Lt,
    Ol,
    Edge,
    Dl,
    Lb,
    Cb,
    S,
    K,
    P,
}

impl Position {
    /// Position multiplier for the trade value model (spec §4.9).
    pub fn value_multiplier(&self) -> f64 {
        match self {
            Position::Qb | Position::Edge | Position::Lt => 2.0,
            Position::Wr | Position::Cb => 1.5,
            Position::Rb => 1.2,
            _ => 1.0,
        }
    }
}

/// A player identified by id, scoped to `(dynasty, player)` in storage
/// (spec §3). `team_id` is `None` while the player is a free agent or
/// retired; `retired` is sticky — a retired player is never re-signed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub position: Position,
    pub overall: u8,
    pub age: u8,
    pub years_pro: u8,
    pub team_id: Option<u32>,
    pub retired: bool,
}

impl Player {
    pub fn new(id: u32, name: impl Into<String>, position: Position, overall: u8, age: u8) -> Self {
        assert!((40..=99).contains(&overall), "overall must be in [40, 99]");
        Player {
            id,
            name: name.into(),
            position,
            overall,
            age,
            years_pro: 0,
            team_id: None,
            retired: false,
        }
    }

    pub fn is_free_agent(&self) -> bool {
        !self.retired && self.team_id.is_none()
    }
}
