use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    Afc,
    Nfc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Division {
    North,
    South,
    East,
    West,
}

/// Immutable team attributes (spec §3). Mutable per-season state lives
/// in `StandingsRow` and the cap ledger, keyed by `(dynasty, team, season)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub conference: Conference,
    pub division: Division,
}

impl Team {
    pub fn new(id: u32, name: impl Into<String>, conference: Conference, division: Division) -> Self {
        assert!((1..=32).contains(&id), "team id must be in [1, 32]");
        Team {
            id,
            name: name.into(),
            conference,
            division,
        }
    }
}
