use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per `(dynasty, team, season)` cap accounting (spec §3/§4.7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryCapRecord {
    pub team_id: u32,
    pub season: i32,
    pub cap_limit: i64,
    pub dead_money: i64,
    pub carryover: i64,
}

impl SalaryCapRecord {
    pub fn new(team_id: u32, season: i32, cap_limit: i64, carryover: i64) -> Self {
        SalaryCapRecord {
            team_id,
            season,
            cap_limit,
            dead_money: 0,
            carryover,
        }
    }

    pub fn cap_space(&self, active_cap_hits: i64) -> i64 {
        self.cap_limit + self.carryover - active_cap_hits - self.dead_money
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CapTransactionKind {
    Signing,
    Cut,
    Trade,
    Restructure,
    FranchiseTag,
}

/// One row of the cap transaction log (spec §4.7 invariant 3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapTransaction {
    pub id: u64,
    pub team_id: u32,
    pub date: NaiveDate,
    pub kind: CapTransactionKind,
    pub cap_impact_current: i64,
    pub cap_impact_future: i64,
    pub description: String,
}
