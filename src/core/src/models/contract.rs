use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    Active,
    Released,
    Traded,
    Expired,
}

/// A player contract (spec §3). Proration spreads `signing_bonus_total`
/// evenly across up to five years total (real years + void years) per
/// spec §4.7 invariant 1: `sum(bonus_proration) + sum(void_year_proration)
/// == signing_bonus_total`.
///
/// Void years carry no base salary or roster bonus — they exist purely
/// to receive a share of proration for cap-spreading — so their share is
/// tracked separately in `void_year_proration` rather than padding
/// `bonus_proration`, which stays indexed one-to-one with `base_salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contract {
    pub id: u64,
    pub player_id: u32,
    pub team_id: u32,
    /// Season the contract was signed; `year_index` for cap-hit lookups
    /// elsewhere is always `season - signed_season`.
    pub signed_season: i32,
    pub years: u8,
    pub base_salary: Vec<i64>,
    pub signing_bonus_total: i64,
    pub bonus_proration: Vec<i64>,
    pub guarantees: Vec<i64>,
    pub roster_bonus: Vec<i64>,
    pub workout_bonus: Vec<i64>,
    pub void_years: u8,
    pub void_year_proration: Vec<i64>,
    pub status: ContractStatus,
}

impl Contract {
    pub fn new(
        id: u64,
        player_id: u32,
        team_id: u32,
        signed_season: i32,
        base_salary: Vec<i64>,
        signing_bonus_total: i64,
        guarantees: Vec<i64>,
        roster_bonus: Vec<i64>,
        workout_bonus: Vec<i64>,
        void_years: u8,
    ) -> Self {
        let years = base_salary.len() as u8;
        assert!((1..=7).contains(&years), "contract years must be in [1, 7]");
        assert_eq!(guarantees.len(), years as usize);
        assert_eq!(roster_bonus.len(), years as usize);
        assert_eq!(workout_bonus.len(), years as usize);

        let (bonus_proration, void_year_proration) = prorate(signing_bonus_total, years, void_years);

        Contract {
            id,
            player_id,
            team_id,
            signed_season,
            years,
            base_salary,
            signing_bonus_total,
            bonus_proration,
            guarantees,
            roster_bonus,
            workout_bonus,
            void_years,
            void_year_proration,
            status: ContractStatus::Active,
        }
    }

    /// 0-based year index into this contract for `season`, clamped to
    /// non-negative (a season before signing never occurs in practice).
    pub fn year_index_for(&self, season: i32) -> usize {
        (season - self.signed_season).max(0) as usize
    }

    /// Cap hit for a 0-based year index within the contract's real
    /// (non-void) years: base + prorated bonus + roster + workout bonus.
    pub fn cap_hit(&self, year_index: usize) -> i64 {
        let base = *self.base_salary.get(year_index).unwrap_or(&0);
        let proration = *self.bonus_proration.get(year_index).unwrap_or(&0);
        let roster = *self.roster_bonus.get(year_index).unwrap_or(&0);
        let workout = *self.workout_bonus.get(year_index).unwrap_or(&0);
        base + proration + roster + workout
    }

    /// Cap hit for a 0-based void-year index (void years carry only
    /// their proration share; no base, roster, or workout bonus).
    pub fn void_year_cap_hit(&self, void_year_index: usize) -> i64 {
        *self.void_year_proration.get(void_year_index).unwrap_or(&0)
    }

    /// Contract total value per spec §4.7: base + prorated bonus +
    /// roster bonus, summed across the contract's real years and void
    /// years (workout bonus is an earn-based incentive, not part of
    /// contract "value").
    pub fn total_value(&self) -> i64 {
        let base: i64 = self.base_salary.iter().sum();
        let proration: i64 = self.bonus_proration.iter().sum();
        let void_proration: i64 = self.void_year_proration.iter().sum();
        let roster: i64 = self.roster_bonus.iter().sum();
        base + proration + void_proration + roster
    }

    /// Unaccelerated prorated bonus remaining from `from_year_index`
    /// onward (inclusive), including all void years — becomes dead
    /// money on release/trade.
    pub fn remaining_proration(&self, from_year_index: usize) -> i64 {
        let real: i64 = self.bonus_proration.iter().skip(from_year_index).sum();
        let void: i64 = self.void_year_proration.iter().sum();
        real + void
    }

    /// Re-spread the unaccelerated bonus (real years from
    /// `from_year_index` onward, plus all existing void years) evenly
    /// across the contract's remaining real years plus
    /// `extra_void_years` new void years (Open Question decision in
    /// DESIGN.md: proration always re-spreads over real-years-plus-void,
    /// capped at 5, never skipping void years).
    pub fn restructure(&mut self, from_year_index: usize, extra_void_years: u8) {
        let remaining = self.remaining_proration(from_year_index);
        for p in self.bonus_proration.iter_mut().skip(from_year_index) {
            *p = 0;
        }
        let remaining_real_years = (self.years as usize).saturating_sub(from_year_index) as u8;
        let total_void_years = self.void_years + extra_void_years;

        let (reprorated_real, reprorated_void) = prorate(remaining, remaining_real_years, total_void_years);
        for (offset, amount) in reprorated_real.into_iter().enumerate() {
            if let Some(slot) = self.bonus_proration.get_mut(from_year_index + offset) {
                *slot = amount;
            }
        }
        self.void_year_proration = reprorated_void;
        self.void_years = total_void_years;
    }
}

/// Spread `total` evenly across `min(years + void_years, 5)` years
/// (real years first, then void years), putting the remainder from
/// integer division in the final prorated slot so the sum always
/// equals `total` exactly. Returns `(real_year_shares, void_year_shares)`.
fn prorate(total: i64, years: u8, void_years: u8) -> (Vec<i64>, Vec<i64>) {
    let years = years as usize;
    let void_years = void_years as usize;
    let proration_years = (years + void_years).min(5).max(1);

    let base_share = total / proration_years as i64;
    let remainder = total - base_share * proration_years as i64;

    let mut real = vec![0i64; years];
    let mut void = vec![0i64; void_years];

    for i in 0..proration_years {
        let share = if i == proration_years - 1 {
            base_share + remainder
        } else {
            base_share
        };
        if i < years {
            real[i] = share;
        } else {
            void[i - years] = share;
        }
    }

    (real, void)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proration_sums_to_signing_bonus() {
        let contract = Contract::new(
            1,
            10,
            7,
            2025,
            vec![1_000_000; 4],
            10_000_000,
            vec![0; 4],
            vec![0; 4],
            vec![0; 4],
            0,
        );
        let sum: i64 = contract.bonus_proration.iter().sum();
        assert_eq!(sum, 10_000_000);
    }

    #[test]
    fn proration_caps_at_five_years_for_long_contracts() {
        let contract = Contract::new(
            2,
            11,
            7,
            2025,
            vec![1_000_000; 7],
            5_000_000,
            vec![0; 7],
            vec![0; 7],
            vec![0; 7],
            0,
        );
        assert_eq!(contract.bonus_proration[5], 0);
        assert_eq!(contract.bonus_proration[6], 0);
        let sum: i64 = contract.bonus_proration.iter().sum();
        assert_eq!(sum, 5_000_000);
    }

    #[test]
    fn void_years_receive_a_proration_share() {
        let contract = Contract::new(
            4,
            13,
            7,
            2025,
            vec![3_000_000; 2],
            6_000_000,
            vec![0; 2],
            vec![0; 2],
            vec![0; 2],
            2,
        );
        assert_eq!(contract.bonus_proration.len(), 2);
        assert_eq!(contract.void_year_proration.len(), 2);
        let total: i64 = contract.bonus_proration.iter().sum::<i64>()
            + contract.void_year_proration.iter().sum::<i64>();
        assert_eq!(total, 6_000_000);
    }

    #[test]
    fn restructure_preserves_total_proration() {
        let mut contract = Contract::new(
            3,
            12,
            7,
            2025,
            vec![2_000_000; 5],
            10_000_000,
            vec![0; 5],
            vec![0; 5],
            vec![0; 5],
            0,
        );
        let total_before = contract.remaining_proration(0);
        contract.restructure(2, 1);
        let total_after: i64 = contract.bonus_proration.iter().sum::<i64>()
            + contract.void_year_proration.iter().sum::<i64>();
        assert_eq!(total_before, total_after);
    }
}
