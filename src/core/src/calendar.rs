use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Monotonic date counter for a dynasty. The calendar never schedules or
/// fires anything by itself (spec §4.1) — it is pure date arithmetic that
/// the season controller drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Calendar {
    date: NaiveDate,
}

impl Calendar {
    pub fn new(date: NaiveDate) -> Self {
        Calendar { date }
    }

    pub fn current_date(&self) -> NaiveDate {
        self.date
    }

    pub fn advance_days(&mut self, n: i64) -> NaiveDate {
        self.date += Duration::days(n);
        self.date
    }

    /// 1-based NFL week number for `date`, in Thursday–Wednesday blocks
    /// anchored at `season_start` (the season's opening Thursday).
    ///
    /// Dates before `season_start` return week 0 (preseason/offseason).
    pub fn week_of(date: NaiveDate, season_start: NaiveDate) -> u32 {
        if date < season_start {
            return 0;
        }
        let days_since = (date - season_start).num_days();
        (days_since / 7) as u32 + 1
    }

    /// The Thursday on/after `from` — used to anchor the regular season
    /// start and to compute the week-9 trade-deadline Tuesday.
    pub fn next_weekday_on_or_after(from: NaiveDate, weekday: Weekday) -> NaiveDate {
        let mut d = from;
        while d.weekday() != weekday {
            d += Duration::days(1);
        }
        d
    }

    /// Week-9 Tuesday of the season anchored at `season_start` (a Thursday).
    /// Week 9 runs from the Thursday that begins 8 full weeks after
    /// `season_start` through the following Wednesday; its Tuesday is
    /// 12 days after the week-9 Thursday minus 2 days.
    pub fn trade_deadline(season_start: NaiveDate) -> NaiveDate {
        let week9_thursday = season_start + Duration::days(8 * 7);
        week9_thursday + Duration::days(5) // Thu -> following Tue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_days_moves_the_date_forward() {
        let mut cal = Calendar::new(NaiveDate::from_ymd_opt(2025, 9, 4).unwrap());
        let next = cal.advance_days(1);
        assert_eq!(next, NaiveDate::from_ymd_opt(2025, 9, 5).unwrap());
    }

    #[test]
    fn week_of_is_one_based_thursday_anchored() {
        let season_start = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap(); // Thursday
        assert_eq!(Calendar::week_of(season_start, season_start), 1);
        assert_eq!(
            Calendar::week_of(season_start + Duration::days(6), season_start),
            1
        );
        assert_eq!(
            Calendar::week_of(season_start + Duration::days(7), season_start),
            2
        );
    }

    #[test]
    fn week_of_before_season_start_is_zero() {
        let season_start = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap();
        assert_eq!(
            Calendar::week_of(season_start - Duration::days(1), season_start),
            0
        );
    }

    #[test]
    fn trade_deadline_is_a_tuesday_in_week_nine() {
        let season_start = NaiveDate::from_ymd_opt(2025, 9, 4).unwrap();
        let deadline = Calendar::trade_deadline(season_start);
        assert_eq!(deadline.weekday(), Weekday::Tue);
        assert_eq!(Calendar::week_of(deadline, season_start), 9);
    }
}
