//! Structured event ids: `"{kind}_{season}_{sub}_{index}"` (spec §4.2).
//! These are the stable identity used for duplicate detection — never
//! the store's internal primary key, which differs across
//! reconstructions (spec §9).

const PLAYOFF_ROUNDS: [&str; 4] = ["wild_card", "divisional", "conference", "super_bowl"];

pub fn playoff_id(season: i32, round: &str, index: u32) -> String {
    format!("playoff_{season}_{round}_{index}")
}

/// Parse `(round, index)` from a playoff structured id, anchoring on the
/// known round-name suffix set rather than splitting on `_` by position
/// — round names themselves contain underscores (`wild_card`,
/// `super_bowl`), so positional splitting silently misparses (spec §9
/// design note).
pub fn parse_playoff_round(structured_id: &str) -> Option<(&'static str, u32)> {
    for round in PLAYOFF_ROUNDS {
        let marker = format!("_{round}_");
        if let Some(pos) = structured_id.rfind(&marker) {
            let index_str = &structured_id[pos + marker.len()..];
            if let Ok(index) = index_str.parse::<u32>() {
                return Some((round, index));
            }
        }
    }
    None
}

/// Whether `structured_id` belongs to `season`'s playoff bracket, used
/// by the playoff controller's idempotent-reload prefix scan (spec §4.11).
pub fn is_playoff_id_for_season(structured_id: &str, season: i32) -> bool {
    structured_id.starts_with(&format!("playoff_{season}_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_round_name_containing_underscores() {
        let id = playoff_id(2025, "wild_card", 3);
        assert_eq!(parse_playoff_round(&id), Some(("wild_card", 3)));
    }

    #[test]
    fn parses_super_bowl() {
        let id = playoff_id(2025, "super_bowl", 1);
        assert_eq!(parse_playoff_round(&id), Some(("super_bowl", 1)));
    }

    #[test]
    fn season_prefix_check_ignores_unrelated_ids() {
        assert!(is_playoff_id_for_season("playoff_2025_wild_card_1", 2025));
        assert!(!is_playoff_id_for_season("playoff_2024_wild_card_1", 2025));
        assert!(!is_playoff_id_for_season("draft_2025_round_1_1", 2025));
    }
}
