//! Daily AI-suggestion kinds, refresh budget policy, and output parsing.
//!
//! The budget policy is a pure decision function: it never touches the
//! store or the generator. Side effects belong to the orchestrator in
//! `breezy-api`.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Generator invocations allowed per user, per suggestion kind, per day.
pub const MAX_SUGGESTION_CALLS_PER_DAY: i32 = 2;

/// Number of tip lines an allergy suggestion carries.
pub const ALLERGY_TIP_COUNT: usize = 5;

/// Number of lines an outfit suggestion carries (top, outer, bottom, note).
pub const OUTFIT_LINE_COUNT: usize = 4;

/// Suggestion days roll over at midnight UTC+8, the dashboard's home timezone.
const SUGGESTION_DAY_UTC_OFFSET_SECS: i32 = 8 * 3600;

// ---------------------------------------------------------------------------
// Suggestion kinds
// ---------------------------------------------------------------------------

/// Which suggestion a cache record stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    /// Allergy / going-outside precautions (up to five tip sentences).
    Allergy,
    /// Outfit advice (top, outer, bottom, note).
    Outfit,
}

impl SuggestionKind {
    /// Stable string form used as the `kind` column value.
    pub fn as_str(self) -> &'static str {
        match self {
            SuggestionKind::Allergy => "allergy",
            SuggestionKind::Outfit => "outfit",
        }
    }
}

impl std::fmt::Display for SuggestionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Refresh budget policy
// ---------------------------------------------------------------------------

/// Outcome of applying the refresh budget policy to a cache lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetAction {
    /// A record exists and no refresh was requested -- return it as-is.
    ServeCache,
    /// Call the generator: either nothing is cached yet, or a refresh was
    /// requested and the daily call budget still has room.
    Generate,
    /// A refresh was requested but the budget is exhausted -- return the
    /// stored result flagged as stale.
    DenyRefreshServeStale,
}

/// Decide what to do with a suggestion request.
///
/// `calls_today` is `None` when no cache record exists for the
/// (user, kind, day) key. Absence always forces [`BudgetAction::Generate`]
/// regardless of `force_refresh` -- there is nothing to serve.
pub fn decide_refresh(
    calls_today: Option<i32>,
    force_refresh: bool,
    max_calls_per_day: i32,
) -> BudgetAction {
    match calls_today {
        None => BudgetAction::Generate,
        Some(_) if !force_refresh => BudgetAction::ServeCache,
        Some(calls) if calls < max_calls_per_day => BudgetAction::Generate,
        Some(_) => BudgetAction::DenyRefreshServeStale,
    }
}

/// Calendar date identifying "today" for budget purposes.
///
/// The counter is keyed per day in UTC+8: a request arriving just after
/// local midnight addresses a new date and therefore an empty cache.
pub fn suggestion_day(now: DateTime<Utc>) -> NaiveDate {
    let offset = FixedOffset::east_opt(SUGGESTION_DAY_UTC_OFFSET_SECS)
        .expect("UTC+8 is a valid offset");
    now.with_timezone(&offset).date_naive()
}

// ---------------------------------------------------------------------------
// Generation output parsing
// ---------------------------------------------------------------------------

/// Fixed-shape outfit advice parsed from the generator output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitAdvice {
    pub top: String,
    pub outer: String,
    pub bottom: String,
    pub note: String,
}

/// Split raw generator output into trimmed, non-empty lines.
fn usable_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse allergy tips: at most [`ALLERGY_TIP_COUNT`] trimmed lines.
///
/// Fewer lines than expected yield a shorter list; no usable text yields an
/// empty list. Content is never padded or invented.
pub fn parse_allergy_tips(raw: &str) -> Vec<String> {
    let mut lines = usable_lines(raw);
    lines.truncate(ALLERGY_TIP_COUNT);
    lines
}

/// Parse outfit advice by line position: 1 -> top, 2 -> outer, 3 -> bottom,
/// 4 -> note. Missing positions map to the empty string, never an error.
pub fn parse_outfit_advice(raw: &str) -> OutfitAdvice {
    let mut lines = usable_lines(raw);
    lines.truncate(OUTFIT_LINE_COUNT);
    let take = |index: usize| lines.get(index).cloned().unwrap_or_default();
    OutfitAdvice {
        top: take(0),
        outer: take(1),
        bottom: take(2),
        note: take(3),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // -- Budget policy --

    #[test]
    fn absent_record_generates_without_refresh() {
        assert_eq!(
            decide_refresh(None, false, MAX_SUGGESTION_CALLS_PER_DAY),
            BudgetAction::Generate
        );
    }

    #[test]
    fn absent_record_generates_with_refresh() {
        assert_eq!(
            decide_refresh(None, true, MAX_SUGGESTION_CALLS_PER_DAY),
            BudgetAction::Generate
        );
    }

    #[test]
    fn existing_record_served_without_refresh() {
        // No refresh requested: cache wins regardless of the counter.
        for calls in [1, 2, 5] {
            assert_eq!(
                decide_refresh(Some(calls), false, MAX_SUGGESTION_CALLS_PER_DAY),
                BudgetAction::ServeCache
            );
        }
    }

    #[test]
    fn refresh_generates_while_budget_remains() {
        assert_eq!(
            decide_refresh(Some(1), true, MAX_SUGGESTION_CALLS_PER_DAY),
            BudgetAction::Generate
        );
    }

    #[test]
    fn refresh_denied_at_budget() {
        assert_eq!(
            decide_refresh(Some(2), true, MAX_SUGGESTION_CALLS_PER_DAY),
            BudgetAction::DenyRefreshServeStale
        );
    }

    #[test]
    fn refresh_denied_past_budget() {
        assert_eq!(
            decide_refresh(Some(3), true, MAX_SUGGESTION_CALLS_PER_DAY),
            BudgetAction::DenyRefreshServeStale
        );
    }

    // -- Suggestion day (UTC+8) --

    #[test]
    fn suggestion_day_is_utc_plus_eight() {
        // 15:59 UTC is 23:59 in UTC+8 -- still the same day.
        let before = Utc.with_ymd_and_hms(2025, 6, 1, 15, 59, 0).unwrap();
        assert_eq!(
            suggestion_day(before),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
        );

        // 16:00 UTC is 00:00 in UTC+8 -- the date has rolled over.
        let after = Utc.with_ymd_and_hms(2025, 6, 1, 16, 0, 0).unwrap();
        assert_eq!(
            suggestion_day(after),
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap()
        );
    }

    // -- Allergy parsing --

    #[test]
    fn allergy_tips_filter_blank_lines_and_whitespace() {
        let raw = "  Wear a mask outdoors.  \n\n\nCarry antihistamines.\n   \n";
        assert_eq!(
            parse_allergy_tips(raw),
            vec![
                "Wear a mask outdoors.".to_string(),
                "Carry antihistamines.".to_string(),
            ]
        );
    }

    #[test]
    fn allergy_tips_truncate_to_five() {
        let raw = "one\ntwo\nthree\nfour\nfive\nsix\nseven";
        let tips = parse_allergy_tips(raw);
        assert_eq!(tips.len(), ALLERGY_TIP_COUNT);
        assert_eq!(tips.last().unwrap(), "five");
    }

    #[test]
    fn allergy_tips_empty_input_yields_empty_list() {
        assert!(parse_allergy_tips("").is_empty());
        assert!(parse_allergy_tips("\n  \n\t\n").is_empty());
    }

    // -- Outfit parsing --

    #[test]
    fn outfit_advice_maps_lines_by_position() {
        let raw = "Light cotton t-shirt\nThin windbreaker\nChino trousers\nBring an umbrella after noon.";
        let advice = parse_outfit_advice(raw);
        assert_eq!(advice.top, "Light cotton t-shirt");
        assert_eq!(advice.outer, "Thin windbreaker");
        assert_eq!(advice.bottom, "Chino trousers");
        assert_eq!(advice.note, "Bring an umbrella after noon.");
    }

    #[test]
    fn outfit_advice_missing_lines_become_empty_strings() {
        let advice = parse_outfit_advice("Only a top line");
        assert_eq!(advice.top, "Only a top line");
        assert_eq!(advice.outer, "");
        assert_eq!(advice.bottom, "");
        assert_eq!(advice.note, "");
    }

    #[test]
    fn outfit_advice_extra_lines_are_dropped() {
        let raw = "t\no\nb\nn\nextra commentary";
        let advice = parse_outfit_advice(raw);
        assert_eq!(advice.note, "n");
    }

    #[test]
    fn outfit_advice_empty_input_is_all_empty() {
        assert_eq!(parse_outfit_advice(""), OutfitAdvice::default());
    }
}
