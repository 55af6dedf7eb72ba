//! Similarity scoring between event candidates and existing events.
//!
//! Scores are pure functions of two (title, date) pairs, with no I/O and
//! no tunable state beyond the weights passed in. The duplicate pipeline
//! layers its thresholds on top of these scores.

use chrono::NaiveDate;

use crate::types::UNKNOWN_DATE;

/// Weight of title similarity in the combined score.
pub const TITLE_WEIGHT: f64 = 0.7;
/// Weight of date proximity in the combined score.
pub const DATE_WEIGHT: f64 = 0.3;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalized Levenshtein similarity between two strings, in `[0.0, 1.0]`.
///
/// Defined as `1 - distance / max_len` over characters. Two empty strings
/// score `1.0`. Comparison is case-sensitive; callers normalize case.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(a, b)
}

/// Proximity score for two ISO calendar dates, in `[0.0, 1.0]`.
///
/// Events recalled from memory rarely agree on the exact day, so the
/// score decays gently for the first week and flattens out over months:
///
/// * same day: `1.0`
/// * within a week: `1.0 - days * 0.05`
/// * within a month: `0.65 - (days - 7) * 0.01`
/// * within a quarter: `0.42 - (days - 30) * 0.005`
/// * beyond: `max(0, 0.12 - (days - 90) * 0.001)`
///
/// Either date being [`UNKNOWN_DATE`] yields the neutral score `0.5`,
/// letting the title carry the comparison. A date that fails to parse
/// yields `0.0` rather than an error, so one malformed record cannot
/// abort a batch.
pub fn date_similarity(a: &str, b: &str) -> f64 {
    if a == UNKNOWN_DATE || b == UNKNOWN_DATE {
        return 0.5;
    }

    let (d1, d2) = match (
        NaiveDate::parse_from_str(a, DATE_FORMAT),
        NaiveDate::parse_from_str(b, DATE_FORMAT),
    ) {
        (Ok(d1), Ok(d2)) => (d1, d2),
        _ => return 0.0,
    };

    let days = (d1 - d2).num_days().abs();
    let d = days as f64;

    if days == 0 {
        1.0
    } else if days <= 7 {
        1.0 - d * 0.05
    } else if days <= 30 {
        0.65 - (d - 7.0) * 0.01
    } else if days <= 90 {
        0.42 - (d - 30.0) * 0.005
    } else {
        (0.12 - (d - 90.0) * 0.001).max(0.0)
    }
}

/// Weighted combination of title and date similarity.
///
/// Titles are lowercased before comparison; dates are compared verbatim.
pub fn weighted_similarity(
    candidate_title: &str,
    candidate_date: &str,
    existing_title: &str,
    existing_date: &str,
    title_weight: f64,
    date_weight: f64,
) -> f64 {
    let title_sim = string_similarity(
        &candidate_title.to_lowercase(),
        &existing_title.to_lowercase(),
    );
    let date_sim = date_similarity(candidate_date, existing_date);
    title_sim * title_weight + date_sim * date_weight
}

/// [`weighted_similarity`] with the default 70/30 title/date weights.
pub fn combined_similarity(
    candidate_title: &str,
    candidate_date: &str,
    existing_title: &str,
    existing_date: &str,
) -> f64 {
    weighted_similarity(
        candidate_title,
        candidate_date,
        existing_title,
        existing_date,
        TITLE_WEIGHT,
        DATE_WEIGHT,
    )
}
