//! Read-only lookups over a `RankTable`.
//!
//! Every accessor is a full scan in rank order. State, city and score
//! lookups return all matches; name, id and FICE lookups stop at the first.

use crate::error::{RankingsError, Result};
use crate::types::{College, RankTable};

/// Upper bound of the academic reputation scale
pub const SCORE_CEILING: f64 = 5.0;

pub fn by_state<'a>(table: &'a RankTable, state: &str) -> Vec<&'a College> {
    let state = state.to_uppercase();
    filter_colleges(table, |c| c.state == state)
}

/// Exact, case-sensitive city match
pub fn by_city<'a>(table: &'a RankTable, city: &str) -> Vec<&'a College> {
    filter_colleges(table, |c| c.city == city)
}

/// First college whose name matches, ignoring case
pub fn by_name<'a>(table: &'a RankTable, name: &str) -> Option<&'a College> {
    let name = name.to_lowercase();
    table.colleges().find(|c| c.name.to_lowercase() == name)
}

/// Exact score match; the caller supplies the stored precision
pub fn by_score<'a>(table: &'a RankTable, score: f64) -> Vec<&'a College> {
    filter_colleges(table, |c| c.score == score)
}

/// Inclusive `min <= score <= max`
pub fn by_score_range<'a>(table: &'a RankTable, min: f64, max: f64) -> Result<Vec<&'a College>> {
    let bound = min.max(max);
    if bound > SCORE_CEILING {
        return Err(RankingsError::ScoreOutOfRange {
            bound,
            ceiling: SCORE_CEILING,
        });
    }
    Ok(filter_colleges(table, |c| min <= c.score && c.score <= max))
}

pub fn by_id<'a>(table: &'a RankTable, id: &str) -> Option<&'a College> {
    table.colleges().find(|c| c.id == id)
}

pub fn by_fice<'a>(table: &'a RankTable, fice_code: &str) -> Option<&'a College> {
    table.colleges().find(|c| c.fice_code == fice_code)
}

/// Colleges filed under `display_rank`; empty when the rank is absent
pub fn by_rank<'a>(table: &'a RankTable, display_rank: &str) -> &'a [College] {
    table.get(display_rank).unwrap_or(&[])
}

fn filter_colleges<'a, F>(table: &'a RankTable, predicate: F) -> Vec<&'a College>
where
    F: Fn(&College) -> bool,
{
    table.colleges().filter(|c| predicate(c)).collect()
}
