//! Collector
//!
//! Walks search pages from 1 upward until a page comes back with no items
//! or the page ceiling is passed, normalizing every listing into a
//! `College` grouped under its display rank.
//!
//! Any bad page or listing aborts the whole walk; nothing partial is
//! returned.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::client::PageSource;
use crate::error::{RankingsError, Result};
use crate::types::{College, Listing, RankTable, Token};

const SCORE_FIELD: &str = "schoolData.c_avg_acad_rep_score";
const RANK_FIELD: &str = "ranking.display_rank";

/// Fetch and group every listing up to `max_pages`
pub fn collect<S>(source: &S, max_pages: u32) -> Result<RankTable>
where
    S: PageSource + ?Sized,
{
    let mut table = RankTable::new();
    let mut page = 1;

    while page <= max_pages {
        let doc = source.fetch_page(page)?;
        let items = page_items(&doc, page)?;

        if items.is_empty() {
            debug!(page, "empty page, listing exhausted");
            break;
        }

        for (index, item) in items.iter().enumerate() {
            let (display_rank, college) = normalize_listing(item, page, index)?;
            table.push(&display_rank, college);
        }
        debug!(page, items = items.len(), "collected page");

        page += 1;
    }

    info!(
        colleges = table.college_count(),
        ranks = table.len(),
        "collection finished"
    );
    Ok(table)
}

fn page_items(doc: &Value, page: u32) -> Result<&Vec<Value>> {
    doc.pointer("/data/items")
        .and_then(Value::as_array)
        .ok_or(RankingsError::MissingItems { page })
}

/// Turn one raw item into its display rank and normalized record
pub fn normalize_listing(item: &Value, page: u32, index: usize) -> Result<(String, College)> {
    let listing: Listing = serde_json::from_value(item.clone())
        .map_err(|source| RankingsError::MalformedListing { page, index, source })?;

    let display_rank = listing.ranking.display_rank.to_text();
    let rank = parse_rank_label(&display_rank).ok_or_else(|| RankingsError::InvalidField {
        page,
        index,
        field: RANK_FIELD,
        value: display_rank.clone(),
    })?;

    let raw_score = listing
        .school_data
        .c_avg_acad_rep_score
        .as_ref()
        .ok_or(RankingsError::MissingField {
            page,
            index,
            field: SCORE_FIELD,
        })?;
    let score = parse_score(raw_score).ok_or_else(|| RankingsError::InvalidField {
        page,
        index,
        field: SCORE_FIELD,
        value: raw_score.to_text(),
    })?;

    let college = College {
        name: listing.name,
        city: listing.city.unwrap_or_default(),
        state: listing.state.unwrap_or_default().to_uppercase(),
        url: listing.url.unwrap_or_default(),
        score,
        id: listing.id.to_text(),
        fice_code: listing.fice_code.map(|t| t.to_text()).unwrap_or_default(),
        rank,
    };

    Ok((display_rank, college))
}

/// Integer rank from a display label such as `4`, `#4` or `Tie-4`
pub fn parse_rank_label(label: &str) -> Option<u32> {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    let re = DIGITS.get_or_init(|| Regex::new(r"\d+").expect("static rank pattern"));
    re.find(label)?.as_str().parse().ok()
}

fn parse_score(token: &Token) -> Option<f64> {
    let score = match token {
        Token::Number(n) => n.as_f64()?,
        Token::Text(s) => s.trim().parse().ok()?,
    };
    score.is_finite().then_some(score)
}
