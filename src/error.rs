//! Error types for fetching, querying and dumping rankings

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RankingsError>;

#[derive(Debug, Error)]
pub enum RankingsError {
    #[error("cannot build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("page numbers start at 1, got {0}")]
    InvalidPage(u32),

    // Network
    #[error("request for page {page} failed")]
    Network {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("page {page} returned HTTP {status}")]
    HttpStatus { page: u32, status: u16 },

    #[error("page {page} body is not valid JSON")]
    Decode {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    // Extraction
    #[error("page {page} has no `data.items` list")]
    MissingItems { page: u32 },

    #[error("item {index} on page {page} is malformed")]
    MalformedListing {
        page: u32,
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("item {index} on page {page} is missing `{field}`")]
    MissingField {
        page: u32,
        index: usize,
        field: &'static str,
    },

    #[error("item {index} on page {page} has invalid `{field}`: {value:?}")]
    InvalidField {
        page: u32,
        index: usize,
        field: &'static str,
        value: String,
    },

    // Validation
    #[error("score bound {bound} exceeds the {ceiling} ceiling")]
    ScoreOutOfRange { bound: f64, ceiling: f64 },

    // Dump file
    #[error("cannot read dump file {path:?}")]
    DumpRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dump file {path:?} is not valid JSON")]
    DumpParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dump file {path:?} does not hold a JSON object")]
    DumpNotObject { path: PathBuf },

    #[error("cannot encode snapshot")]
    Encode(#[source] serde_json::Error),

    #[error("cannot write dump file {path:?}")]
    DumpWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
