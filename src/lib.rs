//! Graduate CS Rankings Library
//!
//! Fetches ranked computer-science programs from the search API, groups
//! them by display rank, and offers lookups plus JSON snapshot dumps.

pub mod client;
pub mod collector;
pub mod error;
pub mod query;
pub mod settings;
pub mod shell;
pub mod storage;
pub mod types;

pub use client::{PageSource, RankingsClient};
pub use error::RankingsError;
pub use types::*;
