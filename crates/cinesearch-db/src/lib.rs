//! Database module for the persisted trending-search store.
//!
//! Uses `rusqlite` (bundled `SQLite`) to keep per-term search
//! counters with the representative movie of each term.

mod connection;
mod migrations;
/// Trending search counter operations.
pub mod trending;

pub use connection::open_db;
pub use rusqlite::Connection;
#[allow(clippy::module_name_repetitions)]
pub use trending::{RepresentativeMovie, TrendingEntry, load_trending, record_search};
