//! Trending search counter operations.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// A trending search entry as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingEntry {
    /// Row ID.
    pub id: i64,
    /// Search query term (unique key).
    pub query: String,
    /// Accumulated search count.
    pub count: u32,
    /// Representative movie ID.
    pub movie_id: u64,
    /// Representative movie title.
    pub title: String,
    /// Representative movie poster URL (nullable).
    pub poster_url: Option<String>,
}

/// Display metadata of the first result attached to a trending entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentativeMovie {
    /// TMDB movie ID.
    pub movie_id: u64,
    /// Movie title.
    pub title: String,
    /// Full poster URL (nullable).
    pub poster_url: Option<String>,
}

/// Records a search: increments the counter for `query`, or creates a
/// new entry with count 1 storing the representative movie.
///
/// Uses `INSERT ... ON CONFLICT(query) DO UPDATE SET` so the count is
/// additive while the query stays an idempotent key. The representative
/// movie is refreshed on each hit so the poster tracks the latest
/// top result for the term.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn record_search(conn: &Connection, query: &str, movie: &RepresentativeMovie) -> Result<()> {
    conn.execute(
        "INSERT INTO trending_searches (query, count, movie_id, title, poster_url)
         VALUES (?1, 1, ?2, ?3, ?4)
         ON CONFLICT(query) DO UPDATE SET
            count = count + 1,
            movie_id = excluded.movie_id,
            title = excluded.title,
            poster_url = excluded.poster_url",
        rusqlite::params![query, movie.movie_id, movie.title, movie.poster_url],
    )
    .with_context(|| format!("failed to record search for {query:?}"))?;

    Ok(())
}

/// Loads up to `limit` trending entries ordered by descending count.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn load_trending(conn: &Connection, limit: u32) -> Result<Vec<TrendingEntry>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, query, count, movie_id, title, poster_url
             FROM trending_searches
             ORDER BY count DESC, id ASC
             LIMIT ?1",
        )
        .context("failed to prepare trending query")?;

    let rows = stmt
        .query_map([limit], |row| {
            Ok(TrendingEntry {
                id: row.get(0)?,
                query: row.get(1)?,
                count: row.get(2)?,
                movie_id: row.get(3)?,
                title: row.get(4)?,
                poster_url: row.get(5)?,
            })
        })
        .context("failed to query trending_searches")?;

    rows.collect::<std::result::Result<Vec<_>, _>>()
        .context("failed to read trending_searches rows")
}
