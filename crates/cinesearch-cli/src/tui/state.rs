//! Movie browser state management.

use cinesearch_api::tmdb::Movie;
use cinesearch_db::TrendingEntry;

use crate::fetch::FetchedMovies;

/// Render state of the movie list. The three states are mutually
/// exclusive; the trending strip renders independently of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchPhase {
    /// A fetch is in flight.
    Loading,
    /// The last fetch failed with this message.
    Error(String),
    /// The last fetch succeeded (list may be empty).
    Loaded,
}

/// State for the movie browser TUI.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserState {
    /// Raw search input as typed.
    pub input: String,
    /// Term of the most recently started fetch.
    pub current_term: String,
    /// Current render phase.
    pub phase: FetchPhase,
    /// Movies from the latest applied fetch.
    pub movies: Vec<Movie>,
    /// Trending strip entries (loaded once at startup).
    pub trending: Vec<TrendingEntry>,
    /// Cursor position in the movie list.
    pub cursor: usize,
    /// Sequence number of the latest started fetch.
    latest_seq: u64,
}

impl BrowserState {
    /// Creates the initial state: `Loading`, pending the startup fetch.
    #[must_use]
    pub fn new(trending: Vec<TrendingEntry>) -> Self {
        Self {
            input: String::new(),
            current_term: String::new(),
            phase: FetchPhase::Loading,
            movies: Vec::new(),
            trending,
            cursor: 0,
            latest_seq: 0,
        }
    }

    /// Marks a new fetch started for `term` and returns its sequence
    /// number. Enters `Loading` and clears any previous error.
    pub fn begin_fetch(&mut self, term: &str) -> u64 {
        self.latest_seq = self.latest_seq.wrapping_add(1);
        self.current_term = String::from(term);
        self.phase = FetchPhase::Loading;
        self.latest_seq
    }

    /// Applies a fetch completion.
    ///
    /// Returns `false` when `seq` is not the latest fetch (a stale
    /// response superseded by a newer term), in which case the state
    /// is left untouched.
    pub fn apply_fetch(&mut self, seq: u64, outcome: FetchedMovies) -> bool {
        if seq != self.latest_seq {
            return false;
        }

        match outcome {
            FetchedMovies::Loaded(movies) => {
                self.movies = movies;
                self.phase = FetchPhase::Loaded;
            }
            FetchedMovies::Failed(message) => {
                self.movies = Vec::new();
                self.phase = FetchPhase::Error(message);
            }
        }
        self.cursor = 0;
        true
    }

    /// Whether a fetch is currently in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Returns the movie under the cursor (if any).
    #[must_use]
    pub fn selected_movie(&self) -> Option<&Movie> {
        self.movies.get(self.cursor)
    }

    /// Moves the list cursor up.
    pub const fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Moves the list cursor down.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.movies.len() {
            self.cursor += 1;
        }
    }

    /// Appends a character to the raw input.
    pub fn input_push(&mut self, ch: char) {
        self.input.push(ch);
    }

    /// Removes the last character from the raw input.
    pub fn input_pop(&mut self) {
        self.input.pop();
    }
}
