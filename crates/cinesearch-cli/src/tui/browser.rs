//! Movie browser TUI main loop.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cinesearch_api::tmdb::TmdbClient;
use cinesearch_db::Connection;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use super::debounce::Debouncer;
use super::state::BrowserState;
use super::ui;
use crate::config::AppConfig;
use crate::fetch::{self, FetchedMovies};

/// A completed fetch delivered back to the event loop.
struct FetchEvent {
    /// Sequence number issued by [`BrowserState::begin_fetch`].
    seq: u64,
    /// Term the fetch was started for.
    term: String,
    /// Normalized outcome.
    outcome: FetchedMovies,
}

/// Runs the movie browser TUI.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
pub async fn run_browser(
    client: Arc<TmdbClient>,
    conn: Connection,
    config: &AppConfig,
) -> Result<()> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let result = run_event_loop(&mut terminal, client, &conn, config).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Main event loop.
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    client: Arc<TmdbClient>,
    conn: &Connection,
    config: &AppConfig,
) -> Result<()> {
    let trending = cinesearch_db::load_trending(conn, config.trending.limit).unwrap_or_else(|e| {
        tracing::warn!(%e, "failed to load trending searches");
        Vec::new()
    });

    let mut state = BrowserState::new(trending);
    let mut debouncer = Debouncer::new(Duration::from_millis(config.search.debounce_ms));
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchEvent>();

    // Startup fetch: empty query lists movies by popularity.
    spawn_fetch(&client, &tx, &mut state, String::new());

    loop {
        terminal
            .draw(|frame| ui::draw(frame, &state))
            .context("failed to draw TUI")?;

        // Apply completed fetches before reading input so a settled
        // result never renders one frame late.
        while let Ok(fetch_event) = rx.try_recv() {
            apply_fetch_event(&mut state, conn, config, fetch_event);
        }

        if event::poll(Duration::from_millis(50)).context("failed to poll events")?
            && let Event::Key(key) = event::read().context("failed to read event")?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Esc => return Ok(()),
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Enter => {
                    // Bypass the debounce delay.
                    if let Some(term) = debouncer.flush() {
                        spawn_fetch(&client, &tx, &mut state, term);
                    }
                }
                KeyCode::Backspace => {
                    state.input_pop();
                    debouncer.input(state.input.clone(), Instant::now());
                }
                KeyCode::Char(c) => {
                    state.input_push(c);
                    debouncer.input(state.input.clone(), Instant::now());
                }
                KeyCode::Up => state.move_up(),
                KeyCode::Down => state.move_down(),
                _ => {}
            }
        }

        if let Some(term) = debouncer.poll(Instant::now())
            && term != state.current_term
        {
            spawn_fetch(&client, &tx, &mut state, term);
        }
    }
}

/// Starts a background fetch for `term` and registers its sequence
/// number with the state.
fn spawn_fetch(
    client: &Arc<TmdbClient>,
    tx: &mpsc::UnboundedSender<FetchEvent>,
    state: &mut BrowserState,
    term: String,
) {
    let seq = state.begin_fetch(&term);
    let client = Arc::clone(client);
    let tx = tx.clone();

    tokio::spawn(async move {
        let outcome = fetch::fetch_movies(&client, &term).await;
        // The receiver only drops when the loop exits; nothing to do then.
        let _ = tx.send(FetchEvent { seq, term, outcome });
    });
}

/// Applies one completed fetch: stale results are discarded, and an
/// applied successful search bumps the trending counter for its term.
fn apply_fetch_event(
    state: &mut BrowserState,
    conn: &Connection,
    config: &AppConfig,
    fetch_event: FetchEvent,
) {
    let FetchEvent { seq, term, outcome } = fetch_event;

    let first_movie = match &outcome {
        FetchedMovies::Loaded(movies) => movies.first().cloned(),
        FetchedMovies::Failed(_) => None,
    };

    if !state.apply_fetch(seq, outcome) {
        tracing::debug!(term, seq, "discarded stale fetch result");
        return;
    }

    // Trending only counts non-empty searches that returned results.
    let Some(movie) = first_movie else { return };
    if term.is_empty() {
        return;
    }

    let representative = cinesearch_db::RepresentativeMovie {
        movie_id: movie.id,
        poster_url: movie.poster_url(),
        title: movie.title,
    };
    if let Err(e) = cinesearch_db::record_search(conn, &term, &representative) {
        tracing::warn!(%e, term, "failed to record trending search");
        return;
    }

    match cinesearch_db::load_trending(conn, config.trending.limit) {
        Ok(trending) => state.trending = trending,
        Err(e) => tracing::warn!(%e, "failed to reload trending searches"),
    }
}
