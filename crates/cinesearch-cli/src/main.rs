//! cinesearch - terminal movie browser with trending search history.

/// Application configuration (TOML).
mod config;
/// Movie fetch normalization.
mod fetch;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;

use crate::config::{AppConfig, resolve_config_path};
use crate::fetch::FetchedMovies;
use crate::tui::run_browser;
use cinesearch_api::tmdb::{Movie, TmdbClient};
use cinesearch_db::{RepresentativeMovie, load_trending, open_db, record_search};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively via TUI.
    Browse,
    /// Search movies and print the results.
    Search(SearchArgs),
    /// List popular movies and print the results.
    Discover,
    /// Show the most searched terms.
    Trending(TrendingArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "the dark knight").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `trending` subcommand.
#[derive(clap::Args)]
struct TrendingArgs {
    /// Maximum number of terms to show.
    #[arg(long)]
    limit: Option<u32>,
}

/// Builds a `TmdbClient` from the `TMDB_API_TOKEN` environment variable.
///
/// A missing token is not fatal: the client is built with an empty
/// token and requests fail through the normal error path, so the UI
/// still starts and shows the fetch error state.
///
/// # Errors
///
/// Returns an error if the client fails to build.
fn build_tmdb_client() -> Result<TmdbClient> {
    let api_token = std::env::var("TMDB_API_TOKEN").unwrap_or_else(|_| {
        tracing::warn!("TMDB_API_TOKEN is not set, requests will fail");
        String::new()
    });

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build API client")
}

/// Loads config for the given directory override.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    AppConfig::load(&config_path).context("failed to load config")
}

/// Prints a movie list as one line per movie.
fn print_movies(movies: &[Movie]) {
    tracing::info!("ID\t\tYear\tRating\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{:.1}\t{}",
            movie.id,
            movie.release_year().unwrap_or("-"),
            movie.vote_average,
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if client build, DB open, or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let client = Arc::new(build_tmdb_client()?);
    let conn = open_db(dir).context("failed to open database")?;
    let config = load_config(dir)?;

    run_browser(client, conn, &config).await
}

/// Runs the `search` subcommand.
///
/// A successful search with results also bumps the trending counter
/// for the term, mirroring the TUI behavior.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let client = build_tmdb_client()?;

    match fetch::fetch_movies(&client, &args.query).await {
        FetchedMovies::Loaded(movies) => {
            print_movies(&movies);

            if let Some(first) = movies.first() {
                let representative = RepresentativeMovie {
                    movie_id: first.id,
                    poster_url: first.poster_url(),
                    title: first.title.clone(),
                };
                // Best effort: a counter failure must not fail the search.
                match open_db(dir)
                    .and_then(|conn| record_search(&conn, &args.query, &representative))
                {
                    Ok(()) => {}
                    Err(e) => tracing::warn!(%e, "failed to record trending search"),
                }
            }
            Ok(())
        }
        FetchedMovies::Failed(message) => bail!(message),
    }
}

/// Runs the `discover` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the fetch fails.
#[instrument(skip_all)]
async fn run_discover() -> Result<()> {
    let client = build_tmdb_client()?;

    match fetch::fetch_movies(&client, "").await {
        FetchedMovies::Loaded(movies) => {
            print_movies(&movies);
            Ok(())
        }
        FetchedMovies::Failed(message) => bail!(message),
    }
}

/// Runs the `trending` subcommand.
///
/// # Errors
///
/// Returns an error if DB open or the query fails.
#[instrument(skip_all)]
fn run_trending(args: &TrendingArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let limit = args.limit.unwrap_or(config.trending.limit);

    let conn = open_db(dir).context("failed to open database")?;
    let entries = load_trending(&conn, limit).context("failed to load trending searches")?;

    tracing::info!("Count\tQuery\t\tTop result");
    for entry in &entries {
        tracing::info!("{}\t{}\t\t{}", entry.count, entry.query, entry.title);
    }
    tracing::info!("Total: {} terms", entries.len());

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Discover => run_discover().await,
        Commands::Trending(args) => run_trending(&args, cli.dir.as_ref()),
    }
}
