//! TMDB API client module.
//!
//! Handles HTTP requests to the TMDB v3 `discover/movie` and
//! `search/movie` endpoints and deserializes movie list payloads.

mod api;
mod client;
mod rate_limiter;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalMovieApi, MovieApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use types::{DiscoverParams, Movie, MovieListResponse, SearchParams, TmdbErrorResponse};
