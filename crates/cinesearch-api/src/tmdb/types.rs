//! TMDB API response types and request parameters.

use serde::Deserialize;

/// Base URL for TMDB poster images (w500 rendition).
const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

// --- Movie List ---

/// Response from the `discover/movie` and `search/movie` endpoints.
///
/// Some gateway deployments signal logical failure in-band with
/// `response: "False"` and an `error` string instead of a non-2xx
/// status, so both fields are kept optional here.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieListResponse {
    /// Logical failure flag (`"False"` means the request failed).
    #[serde(default)]
    pub response: Option<String>,
    /// Error message accompanying a logical failure.
    #[serde(default)]
    pub error: Option<String>,
    /// Movie results (absent means empty).
    #[serde(default)]
    pub results: Vec<Movie>,
    /// Current page number.
    #[serde(default)]
    pub page: Option<u32>,
    /// Total number of results.
    #[serde(default)]
    pub total_results: Option<u32>,
}

impl MovieListResponse {
    /// Whether the payload signals an API-level failure.
    #[must_use]
    pub fn is_logical_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

/// A single movie record.
#[derive(Debug, Clone, Deserialize)]
pub struct Movie {
    /// TMDB movie ID.
    pub id: u64,
    /// Localized title.
    pub title: String,
    /// Poster image path (nullable).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Popularity score (drives the default ordering).
    #[serde(default)]
    pub popularity: f64,
    /// Release date (YYYY-MM-DD or null).
    #[serde(default)]
    pub release_date: Option<String>,
    /// Overview text.
    #[serde(default)]
    pub overview: Option<String>,
    /// Vote average.
    #[serde(default)]
    pub vote_average: f64,
    /// Original language (ISO 639-1).
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Full poster URL, or `None` when the movie has no poster.
    #[must_use]
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|p| format!("{IMAGE_BASE_URL}{p}"))
    }

    /// Release year extracted from `release_date`.
    #[must_use]
    pub fn release_year(&self) -> Option<&str> {
        self.release_date.as_deref().and_then(|d| d.get(..4))
    }
}

// --- Error Response ---

/// TMDB API error response body (non-2xx statuses).
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbErrorResponse {
    /// TMDB error code.
    pub status_code: u32,
    /// Error message.
    pub status_message: String,
    /// Success flag (always false for errors).
    pub success: bool,
}

// --- Request Parameters ---

/// Parameters for the `search/movie` endpoint.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Search query (required).
    pub query: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
    /// Include adult content.
    pub include_adult: bool,
}

impl SearchParams {
    /// Creates new search params with the given query.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            language: String::from("en-US"),
            page: 1,
            include_adult: false,
        }
    }

    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

/// Parameters for the `discover/movie` endpoint.
#[derive(Debug, Clone)]
pub struct DiscoverParams {
    /// Sort order (default: "popularity.desc").
    pub sort_by: String,
    /// Response language (default: "en-US").
    pub language: String,
    /// Result page (1-500, default: 1).
    pub page: u32,
}

impl DiscoverParams {
    /// Sets the response language.
    #[must_use]
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Sets the result page.
    #[must_use]
    pub const fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }
}

impl Default for DiscoverParams {
    fn default() -> Self {
        Self {
            sort_by: String::from("popularity.desc"),
            language: String::from("en-US"),
            page: 1,
        }
    }
}
