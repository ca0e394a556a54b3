//! Movie fetch normalization.
//!
//! Selects the endpoint from the (possibly empty) query, issues the
//! request, and collapses every failure mode into a single user-facing
//! message. The underlying cause is logged, never surfaced.

use cinesearch_api::tmdb::{DiscoverParams, LocalMovieApi, Movie, SearchParams, TmdbClient};

/// User-facing message for transport, status, and parse failures.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

/// Fallback message for a logical failure without an `error` field.
const LOGICAL_FAILURE_FALLBACK: &str = "Failed to fetch movies";

/// Outcome of one fetch: a (possibly empty) movie list, or a message
/// for the user. Never both.
#[derive(Debug, Clone)]
pub enum FetchedMovies {
    /// Fetch succeeded; the list may be empty.
    Loaded(Vec<Movie>),
    /// Fetch failed; the list is empty and this message is shown.
    Failed(String),
}

/// Fetches movies for the given query.
///
/// An empty query lists movies by popularity (`discover/movie`);
/// a non-empty query searches (`search/movie`). All errors are mapped
/// to [`FetchedMovies::Failed`], so this function never returns `Err`.
pub async fn fetch_movies(client: &TmdbClient, query: &str) -> FetchedMovies {
    let result = if query.is_empty() {
        client.discover_movies(&DiscoverParams::default()).await
    } else {
        client.search_movies(&SearchParams::new(query)).await
    };

    match result {
        Ok(payload) => {
            if payload.is_logical_failure() {
                let message = payload
                    .error
                    .unwrap_or_else(|| String::from(LOGICAL_FAILURE_FALLBACK));
                tracing::warn!(query, message, "TMDB payload signalled failure");
                return FetchedMovies::Failed(message);
            }
            FetchedMovies::Loaded(payload.results)
        }
        Err(error) => {
            tracing::error!(query, %error, "Error fetching movies");
            FetchedMovies::Failed(String::from(FETCH_ERROR_MESSAGE))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use std::time::Duration;

    use super::*;

    async fn mock_client(mock_server: &wiremock::MockServer) -> TmdbClient {
        let base_url = format!("{}/3/", mock_server.uri());
        TmdbClient::builder()
            .base_url(base_url.parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_query_uses_discover_endpoint() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/discover_popular.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/discover/movie"))
            .and(wiremock::matchers::query_param("sort_by", "popularity.desc"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "").await;

        // Assert
        match outcome {
            FetchedMovies::Loaded(movies) => assert_eq!(movies.len(), 3),
            FetchedMovies::Failed(msg) => panic!("unexpected failure: {msg}"),
        }
    }

    #[tokio::test]
    async fn test_non_empty_query_uses_search_endpoint() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/search_batman.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/3/search/movie"))
            .and(wiremock::matchers::query_param("query", "batman"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "batman").await;

        // Assert
        match outcome {
            FetchedMovies::Loaded(movies) => {
                assert_eq!(movies.len(), 2);
                assert_eq!(movies[0].title, "The Batman");
            }
            FetchedMovies::Failed(msg) => panic!("unexpected failure: {msg}"),
        }
    }

    #[tokio::test]
    async fn test_empty_results_is_loaded_not_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/search_empty.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "").await;

        // Assert
        match outcome {
            FetchedMovies::Loaded(movies) => assert!(movies.is_empty()),
            FetchedMovies::Failed(msg) => panic!("unexpected failure: {msg}"),
        }
    }

    #[tokio::test]
    async fn test_non_success_status_yields_generic_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "batman").await;

        // Assert
        match outcome {
            FetchedMovies::Failed(msg) => assert_eq!(msg, FETCH_ERROR_MESSAGE),
            FetchedMovies::Loaded(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_network_error_yields_generic_message() {
        // Arrange: nothing listening on this port
        let client = TmdbClient::builder()
            .base_url("http://127.0.0.1:9/3/".parse().unwrap())
            .api_token("test-token")
            .user_agent("test/0.0.0")
            .min_interval(Duration::from_millis(0))
            .build()
            .unwrap();

        // Act
        let outcome = fetch_movies(&client, "").await;

        // Assert
        match outcome {
            FetchedMovies::Failed(msg) => assert_eq!(msg, FETCH_ERROR_MESSAGE),
            FetchedMovies::Loaded(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_yields_generic_message() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "batman").await;

        // Assert
        match outcome {
            FetchedMovies::Failed(msg) => assert_eq!(msg, FETCH_ERROR_MESSAGE),
            FetchedMovies::Loaded(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_logical_failure_surfaces_payload_error() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;
        let json_body = include_str!("../../../fixtures/tmdb/list_failure.json");

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(json_body))
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "batman").await;

        // Assert
        match outcome {
            FetchedMovies::Failed(msg) => assert_eq!(msg, "Movie not found!"),
            FetchedMovies::Loaded(_) => panic!("expected failure"),
        }
    }

    #[tokio::test]
    async fn test_logical_failure_without_error_uses_fallback() {
        // Arrange
        let mock_server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(
                wiremock::ResponseTemplate::new(200).set_body_string(r#"{"response":"False"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = mock_client(&mock_server).await;

        // Act
        let outcome = fetch_movies(&client, "batman").await;

        // Assert
        match outcome {
            FetchedMovies::Failed(msg) => assert_eq!(msg, "Failed to fetch movies"),
            FetchedMovies::Loaded(_) => panic!("expected failure"),
        }
    }
}
