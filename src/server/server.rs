use anyhow::Result;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tracing::error;

use crate::movies::{LookupError, MovieService};
use crate::query::MovieQuery;
use crate::resolve::ResolveError;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::metrics::{metrics_handler, record_lookup_failure};
use super::{log_requests, reject_mutating_methods, state::*, RequestsLoggingLevel, ServerConfig};

#[derive(Serialize)]
struct ServerStats {
    pub uptime: String,
    pub cached_records: usize,
}

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

#[derive(Deserialize, Debug)]
struct MovieParams {
    title: Option<String>,
    year: Option<String>,
}

async fn home(State(state): State<ServerState>) -> impl IntoResponse {
    let stats = ServerStats {
        uptime: format_uptime(state.start_time.elapsed()),
        cached_records: state.movie_service.cached_entries(),
    };
    Json(stats)
}

async fn get_movie(
    State(movie_service): State<GuardedMovieService>,
    Query(params): Query<MovieParams>,
) -> Response {
    let query = match MovieQuery::from_params(params.title.as_deref(), params.year.as_deref()) {
        Ok(query) => query,
        Err(err) => return lookup_error_response(err),
    };

    match movie_service.lookup(&query).await {
        Ok(record) => Json(record).into_response(),
        Err(err) => lookup_error_response(err),
    }
}

/// All resolution failures surface uniformly as 404 with the failure's
/// message; only storage errors are internal.
fn lookup_error_response(err: LookupError) -> Response {
    record_lookup_failure(failure_kind(&err));

    match err {
        LookupError::Store(err) => {
            error!("Record store failure: {:#}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal Server Error" })),
            )
                .into_response()
        }
        err => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

fn failure_kind(err: &LookupError) -> &'static str {
    match err {
        LookupError::InvalidRequest => "invalid_request",
        LookupError::Resolve(ResolveError::MissingResults) => "missing_results",
        LookupError::Resolve(ResolveError::NoMatch) => "no_match",
        LookupError::Resolve(ResolveError::AmbiguousMatch) => "ambiguous_match",
        LookupError::Resolve(ResolveError::YearFilterMismatch) => "year_filter_mismatch",
        LookupError::Resolve(ResolveError::EmptyFilmId) => "empty_film_id",
        LookupError::Assemble(_) => "empty_detail",
        LookupError::Store(_) => "store",
    }
}

pub fn make_app(config: ServerConfig, movie_service: Arc<MovieService>) -> Router {
    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        movie_service,
    };

    let movie_routes: Router = Router::new()
        .route("/movies", get(get_movie))
        .layer(middleware::from_fn(reject_mutating_methods))
        .with_state(state.clone());

    let app: Router = Router::new()
        .route("/", get(home))
        .with_state(state.clone())
        .merge(movie_routes);

    app.layer(middleware::from_fn_with_state(state, log_requests))
}

pub async fn run_server(
    movie_service: Arc<MovieService>,
    requests_logging_level: RequestsLoggingLevel,
    port: u16,
    metrics_port: u16,
) -> Result<()> {
    let config = ServerConfig {
        requests_logging_level,
        port,
        metrics_port,
    };
    let app = make_app(config, movie_service);

    let metrics_app: Router = Router::new().route("/metrics", get(metrics_handler));
    let metrics_listener =
        tokio::net::TcpListener::bind(format!("127.0.0.1:{}", metrics_port)).await?;
    tokio::spawn(async move {
        if let Err(err) = axum::serve(metrics_listener, metrics_app).await {
            error!("Metrics server stopped: {}", err);
        }
    });

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;

    Ok(axum::serve(listener, app).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheGateway;
    use crate::imdb::{
        Fetched, FilmId, MovieDatabase, RatingsResponse, SearchResponse, TitleResponse,
    };
    use crate::record_store::{RecordStore, StoredRecord};
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct EmptyDatabase;

    #[async_trait]
    impl MovieDatabase for EmptyDatabase {
        async fn search(&self, _title: &str, _year: u32) -> Fetched<SearchResponse> {
            Fetched::Unavailable
        }

        async fn title(&self, _film_id: &FilmId) -> Fetched<TitleResponse> {
            Fetched::Unavailable
        }

        async fn ratings(&self, _film_id: &FilmId) -> Fetched<RatingsResponse> {
            Fetched::Unavailable
        }
    }

    #[derive(Default)]
    struct InMemoryRecordStore {
        entries: Mutex<HashMap<String, StoredRecord>>,
    }

    impl RecordStore for InMemoryRecordStore {
        fn get(&self, key: &str) -> anyhow::Result<Option<StoredRecord>> {
            Ok(self.entries.lock().unwrap().get(key).cloned())
        }

        fn put(&self, key: &str, stored: &StoredRecord) -> anyhow::Result<()> {
            self.entries
                .lock()
                .unwrap()
                .insert(key.to_string(), stored.clone());
            Ok(())
        }

        fn exists(&self, key: &str) -> anyhow::Result<bool> {
            Ok(self.entries.lock().unwrap().contains_key(key))
        }

        fn count(&self) -> anyhow::Result<usize> {
            Ok(self.entries.lock().unwrap().len())
        }
    }

    fn test_app() -> Router {
        let store = Arc::new(InMemoryRecordStore::default());
        let service = Arc::new(MovieService::new(
            Arc::new(EmptyDatabase),
            CacheGateway::new(store, None),
        ));
        make_app(ServerConfig::default(), service)
    }

    #[tokio::test]
    async fn home_responds_ok() {
        let app = test_app();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_title_is_rejected_before_resolution() {
        let app = test_app();
        let request = Request::builder()
            .uri("/movies")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], "Not param title in request");
    }

    #[tokio::test]
    async fn unavailable_upstream_is_a_404() {
        let app = test_app();
        let request = Request::builder()
            .uri("/movies?title=Inception&year=2010")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], "Not found key results in answer");
    }

    #[tokio::test]
    async fn mutating_methods_are_rejected() {
        for method in ["POST", "PUT", "DELETE"] {
            let app = test_app();
            let request = Request::builder()
                .method(method)
                .uri("/movies?title=Inception")
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::METHOD_NOT_ALLOWED,
                "{} should not be allowed",
                method
            );
        }
    }

    #[tokio::test]
    async fn method_override_headers_are_rejected() {
        for value in ["DELETE", "PUT", "PATCH"] {
            let app = test_app();
            let request = Request::builder()
                .method("POST")
                .uri("/movies?title=Inception")
                .header(super::super::METHOD_OVERRIDE_HEADER, value)
                .body(Body::empty())
                .unwrap();
            let response = app.oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        }
    }

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }
}
