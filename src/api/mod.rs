//! influxsql HTTP API
//!
//! HTTP layer built with Axum.
//!
//! # Endpoints
//!
//! ## Query
//! - `GET /query?q=<query>&u=<user>&p=<pass>` - Translate and execute a query
//! - `POST /query` - Same, parameters in a urlencoded form body
//! - `OPTIONS /query` - CORS preflight
//!
//! ## Health
//! - `GET /` - Returns `OK`
//!
//! Any other path answers 404.
//!
//! # Example
//!
//! ```rust,ignore
//! use influxsql::api::{serve, AppState};
//! use influxsql::config::Config;
//! use influxsql::db::Database;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load_default();
//!     let database = Arc::new(Database::connect(&config.database)?);
//!
//!     let state = AppState::from_config(database, &config);
//!     serve(state, &config.server.listen_address).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod routes;
pub mod state;

pub use auth::Credentials;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    http::{HeaderName, HeaderValue},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use routes::query::CORS_HEADERS;

/// Build the API router with all routes and middleware
///
/// The CORS headers wrap the timeout so a 408 or an extractor rejection on
/// `/query` carries them too.
pub fn build_router(state: AppState) -> Router {
    let timeout = state.request_timeout;
    let [origin, request_method, methods, headers] = CORS_HEADERS;

    Router::new()
        .route(
            "/query",
            get(routes::query::influx_query)
                .post(routes::query::influx_query)
                .options(routes::query::preflight),
        )
        .layer(TimeoutLayer::new(timeout))
        .layer(
            ServiceBuilder::new()
                .layer(cors_header(origin))
                .layer(cors_header(request_method))
                .layer(cors_header(methods))
                .layer(cors_header(headers)),
        )
        .route("/", get(routes::health::root))
        .fallback(routes::health::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn cors_header((name, value): (HeaderName, &'static str)) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}

/// Start the API server
pub async fn serve(state: AppState, addr: &str) -> Result<(), ApiError> {
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("influxsql listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("influxsql shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DbError, DbResult, QueryBackend};
    use crate::shape::{FetchedRows, Row};
    use crate::translate::Dialect;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::util::ServiceExt;

    /// In-memory backend recording every statement it receives
    struct StubBackend {
        outcome: fn() -> DbResult<FetchedRows>,
        delay: Option<Duration>,
        executed: Mutex<Vec<String>>,
    }

    impl StubBackend {
        fn new(outcome: fn() -> DbResult<FetchedRows>) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                delay: None,
                executed: Mutex::new(Vec::new()),
            })
        }

        fn slow(outcome: fn() -> DbResult<FetchedRows>, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                outcome,
                delay: Some(delay),
                executed: Mutex::new(Vec::new()),
            })
        }

        fn executed(&self) -> Vec<String> {
            self.executed.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryBackend for StubBackend {
        async fn fetch(&self, sql: &str) -> DbResult<FetchedRows> {
            self.executed.lock().unwrap().push(sql.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            (self.outcome)()
        }
    }

    fn cpu_rows() -> DbResult<FetchedRows> {
        Ok(FetchedRows::new(
            vec!["time".to_string(), "a".to_string(), "b".to_string()],
            vec![Row::new()
                .cell("time", Some("100"))
                .cell("a", Some("1.5"))
                .cell("b", None)],
        ))
    }

    fn bad_time_rows() -> DbResult<FetchedRows> {
        Ok(FetchedRows::new(
            vec!["time".to_string()],
            vec![Row::new().cell("time", Some("yesterday"))],
        ))
    }

    fn failing_query() -> DbResult<FetchedRows> {
        Err(DbError::Query(sqlx::Error::RowNotFound))
    }

    fn create_test_app(backend: Arc<StubBackend>, dialect: Dialect) -> Router {
        let state = AppState::new(backend, dialect, Credentials::new("grafana", "secret"))
            .with_series_name("cpu");
        build_router(state)
    }

    async fn send_get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_ok() {
        let app = create_test_app(StubBackend::new(cpu_rows), Dialect::MySql);

        let response = send_get(app, "/").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_unknown_path_not_found() {
        let app = create_test_app(StubBackend::new(cpu_rows), Dialect::MySql);

        let response = send_get(app, "/write").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_query_success() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = send_get(
            app,
            "/query?u=grafana&p=secret&q=SELECT%20*%20FROM%20cpu%20WHERE%20time%20%3E%20NOW()%20-%20translateTimePart(5m)",
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            body_string(response).await,
            r#"{"results":[{"series":[{"names":"cpu","columns":["time","a","b"],"values":[[100,1.5,"NULL"]]}]}]}"#
        );
        assert_eq!(
            backend.executed(),
            vec!["SELECT * FROM cpu WHERE time > NOW() - interval 5 minute".to_string()]
        );
    }

    #[tokio::test]
    async fn test_query_uses_configured_dialect() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::Postgres);

        let response = send_get(app, "/query?u=grafana&p=secret&q=translateTimePart(2h)").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.executed(), vec![" '2 hour'::interval".to_string()]);
    }

    #[tokio::test]
    async fn test_query_form_post() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/query")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("u=grafana&p=secret&q=SELECT+time+FROM+cpu"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.executed(), vec!["SELECT time FROM cpu".to_string()]);
    }

    #[tokio::test]
    async fn test_form_post_reads_url_credentials() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/query?u=grafana&p=secret")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("q=SELECT+time+FROM+cpu"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(backend.executed(), vec!["SELECT time FROM cpu".to_string()]);
    }

    #[tokio::test]
    async fn test_form_post_body_wins_over_url() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/query?u=grafana&p=secret&q=SELECT+1")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("p=guess&q=SELECT+2"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(backend.executed().is_empty());
    }

    #[tokio::test]
    async fn test_form_rejection_carries_cors_headers() {
        let app = create_test_app(StubBackend::new(cpu_rows), Dialect::MySql);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/query")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_wrong_password_unauthorized() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = send_get(app, "/query?u=grafana&p=guess&q=SELECT%201").await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(body_string(response).await, "401 Unauthorized");
        assert!(backend.executed().is_empty());
    }

    #[tokio::test]
    async fn test_missing_credentials_unauthorized() {
        let backend = StubBackend::new(cpu_rows);
        let app = create_test_app(Arc::clone(&backend), Dialect::MySql);

        let response = send_get(app, "/query?q=SELECT%201").await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(backend.executed().is_empty());
    }

    #[tokio::test]
    async fn test_execution_failure_internal_error() {
        let app = create_test_app(StubBackend::new(failing_query), Dialect::MySql);

        let response = send_get(app, "/query?u=grafana&p=secret&q=SELEC%20nonsense").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_row_coercion_failure_internal_error() {
        let app = create_test_app(StubBackend::new(bad_time_rows), Dialect::MySql);

        let response = send_get(app, "/query?u=grafana&p=secret&q=SELECT%20time%20FROM%20t").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_preflight() {
        let app = create_test_app(StubBackend::new(cpu_rows), Dialect::MySql);

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/query")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "OPTIONS, GET"
        );
        assert_eq!(
            response
                .headers()
                .get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .iter()
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_slow_query_times_out() {
        let backend = StubBackend::slow(cpu_rows, Duration::from_secs(5));
        let state = AppState::new(backend, Dialect::MySql, Credentials::default())
            .with_request_timeout(Duration::from_millis(50));
        let app = build_router(state);

        let response = send_get(app, "/query?q=SELECT%201").await;

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS],
            "OPTIONS, GET"
        );
    }
}
