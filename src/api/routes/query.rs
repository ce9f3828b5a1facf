//! Query Routes
//!
//! Influx-compatible query endpoint.
//!
//! - GET /query?q=&u=&p= - Execute a query
//! - POST /query - Same, with the parameters in the URL or a urlencoded form body
//! - OPTIONS /query - CORS preflight
//!
//! The CORS headers are set by the router around these handlers.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::shape::shape;
use crate::translate::translate;

/// Headers sent with every /query response, errors and timeouts included
pub const CORS_HEADERS: [(HeaderName, &str); 4] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_REQUEST_METHOD, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS, GET"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "*"),
];

/// Query parameters; any of them may be absent
#[derive(Debug, Default, Deserialize)]
pub struct InfluxQueryParams {
    pub q: Option<String>,
    pub u: Option<String>,
    pub p: Option<String>,
}

impl InfluxQueryParams {
    /// Layer form body values over URL values. A body value wins when both
    /// are present.
    pub fn overlay(self, body: InfluxQueryParams) -> Self {
        Self {
            q: body.q.or(self.q),
            u: body.u.or(self.u),
            p: body.p.or(self.p),
        }
    }
}

/// GET|POST /query
///
/// Check credentials, translate the query, run it and return the shaped
/// result tree. Nothing is sent to the database for an unauthorized request.
/// On POST the parameters may be split between the URL and the body.
pub async fn influx_query(
    State(state): State<Arc<AppState>>,
    Query(url): Query<InfluxQueryParams>,
    Form(body): Form<InfluxQueryParams>,
) -> ApiResult<Response> {
    let params = url.overlay(body);
    let user = params.u.as_deref().unwrap_or_default();
    let password = params.p.as_deref().unwrap_or_default();
    let query = params.q.as_deref().unwrap_or_default();

    if !state.credentials.verify(user, password) {
        tracing::warn!(user = %user, "Invalid credentials");
        return Err(ApiError::Unauthorized);
    }

    let sql = translate(query, state.dialect);
    tracing::debug!(query = %query, sql = %sql, "Translated query");

    let mut rows = match state.backend.fetch(&sql).await {
        Ok(rows) => rows,
        Err(source) => return Err(ApiError::QueryExecution { query: sql, source }),
    };
    let tree = shape(&mut rows, &state.series_name)?;
    let body = serde_json::to_vec(&tree)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response())
}

/// OPTIONS /query
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
