//! Route handlers.
//!
//! Page routes (`/`, `/generic`, `/item`) set the site cookie on every
//! response, including their 404s.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use regex::Regex;
use serde::Serialize;

use crate::health::{FailoverMode, RoundReport};
use crate::http::render::RenderContext;
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

const NOT_FOUND_BODY: &str = "404 page not found";

/// `GET /`: home page with the resource pair for the current mode.
pub async fn home(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mode = state.failover.mode();
    let context = RenderContext::select(&state.resources, mode);

    let body = match state.template.render(&context) {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(request_id = %request_id(&headers), error = %e, "Failed to render home page");
            metrics::record_request("home", 500);
            return (StatusCode::INTERNAL_SERVER_ERROR, "500 internal server error").into_response();
        }
    };

    tracing::debug!(
        request_id = %request_id(&headers),
        mode = %mode,
        image_url = %context.image_url,
        "Rendering home page"
    );
    metrics::record_request("home", 200);

    ([(header::SET_COOKIE, state.cookie.clone())], Html(body)).into_response()
}

/// `GET /generic/...`: plain-text diagnostics about the request.
pub async fn generic(State(state): State<AppState>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let form = parse_form(uri.query().unwrap_or(""));
    let cookies = request_cookies(&headers);

    let body = format!(
        "generic handler says ...\n \
         method       '{}'\n \
         request uri  '{}'\n \
         path         '{}'\n \
         form         '{}'\n \
         cookies      '[{}]'\n",
        method,
        uri,
        uri.path(),
        format_form(&form),
        cookies.join(" "),
    );

    metrics::record_request("generic", 200);
    (
        [
            (header::SET_COOKIE, state.cookie.clone()),
            (header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8")),
        ],
        body,
    )
        .into_response()
}

#[derive(Debug, Serialize)]
struct Item<'a> {
    what: &'static str,
    name: &'a str,
}

/// `GET /item/{name}`: JSON description of a word-character item name.
pub async fn item(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    if !is_item_name(&name) {
        metrics::record_request("item", 404);
        return (
            StatusCode::NOT_FOUND,
            [(header::SET_COOKIE, state.cookie.clone())],
            NOT_FOUND_BODY,
        )
            .into_response();
    }

    metrics::record_request("item", 200);
    (
        [(header::SET_COOKIE, state.cookie.clone())],
        Json(Item { what: "item", name: &name }),
    )
        .into_response()
}

#[derive(Debug, Serialize)]
pub struct StatusBody<'a> {
    pub mode: FailoverMode,
    pub serving: RenderContext<'a>,
    pub last_round: Option<RoundReport>,
}

/// `GET /status`: current mode and the latest probe round.
///
/// Mode comes from the report snapshot so the body never mixes two rounds;
/// the flag is only consulted before the first round.
pub async fn status(State(state): State<AppState>) -> Response {
    let last_round = state.reports.load().map(|report| report.as_ref().clone());
    let mode = match &last_round {
        Some(report) => report.mode,
        None => state.failover.mode(),
    };
    metrics::record_request("status", 200);

    Json(StatusBody {
        mode,
        serving: RenderContext::select(&state.resources, mode),
        last_round,
    })
    .into_response()
}

/// Fallback for unmatched routes.
pub async fn not_found() -> Response {
    metrics::record_request("unmatched", 404);
    (StatusCode::NOT_FOUND, NOT_FOUND_BODY).into_response()
}

/// One or more ASCII word characters.
static ITEM_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid regex"));

fn is_item_name(name: &str) -> bool {
    ITEM_NAME.is_match(name)
}

/// Group query parameters by key, keeping value order.
fn parse_form(query: &str) -> BTreeMap<String, Vec<String>> {
    let mut form: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        form.entry(key.into_owned()).or_default().push(value.into_owned());
    }
    form
}

fn format_form(form: &BTreeMap<String, Vec<String>>) -> String {
    form.iter()
        .map(|(key, values)| format!("{}: [{}]", key, values.join(" ")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `name=value` pairs from every Cookie header.
fn request_cookies(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
        .collect()
}
