//! Stand-in for the Alpha Vantage `/query` endpoint.
//!
//! Serves canned JSON and CSV bodies keyed on the `function` parameter and
//! reproduces the service's error conventions: most failures come back as a
//! `200` with an `Information` or `Error Message` object, and outages as a
//! non-2xx `{code, detail}` body.

pub mod fixtures;

use axum::{
    extract::Query,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;

/// Key accepted as valid by the mock.
pub const API_KEY: &str = "demo";
/// Key that always gets the rate-limit `Information` body.
pub const RATE_LIMITED_KEY: &str = "rate-limited";
/// Key that always gets a `503` status body.
pub const OUTAGE_KEY: &str = "outage";
/// Ticker that makes `NEWS_SENTIMENT` answer with an `Error Message`.
pub const INVALID_TICKER: &str = "INVALID_TICKER";

pub const CSV_CONTENT_TYPE: &str = "application/x-download";

/// Decoded query string; keys may repeat.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self(pairs)
    }

    pub fn first(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn all(&self, name: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }

    pub fn wants_csv(&self) -> bool {
        self.first("datatype")
            .is_some_and(|d| d.eq_ignore_ascii_case("csv"))
    }
}

pub fn app() -> Router {
    Router::new().route("/query", get(query))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn query(Query(pairs): Query<Vec<(String, String)>>) -> Response {
    let params = Params::new(pairs);
    let function = params.first("function").unwrap_or_default().to_ascii_uppercase();
    tracing::debug!(%function, "serving query");

    match params.first("apikey") {
        None | Some("") => {
            return information(
                "the parameter apikey is invalid or missing. Please claim your free API key.",
            )
        }
        Some(RATE_LIMITED_KEY) => {
            return information(
                "Thank you for using Alpha Vantage! Our standard API rate limit is 25 requests per day.",
            )
        }
        Some(OUTAGE_KEY) => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"code": 503, "detail": "service temporarily unavailable"})),
            )
                .into_response()
        }
        Some(_) => {}
    }

    match function.as_str() {
        "NEWS_SENTIMENT" => news_sentiment(&params),
        "TOP_GAINERS_LOSERS" => Json(fixtures::top_gainers_losers()).into_response(),
        "LISTING_STATUS" => listing_status(&params),
        "GLOBAL_QUOTE" => global_quote(&params),
        f if f.starts_with("TIME_SERIES_") => time_series(f, &params),
        _ => error_message("This API function does not exist."),
    }
}

fn information(text: &str) -> Response {
    Json(json!({ "Information": text })).into_response()
}

fn error_message(text: &str) -> Response {
    Json(json!({ "Error Message": text })).into_response()
}

fn csv(body: String) -> Response {
    ([(header::CONTENT_TYPE, CSV_CONTENT_TYPE)], body).into_response()
}

fn news_sentiment(params: &Params) -> Response {
    let tickers = params.all("tickers");
    if tickers.contains(&INVALID_TICKER) {
        return error_message("Invalid inputs. Please refer to the API documentation.");
    }
    Json(fixtures::news_sentiment(&tickers)).into_response()
}

fn listing_status(params: &Params) -> Response {
    let delisted = params
        .first("state")
        .is_some_and(|s| s.eq_ignore_ascii_case("delisted"));
    csv(fixtures::listing_csv(delisted))
}

fn global_quote(params: &Params) -> Response {
    let Some(symbol) = params.first("symbol").filter(|s| !s.is_empty()) else {
        return error_message("Invalid API call. Please retry or visit the documentation.");
    };
    if params.wants_csv() {
        csv(fixtures::global_quote_csv(symbol))
    } else {
        Json(fixtures::global_quote(symbol)).into_response()
    }
}

fn time_series(function: &str, params: &Params) -> Response {
    let Some(symbol) = params.first("symbol").filter(|s| !s.is_empty()) else {
        return error_message("Invalid API call. Please retry or visit the documentation.");
    };
    let interval = params.first("interval").unwrap_or_default();
    let Some(key) = fixtures::series_key(function, interval) else {
        return error_message("Invalid API call. Please retry or visit the documentation.");
    };
    let adjusted = function.ends_with("_ADJUSTED");
    if params.wants_csv() {
        csv(fixtures::series_csv(adjusted))
    } else {
        Json(fixtures::series(symbol, &key, adjusted)).into_response()
    }
}
