//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, the expected query string, simulated
//! responses, and either the expected parse result or the expected error
//! kind. Cases expecting `invalid_input` stop at the build step. Results are
//! compared as typed values, so field order in the fixture does not matter.

use serde::de::DeserializeOwned;
use serde_json::Value;
use vantage_core::{
    ApiError, ErrorKind, HttpRequest, HttpResponse, Listing, ListingStatusOptions,
    NewsSentimentOptions, NewsSentimentResponse, TimeSeriesOptions, TimeSeriesResponse,
    VantageClient,
};

const BASE_URL: &str = "http://localhost:3000/query";
const API_KEY: &str = "demo";

fn client() -> VantageClient {
    VantageClient::new(BASE_URL, API_KEY)
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn from_case<T: DeserializeOwned>(value: &Value) -> T {
    serde_json::from_value(value.clone()).unwrap()
}

fn check_request(name: &str, req: &HttpRequest, case: &Value) {
    let query = case["expected_request"]["query"].as_str().unwrap();
    assert_eq!(req.url, format!("{BASE_URL}?{query}"), "{name}: url");
    assert!(
        req.headers.iter().any(|(k, _)| k == "Accept"),
        "{name}: Accept header"
    );
}

/// Check the built request, or the rejection when the case expects invalid
/// input. Returns whether the case goes on to the parse step.
fn check_build(name: &str, case: &Value, built: Result<HttpRequest, ApiError>) -> bool {
    match (built, expected_kind(case)) {
        (Err(err), Some(ErrorKind::InvalidInput)) => {
            assert!(matches!(err, ApiError::InvalidInput(_)), "{name}: {err}");
            false
        }
        (Err(err), _) => panic!("{name}: unexpected build error: {err}"),
        (Ok(_), Some(ErrorKind::InvalidInput)) => panic!("{name}: build should be rejected"),
        (Ok(req), _) => {
            check_request(name, &req, case);
            true
        }
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse::new(
        sim["status"].as_u64().unwrap() as u16,
        sim["body"].as_str().unwrap(),
    )
    .with_header("Content-Type", sim["content_type"].as_str().unwrap())
}

fn expected_kind(case: &Value) -> Option<ErrorKind> {
    case["expected_error"].as_str().map(|kind| match kind {
        "invalid_input" => ErrorKind::InvalidInput,
        "transport" => ErrorKind::Transport,
        "logical" => ErrorKind::Logical,
        "decode" => ErrorKind::Decode,
        other => panic!("unknown error kind: {other}"),
    })
}

fn check_outcome<T>(name: &str, case: &Value, outcome: Result<T, ApiError>)
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug,
{
    match expected_kind(case) {
        Some(kind) => {
            let err = outcome.expect_err(name);
            assert_eq!(err.kind(), kind, "{name}: {err}");
        }
        None => {
            let expected: T = from_case(&case["expected_result"]);
            assert_eq!(outcome.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// News sentiment
// ---------------------------------------------------------------------------

#[test]
fn news_sentiment_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/news_sentiment.json")) {
        let name = case["name"].as_str().unwrap();
        let input: NewsSentimentOptions = from_case(&case["input"]);

        if !check_build(name, &case, c.build_news_sentiment(&input)) {
            continue;
        }

        let outcome = c.parse_news_sentiment(simulated(&case));
        check_outcome::<NewsSentimentResponse>(name, &case, outcome);
    }
}

// ---------------------------------------------------------------------------
// Listing status
// ---------------------------------------------------------------------------

#[test]
fn listing_status_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/listing_status.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Option<ListingStatusOptions> = from_case(&case["input"]);

        if !check_build(name, &case, c.build_listing_status(input.as_ref())) {
            continue;
        }

        let outcome = c.parse_listing_status(simulated(&case));
        check_outcome::<Vec<Listing>>(name, &case, outcome);
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

#[test]
fn time_series_test_vectors() {
    let c = client();
    for case in cases(include_str!("../../test-vectors/time_series.json")) {
        let name = case["name"].as_str().unwrap();
        let input: TimeSeriesOptions = from_case(&case["input"]);

        if !check_build(name, &case, c.build_time_series(&input)) {
            continue;
        }

        let outcome = c.parse_time_series(&input, simulated(&case));
        check_outcome::<TimeSeriesResponse>(name, &case, outcome);
    }
}
