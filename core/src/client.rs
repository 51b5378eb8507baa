//! Stateless HTTP request builder and response parser for the query endpoint.
//!
//! # Design
//! `VantageClient` holds only the base URL and the API key and carries no
//! mutable state between calls. Each remote function is split into a
//! `build_*` method that validates options and produces an `HttpRequest`, and
//! a `parse_*` method that consumes an `HttpResponse`. The caller (or
//! `Vantage`) executes the actual HTTP round-trip, keeping this layer
//! deterministic and free of I/O.

use std::fmt;

use crate::choice::Choice;
use crate::config::ClientConfig;
use crate::decode::{decode_json_response, decode_response, ResponseFormat};
use crate::error::ApiError;
use crate::http::{json_headers, HttpRequest, HttpResponse};
use crate::intelligence::{NewsSentimentOptions, NewsSentimentResponse, RankingResponse};
use crate::listing::{Listing, ListingStatusOptions};
use crate::query::{QueryParams, QueryWriter};
use crate::records::project;
use crate::time_series::{DataType, Function, GlobalQuote, TimeSeriesOptions, TimeSeriesResponse};

pub const NEWS_SENTIMENT: &str = "NEWS_SENTIMENT";
pub const TOP_GAINERS_LOSERS: &str = "TOP_GAINERS_LOSERS";
pub const LISTING_STATUS: &str = "LISTING_STATUS";

/// Synchronous, stateless client for the query endpoint.
///
/// Safe to share across threads; every method takes `&self`.
#[derive(Clone)]
pub struct VantageClient {
    base_url: String,
    api_key: String,
}

impl VantageClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches(['?', '&']).to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url, config.api_key())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `function` first, then the options, then `apikey` last.
    fn build(&self, function: &str, options: Option<&dyn QueryParams>) -> HttpRequest {
        let mut query = QueryWriter::new();
        query.text("function", function);
        if let Some(options) = options {
            options.write_query(&mut query);
        }
        query.text("apikey", &self.api_key);
        HttpRequest {
            url: format!("{}?{}", self.base_url, query.finish()),
            headers: json_headers(),
        }
    }

    pub fn build_news_sentiment(
        &self,
        options: &NewsSentimentOptions,
    ) -> Result<HttpRequest, ApiError> {
        options.validate()?;
        Ok(self.build(NEWS_SENTIMENT, Some(options)))
    }

    pub fn build_top_gainers_losers(&self) -> HttpRequest {
        self.build(TOP_GAINERS_LOSERS, None)
    }

    pub fn build_time_series(&self, options: &TimeSeriesOptions) -> Result<HttpRequest, ApiError> {
        options.validate()?;
        Ok(self.build(options.function.as_str(), Some(options)))
    }

    /// `None` requests the latest active listings.
    pub fn build_listing_status(
        &self,
        options: Option<&ListingStatusOptions>,
    ) -> Result<HttpRequest, ApiError> {
        if let Some(options) = options {
            options.validate()?;
        }
        Ok(self.build(LISTING_STATUS, options.map(|o| o as &dyn QueryParams)))
    }

    pub fn build_global_quote(
        &self,
        symbol: &str,
        datatype: Option<DataType>,
    ) -> Result<HttpRequest, ApiError> {
        self.build_time_series(&global_quote_options(symbol, datatype))
    }

    pub fn parse_news_sentiment(
        &self,
        response: HttpResponse,
    ) -> Result<NewsSentimentResponse, ApiError> {
        decode_json_response(response)
    }

    pub fn parse_top_gainers_losers(
        &self,
        response: HttpResponse,
    ) -> Result<RankingResponse, ApiError> {
        decode_json_response(response)
    }

    /// Parse a time series (or global quote) in the format `options` asked for.
    ///
    /// A body that decodes but carries neither a series nor a quote is a
    /// `Decode` error rather than an empty success.
    pub fn parse_time_series(
        &self,
        options: &TimeSeriesOptions,
        response: HttpResponse,
    ) -> Result<TimeSeriesResponse, ApiError> {
        let parsed = decode_response(response, options.response_format(), |records| {
            TimeSeriesResponse::from_records(options.function, options.interval, &records)
        })?;
        if parsed.is_empty() {
            return Err(ApiError::Decode(format!(
                "no {} data in response",
                options.function
            )));
        }
        Ok(parsed)
    }

    pub fn parse_listing_status(&self, response: HttpResponse) -> Result<Vec<Listing>, ApiError> {
        decode_response(response, ResponseFormat::Csv, |records| project(&records))
    }

    pub fn parse_global_quote(
        &self,
        datatype: Option<DataType>,
        response: HttpResponse,
    ) -> Result<GlobalQuote, ApiError> {
        let options = global_quote_options("", datatype);
        self.parse_time_series(&options, response)?
            .global_quote
            .ok_or_else(|| ApiError::Decode("no Global Quote in response".to_string()))
    }
}

fn global_quote_options(symbol: &str, datatype: Option<DataType>) -> TimeSeriesOptions {
    TimeSeriesOptions {
        datatype,
        ..TimeSeriesOptions::new(Function::GlobalQuote, symbol)
    }
}

impl fmt::Debug for VantageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VantageClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
