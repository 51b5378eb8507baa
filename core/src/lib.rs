//! Async client core for the Alpha Vantage query API.
//!
//! # Overview
//! Builds authenticated `GET` requests for a fixed set of remote functions
//! (news sentiment, market movers, time series, listing status), decodes
//! JSON or CSV responses into typed records, and keeps logical API errors
//! apart from transport failures.
//!
//! # Design
//! - `VantageClient` is stateless and I/O-free: `build_*` validates options
//!   and produces an `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Vantage` executes the round-trip through a `Transport`, honouring a
//!   caller-supplied `CancellationToken`.
//! - Options shapes declare their query parameters explicitly through
//!   `QueryParams`; enumerated parameters are closed enums.
//! - Every body is checked for an embedded error object before it is decoded
//!   into the caller's type.

pub mod choice;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod http;
pub mod intelligence;
pub mod listing;
pub mod query;
pub mod records;
pub mod time_series;
pub mod transport;
pub mod vantage;

pub use choice::{deserialize_optional, parse_optional, Choice};
pub use client::VantageClient;
pub use config::{ClientConfig, ConfigError};
pub use decode::ResponseFormat;
pub use error::{ApiError, Error, ErrorKind, InvalidInput};
pub use http::{HttpRequest, HttpResponse};
pub use intelligence::{
    NewsFeed, NewsSentimentOptions, NewsSentimentResponse, RankedStock, RankingResponse, Sort,
    TickerSentiment, Topic, TopicRelevance,
};
pub use listing::{Listing, ListingState, ListingStatusOptions};
pub use query::{encode_query, QueryParams, QueryWriter};
pub use records::{parse_records, FromRecord, Record};
pub use time_series::{
    Bar, DataType, Function, GlobalQuote, Interval, MetaData, OutputSize, TimeSeriesOptions,
    TimeSeriesResponse,
};
pub use tokio_util::sync::CancellationToken;
pub use transport::{HttpTransport, Transport};
pub use vantage::Vantage;
