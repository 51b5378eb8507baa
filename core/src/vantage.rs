//! Async operations: validate, build, send, decode.
//!
//! # Design
//! `Vantage` pairs a `VantageClient` with a `Transport`. Each operation runs
//! the client's `build_*` (validation happens there, so invalid options never
//! reach the transport), sends the request while watching the caller's
//! `CancellationToken`, and hands the response to the matching `parse_*`.
//! Failures are wrapped in `Error` with the operation's description. Nothing
//! is retried.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::client::VantageClient;
use crate::config::ClientConfig;
use crate::error::{ApiError, Error};
use crate::http::{HttpRequest, HttpResponse};
use crate::intelligence::{NewsSentimentOptions, NewsSentimentResponse, RankingResponse};
use crate::listing::{Listing, ListingStatusOptions};
use crate::time_series::{DataType, GlobalQuote, TimeSeriesOptions, TimeSeriesResponse};
use crate::transport::{HttpTransport, Transport};

/// Async client for the query endpoint.
///
/// Cloning is cheap and clones share the transport, so one instance can
/// serve many concurrent calls.
pub struct Vantage<T = HttpTransport> {
    client: VantageClient,
    transport: Arc<T>,
}

impl<T> Clone for Vantage<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T> std::fmt::Debug for Vantage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vantage")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Vantage<HttpTransport> {
    /// Build a client backed by `reqwest` using `config.timeout`.
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, HttpTransport::new(config.timeout)?))
    }
}

impl<T: Transport> Vantage<T> {
    pub fn with_transport(config: &ClientConfig, transport: T) -> Self {
        Self {
            client: VantageClient::from_config(config),
            transport: Arc::new(transport),
        }
    }

    pub fn client(&self) -> &VantageClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn send(
        &self,
        request: HttpRequest,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, ApiError> {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("request cancelled in flight");
                return Err(ApiError::Cancelled);
            }
            response = self.transport.execute(request) => response?,
        };
        tracing::debug!(
            status = response.status,
            content_type = response.content_type().unwrap_or_default(),
            bytes = response.body.len(),
            "received response"
        );
        Ok(response)
    }

    async fn call<R>(
        &self,
        operation: &'static str,
        request: Result<HttpRequest, ApiError>,
        cancel: &CancellationToken,
        parse: impl FnOnce(HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, Error> {
        let result = async {
            let response = self.send(request?, cancel).await?;
            parse(response)
        }
        .await;
        result.map_err(|err| {
            match &err {
                ApiError::Logical { message } => {
                    tracing::warn!(detail = %message, "service reported an error")
                }
                ApiError::InvalidInput(invalid) => {
                    tracing::debug!(%invalid, "rejected before sending")
                }
                other => tracing::debug!(error = %other, "call failed"),
            }
            Error::new(operation, err)
        })
    }

    #[tracing::instrument(name = "news_sentiment", skip_all)]
    pub async fn news_sentiment(
        &self,
        options: &NewsSentimentOptions,
        cancel: &CancellationToken,
    ) -> Result<NewsSentimentResponse, Error> {
        self.call(
            "get news sentiment",
            self.client.build_news_sentiment(options),
            cancel,
            |response| self.client.parse_news_sentiment(response),
        )
        .await
    }

    #[tracing::instrument(name = "top_gainers_losers", skip_all)]
    pub async fn top_gainers_losers(
        &self,
        cancel: &CancellationToken,
    ) -> Result<RankingResponse, Error> {
        self.call(
            "get top gainers/losers",
            Ok(self.client.build_top_gainers_losers()),
            cancel,
            |response| self.client.parse_top_gainers_losers(response),
        )
        .await
    }

    #[tracing::instrument(
        name = "time_series",
        skip_all,
        fields(function = %options.function, symbol = %options.symbol)
    )]
    pub async fn time_series(
        &self,
        options: &TimeSeriesOptions,
        cancel: &CancellationToken,
    ) -> Result<TimeSeriesResponse, Error> {
        self.call(
            "get time series stock data",
            self.client.build_time_series(options),
            cancel,
            |response| self.client.parse_time_series(options, response),
        )
        .await
    }

    /// `None` lists the latest active tickers.
    #[tracing::instrument(name = "listing_status", skip_all)]
    pub async fn listing_status(
        &self,
        options: Option<&ListingStatusOptions>,
        cancel: &CancellationToken,
    ) -> Result<Vec<Listing>, Error> {
        self.call(
            "get listing status",
            self.client.build_listing_status(options),
            cancel,
            |response| self.client.parse_listing_status(response),
        )
        .await
    }

    #[tracing::instrument(name = "global_quote", skip_all, fields(symbol = %symbol))]
    pub async fn global_quote(
        &self,
        symbol: &str,
        datatype: Option<DataType>,
        cancel: &CancellationToken,
    ) -> Result<GlobalQuote, Error> {
        self.call(
            "get global quote",
            self.client.build_global_quote(symbol, datatype),
            cancel,
            |response| self.client.parse_global_quote(datatype, response),
        )
        .await
    }
}
