//! Alpha Intelligence: news sentiment and market movers.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::choice::choice_enum;
use crate::error::InvalidInput;
use crate::query::{QueryParams, QueryWriter};

/// Largest `limit` the news endpoint accepts.
pub const MAX_NEWS_LIMIT: u32 = 1000;

choice_enum! {
    /// News topic filter.
    pub enum Topic: "topics" {
        Blockchain => "blockchain",
        Earnings => "earnings",
        Ipo => "ipo",
        MergersAndAcquisitions => "mergers_and_acquisitions",
        FinancialMarkets => "financial_markets",
        EconomyFiscal => "economy_fiscal",
        EconomyMonetary => "economy_monetary",
        EconomyMacro => "economy_macro",
        EnergyTransportation => "energy_transportation",
        Finance => "finance",
        LifeSciences => "life_sciences",
        Manufacturing => "manufacturing",
        RealEstate => "real_estate",
        RetailWholesale => "retail_wholesale",
        Technology => "technology",
    }
}

choice_enum! {
    /// Ordering of the news feed.
    pub enum Sort: "sort" {
        Latest => "latest",
        Earliest => "earliest",
        Relevance => "relevance",
    }
}

/// Options for `NEWS_SENTIMENT`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSentimentOptions {
    pub tickers: Vec<String>,
    pub topics: Vec<Topic>,
    /// `YYYYMMDDTHHMM`, optionally with seconds.
    pub time_from: String,
    pub time_to: String,
    #[serde(default, deserialize_with = "crate::choice::deserialize_optional")]
    pub sort: Option<Sort>,
    pub limit: Option<u32>,
}

impl NewsSentimentOptions {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let from = parse_news_time("time_from", &self.time_from)?;
        let to = parse_news_time("time_to", &self.time_to)?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(InvalidInput::new("time_from", "must not be after time_to"));
            }
        }
        if let Some(limit) = self.limit {
            if limit > MAX_NEWS_LIMIT {
                return Err(InvalidInput::new(
                    "limit",
                    format!("must be at most {MAX_NEWS_LIMIT}, got {limit}"),
                ));
            }
        }
        Ok(())
    }
}

fn parse_news_time(
    field: &'static str,
    value: &str,
) -> Result<Option<NaiveDateTime>, InvalidInput> {
    if value.is_empty() {
        return Ok(None);
    }
    ["%Y%m%dT%H%M%S", "%Y%m%dT%H%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(Some)
        .ok_or_else(|| InvalidInput::new(field, format!("expected YYYYMMDDTHHMM, got {value:?}")))
}

impl QueryParams for NewsSentimentOptions {
    fn write_query(&self, query: &mut QueryWriter) {
        query
            .list("tickers", &self.tickers)
            .choices("topics", &self.topics)
            .text("time_from", &self.time_from)
            .text("time_to", &self.time_to)
            .choice("sort", self.sort)
            .number("limit", self.limit);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerSentiment {
    #[serde(default)]
    pub ticker: String,
    pub relevance_score: Option<String>,
    pub ticker_sentiment_score: Option<String>,
    pub ticker_sentiment_label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRelevance {
    #[serde(default)]
    pub topic: String,
    pub relevance_score: Option<String>,
}

/// One article in the news feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsFeed {
    pub title: String,
    pub url: String,
    pub time_published: String,
    pub authors: Vec<String>,
    pub summary: String,
    pub banner_image: Option<String>,
    pub source: String,
    pub category_within_source: Option<String>,
    pub source_domain: Option<String>,
    pub topics: Vec<TopicRelevance>,
    pub overall_sentiment_score: Option<Decimal>,
    pub overall_sentiment_label: Option<String>,
    pub ticker_sentiment: Vec<TickerSentiment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsSentimentResponse {
    pub items: Option<String>,
    pub sentiment_score_definition: Option<String>,
    pub relevance_score_definition: Option<String>,
    pub feed: Vec<NewsFeed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedStock {
    #[serde(default)]
    pub ticker: String,
    pub price: Option<String>,
    pub change_amount: Option<String>,
    pub change_percentage: Option<String>,
    pub volume: Option<String>,
}

/// `TOP_GAINERS_LOSERS` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingResponse {
    pub metadata: Option<String>,
    pub last_updated: Option<String>,
    pub top_gainers: Vec<RankedStock>,
    pub top_losers: Vec<RankedStock>,
    pub most_actively_traded: Vec<RankedStock>,
}
