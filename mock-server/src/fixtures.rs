//! Canned response bodies shaped like the real service's.

use serde_json::{json, Map, Value};

pub fn news_sentiment(tickers: &[&str]) -> Value {
    let ticker = tickers.first().copied().unwrap_or("AAPL");
    json!({
        "items": "2",
        "sentiment_score_definition": "x <= -0.35: Bearish; -0.35 < x <= -0.15: Somewhat-Bearish; -0.15 < x < 0.15: Neutral; 0.15 <= x < 0.35: Somewhat_Bullish; x >= 0.35: Bullish",
        "relevance_score_definition": "0 < x <= 1, with a higher score indicating higher relevance.",
        "feed": [
            {
                "title": format!("{ticker} beats quarterly estimates"),
                "url": "https://news.example.com/articles/1",
                "time_published": "20240115T133000",
                "authors": ["Jane Doe", "Sam Lee"],
                "summary": "Revenue rose on strong services growth.",
                "banner_image": "https://news.example.com/images/1.png",
                "source": "Example Wire",
                "category_within_source": "Markets",
                "source_domain": "news.example.com",
                "topics": [
                    {"topic": "Earnings", "relevance_score": "0.999999"},
                    {"topic": "Technology", "relevance_score": "0.5"}
                ],
                "overall_sentiment_score": 0.312458,
                "overall_sentiment_label": "Somewhat-Bullish",
                "ticker_sentiment": [
                    {
                        "ticker": ticker,
                        "relevance_score": "0.873812",
                        "ticker_sentiment_score": "0.401932",
                        "ticker_sentiment_label": "Bullish"
                    }
                ]
            },
            {
                "title": "Markets drift ahead of rate decision",
                "url": "https://news.example.com/articles/2",
                "time_published": "20240115T090000",
                "authors": [],
                "summary": "Indexes were little changed.",
                "banner_image": null,
                "source": "Example Wire",
                "category_within_source": "n/a",
                "source_domain": "news.example.com",
                "topics": [],
                "overall_sentiment_score": -0.05,
                "overall_sentiment_label": "Neutral",
                "ticker_sentiment": []
            }
        ]
    })
}

pub fn top_gainers_losers() -> Value {
    json!({
        "metadata": "Top gainers, losers, and most actively traded US tickers",
        "last_updated": "2024-01-12 16:15:59 US/Eastern",
        "top_gainers": [
            {"ticker": "ABCD", "price": "1.23", "change_amount": "0.61", "change_percentage": "98.3871%", "volume": "1234567"},
            {"ticker": "WXYZ", "price": "10.5", "change_amount": "4.2", "change_percentage": "66.6667%", "volume": "890"}
        ],
        "top_losers": [
            {"ticker": "LOSE", "price": "0.41", "change_amount": "-0.59", "change_percentage": "-59.0%", "volume": "45678"}
        ],
        "most_actively_traded": [
            {"ticker": "BUSY", "price": "3.01", "change_amount": "0.01", "change_percentage": "0.3333%", "volume": "987654321"}
        ]
    })
}

/// Includes one short row, one row without a name and a trailing blank line,
/// all of which occur in real downloads.
pub fn listing_csv(delisted: bool) -> String {
    if delisted {
        concat!(
            "symbol,name,exchange,assetType,ipoDate,delistingDate,status\r\n",
            "GONE,Gone Corp,NYSE,Stock,1999-11-18,2020-06-30,Delisted\r\n",
            "OLDX,,NASDAQ,ETF,2012-03-01,2019-01-02,Delisted\r\n",
        )
        .to_string()
    } else {
        concat!(
            "symbol,name,exchange,assetType,ipoDate,delistingDate,status\r\n",
            "A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active\r\n",
            "AAA,,NYSE ARCA,ETF,2020-09-09,null,Active\r\n",
            "BROKEN,Broken Row,NYSE\r\n",
            "IBM,International Business Machines Corp,NYSE,Stock,1962-01-02,null,Active\r\n",
            "\r\n",
        )
        .to_string()
    }
}

pub fn global_quote(symbol: &str) -> Value {
    json!({
        "Global Quote": {
            "01. symbol": symbol,
            "02. open": "185.0000",
            "03. high": "187.5000",
            "04. low": "184.2500",
            "05. price": "186.9000",
            "06. volume": "4567890",
            "07. latest trading day": "2024-01-12",
            "08. previous close": "185.5000",
            "09. change": "1.4000",
            "10. change percent": "0.7547%"
        }
    })
}

pub fn global_quote_csv(symbol: &str) -> String {
    format!(
        "symbol,open,high,low,price,volume,latestDay,previousClose,change,changePercent\r\n\
         {symbol},185.0000,187.5000,184.2500,186.9000,4567890,2024-01-12,185.5000,1.4000,0.7547%\r\n"
    )
}

/// Object key the service uses for a function's series, `None` when the
/// intraday interval is missing or unknown.
pub fn series_key(function: &str, interval: &str) -> Option<String> {
    let key = match function {
        "TIME_SERIES_INTRADAY" => match interval {
            "1min" | "5min" | "15min" | "30min" | "60min" => format!("Time Series ({interval})"),
            _ => return None,
        },
        "TIME_SERIES_DAILY" | "TIME_SERIES_DAILY_ADJUSTED" => "Time Series (Daily)".to_string(),
        "TIME_SERIES_WEEKLY" => "Weekly Time Series".to_string(),
        "TIME_SERIES_WEEKLY_ADJUSTED" => "Weekly Adjusted Time Series".to_string(),
        "TIME_SERIES_MONTHLY" => "Monthly Time Series".to_string(),
        "TIME_SERIES_MONTHLY_ADJUSTED" => "Monthly Adjusted Time Series".to_string(),
        _ => return None,
    };
    Some(key)
}

const BARS: [(&str, &str, &str, &str, &str, &str); 2] = [
    ("2024-01-12", "185.0000", "187.5000", "184.2500", "186.9000", "4567890"),
    ("2024-01-11", "183.1000", "185.6000", "182.9000", "185.5000", "3456789"),
];

fn bar(fields: &(&str, &str, &str, &str, &str, &str), adjusted: bool) -> Value {
    let (_, open, high, low, close, volume) = *fields;
    let mut bar = Map::new();
    bar.insert("1. open".into(), json!(open));
    bar.insert("2. high".into(), json!(high));
    bar.insert("3. low".into(), json!(low));
    bar.insert("4. close".into(), json!(close));
    if adjusted {
        bar.insert("5. adjusted close".into(), json!(close));
        bar.insert("6. volume".into(), json!(volume));
        bar.insert("7. dividend amount".into(), json!("0.0000"));
        bar.insert("8. split coefficient".into(), json!("1.0"));
    } else {
        bar.insert("5. volume".into(), json!(volume));
    }
    Value::Object(bar)
}

pub fn series(symbol: &str, key: &str, adjusted: bool) -> Value {
    let bars: Map<String, Value> = BARS
        .iter()
        .map(|fields| (fields.0.to_string(), bar(fields, adjusted)))
        .collect();
    json!({
        "Meta Data": {
            "1. Information": "Prices and Volumes",
            "2. Symbol": symbol,
            "3. Last Refreshed": "2024-01-12",
            "4. Output Size": "Compact",
            "5. Time Zone": "US/Eastern"
        },
        key: bars
    })
}

pub fn series_csv(adjusted: bool) -> String {
    let mut out = if adjusted {
        String::from("timestamp,open,high,low,close,adjusted_close,volume,dividend_amount,split_coefficient\r\n")
    } else {
        String::from("timestamp,open,high,low,close,volume\r\n")
    };
    for (timestamp, open, high, low, close, volume) in BARS {
        if adjusted {
            out.push_str(&format!(
                "{timestamp},{open},{high},{low},{close},{close},{volume},0.0000,1.0\r\n"
            ));
        } else {
            out.push_str(&format!("{timestamp},{open},{high},{low},{close},{volume}\r\n"));
        }
    }
    out
}
