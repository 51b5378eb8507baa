//! Core stock APIs: time series and global quote.
//!
//! A single options shape covers every `TIME_SERIES_*` function plus
//! `GLOBAL_QUOTE`; the `function` field selects which one is called. JSON and
//! CSV responses are both normalized into `TimeSeriesResponse`, with CSV rows
//! keyed by their `timestamp` column.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::choice::choice_enum;
use crate::decode::ResponseFormat;
use crate::error::InvalidInput;
use crate::query::{QueryParams, QueryWriter};
use crate::records::{FromRecord, Record};

choice_enum! {
    /// Remote function selecting the price series.
    pub enum Function: "function" {
        TimeSeriesIntraday => "TIME_SERIES_INTRADAY",
        TimeSeriesDaily => "TIME_SERIES_DAILY",
        TimeSeriesDailyAdjusted => "TIME_SERIES_DAILY_ADJUSTED",
        TimeSeriesWeekly => "TIME_SERIES_WEEKLY",
        TimeSeriesWeeklyAdjusted => "TIME_SERIES_WEEKLY_ADJUSTED",
        TimeSeriesMonthly => "TIME_SERIES_MONTHLY",
        TimeSeriesMonthlyAdjusted => "TIME_SERIES_MONTHLY_ADJUSTED",
        GlobalQuote => "GLOBAL_QUOTE",
    }
}

choice_enum! {
    pub enum Interval: "interval" {
        OneMin => "1min",
        FiveMin => "5min",
        FifteenMin => "15min",
        ThirtyMin => "30min",
        SixtyMin => "60min",
    }
}

choice_enum! {
    pub enum DataType: "datatype" {
        Json => "json",
        Csv => "csv",
    }
}

choice_enum! {
    pub enum OutputSize: "outputsize" {
        Compact => "compact",
        Full => "full",
    }
}

impl From<DataType> for ResponseFormat {
    fn from(datatype: DataType) -> Self {
        match datatype {
            DataType::Json => ResponseFormat::Json,
            DataType::Csv => ResponseFormat::Csv,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesOptions {
    pub function: Function,
    pub symbol: String,
    /// Required for `TIME_SERIES_INTRADAY`.
    #[serde(default, deserialize_with = "crate::choice::deserialize_optional")]
    pub interval: Option<Interval>,
    #[serde(default, deserialize_with = "crate::choice::deserialize_optional")]
    pub datatype: Option<DataType>,
    #[serde(default)]
    pub adjusted: Option<bool>,
    #[serde(default)]
    pub extended_hours: Option<bool>,
    /// `YYYY-MM`, intraday history for a single month.
    #[serde(default)]
    pub month: String,
    #[serde(default, deserialize_with = "crate::choice::deserialize_optional")]
    pub outputsize: Option<OutputSize>,
}

impl TimeSeriesOptions {
    pub fn new(function: Function, symbol: impl Into<String>) -> Self {
        Self {
            function,
            symbol: symbol.into(),
            interval: None,
            datatype: None,
            adjusted: None,
            extended_hours: None,
            month: String::new(),
            outputsize: None,
        }
    }

    pub fn intraday(symbol: impl Into<String>, interval: Interval) -> Self {
        Self {
            interval: Some(interval),
            ..Self::new(Function::TimeSeriesIntraday, symbol)
        }
    }

    pub fn response_format(&self) -> ResponseFormat {
        self.datatype.map(ResponseFormat::from).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.symbol.trim().is_empty() {
            return Err(InvalidInput::new("symbol", "is required"));
        }
        if self.function == Function::TimeSeriesIntraday && self.interval.is_none() {
            return Err(InvalidInput::new(
                "interval",
                "is required for TIME_SERIES_INTRADAY",
            ));
        }
        if !self.month.is_empty() {
            if self.function != Function::TimeSeriesIntraday {
                return Err(InvalidInput::new(
                    "month",
                    "is only supported by TIME_SERIES_INTRADAY",
                ));
            }
            if !is_year_month(&self.month) {
                return Err(InvalidInput::new(
                    "month",
                    format!("expected YYYY-MM, got {:?}", self.month),
                ));
            }
        }
        Ok(())
    }
}

fn is_year_month(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes.iter().enumerate().all(|(i, b)| i == 4 || b.is_ascii_digit())
        && matches!(value[5..].parse::<u8>(), Ok(1..=12))
}

impl QueryParams for TimeSeriesOptions {
    // `function` is written by the client ahead of these.
    fn write_query(&self, query: &mut QueryWriter) {
        query
            .text("symbol", &self.symbol)
            .choice("interval", self.interval)
            .choice("datatype", self.datatype)
            .flag("adjusted", self.adjusted)
            .flag("extended_hours", self.extended_hours)
            .text("month", &self.month)
            .choice("outputsize", self.outputsize);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    #[serde(rename = "1. Information")]
    pub information: Option<String>,
    #[serde(rename = "2. Symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "3. Last Refreshed")]
    pub last_refreshed: Option<String>,
    #[serde(rename = "4. Interval")]
    pub interval: Option<String>,
    #[serde(rename = "5. Output Size", alias = "4. Output Size")]
    pub output_size: Option<String>,
    #[serde(rename = "6. Time Zone", alias = "5. Time Zone", alias = "4. Time Zone")]
    pub time_zone: Option<String>,
}

/// One OHLCV point. Adjusted series carry the extra fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bar {
    #[serde(rename = "1. open")]
    pub open: Option<String>,
    #[serde(rename = "2. high")]
    pub high: Option<String>,
    #[serde(rename = "3. low")]
    pub low: Option<String>,
    #[serde(rename = "4. close")]
    pub close: Option<String>,
    #[serde(rename = "5. volume")]
    pub volume: Option<String>,
    #[serde(rename = "5. adjusted close")]
    pub adjusted_close: Option<String>,
    #[serde(rename = "6. volume")]
    pub adjusted_volume: Option<String>,
    #[serde(rename = "7. dividend amount")]
    pub dividend_amount: Option<String>,
    #[serde(rename = "8. split coefficient")]
    pub split_coefficient: Option<String>,
}

impl FromRecord for Bar {
    fn from_record(record: &Record) -> Self {
        // Adjusted JSON series number their volume "6."; CSV rows use the same slot.
        let (volume, adjusted_volume) = if record.get("adjusted_close").is_some() {
            (None, record.optional("volume"))
        } else {
            (record.optional("volume"), None)
        };
        Self {
            open: record.optional("open"),
            high: record.optional("high"),
            low: record.optional("low"),
            close: record.optional("close"),
            adjusted_close: record.optional("adjusted_close"),
            dividend_amount: record.optional("dividend_amount"),
            split_coefficient: record.optional("split_coefficient"),
            volume,
            adjusted_volume,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalQuote {
    #[serde(rename = "01. symbol")]
    pub symbol: Option<String>,
    #[serde(rename = "02. open")]
    pub open: Option<String>,
    #[serde(rename = "03. high")]
    pub high: Option<String>,
    #[serde(rename = "04. low")]
    pub low: Option<String>,
    #[serde(rename = "05. price")]
    pub price: Option<String>,
    #[serde(rename = "06. volume")]
    pub volume: Option<String>,
    #[serde(rename = "07. latest trading day")]
    pub latest_trading_day: Option<String>,
    #[serde(rename = "08. previous close")]
    pub previous_close: Option<String>,
    #[serde(rename = "09. change")]
    pub change: Option<String>,
    #[serde(rename = "10. change percent")]
    pub change_percent: Option<String>,
}

impl FromRecord for GlobalQuote {
    fn from_record(record: &Record) -> Self {
        Self {
            symbol: record.optional("symbol"),
            open: record.optional("open"),
            high: record.optional("high"),
            low: record.optional("low"),
            price: record.optional("price"),
            volume: record.optional("volume"),
            latest_trading_day: record.optional("latestDay"),
            previous_close: record.optional("previousClose"),
            change: record.optional("change"),
            change_percent: record.optional("changePercent"),
        }
    }
}

pub type Series = BTreeMap<String, Bar>;

/// Every series key the service may return; only the one matching the
/// requested function (and interval) is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesResponse {
    #[serde(rename = "Meta Data")]
    pub meta_data: Option<MetaData>,
    #[serde(rename = "Global Quote")]
    pub global_quote: Option<GlobalQuote>,
    #[serde(rename = "Time Series (1min)")]
    pub one_min: Option<Series>,
    #[serde(rename = "Time Series (5min)")]
    pub five_min: Option<Series>,
    #[serde(rename = "Time Series (15min)")]
    pub fifteen_min: Option<Series>,
    #[serde(rename = "Time Series (30min)")]
    pub thirty_min: Option<Series>,
    #[serde(rename = "Time Series (60min)")]
    pub sixty_min: Option<Series>,
    #[serde(rename = "Time Series (Daily)")]
    pub daily: Option<Series>,
    #[serde(rename = "Weekly Time Series")]
    pub weekly: Option<Series>,
    #[serde(rename = "Weekly Adjusted Time Series")]
    pub weekly_adjusted: Option<Series>,
    #[serde(rename = "Monthly Time Series")]
    pub monthly: Option<Series>,
    #[serde(rename = "Monthly Adjusted Time Series")]
    pub monthly_adjusted: Option<Series>,
}

impl TimeSeriesResponse {
    /// Build from CSV rows. Series rows are keyed by `timestamp`; a global
    /// quote takes the first row.
    pub fn from_records(
        function: Function,
        interval: Option<Interval>,
        records: &[Record],
    ) -> Self {
        let mut response = Self::default();
        if function == Function::GlobalQuote {
            response.global_quote = records.first().map(GlobalQuote::from_record);
            return response;
        }
        let series: Series = records
            .iter()
            .filter_map(|record| {
                record
                    .optional("timestamp")
                    .map(|timestamp| (timestamp, Bar::from_record(record)))
            })
            .collect();
        if let Some(slot) = response.slot_mut(function, interval) {
            *slot = Some(series);
        }
        response
    }

    fn slot_mut(
        &mut self,
        function: Function,
        interval: Option<Interval>,
    ) -> Option<&mut Option<Series>> {
        let slot = match function {
            Function::TimeSeriesIntraday => match interval? {
                Interval::OneMin => &mut self.one_min,
                Interval::FiveMin => &mut self.five_min,
                Interval::FifteenMin => &mut self.fifteen_min,
                Interval::ThirtyMin => &mut self.thirty_min,
                Interval::SixtyMin => &mut self.sixty_min,
            },
            Function::TimeSeriesDaily | Function::TimeSeriesDailyAdjusted => &mut self.daily,
            Function::TimeSeriesWeekly => &mut self.weekly,
            Function::TimeSeriesWeeklyAdjusted => &mut self.weekly_adjusted,
            Function::TimeSeriesMonthly => &mut self.monthly,
            Function::TimeSeriesMonthlyAdjusted => &mut self.monthly_adjusted,
            Function::GlobalQuote => return None,
        };
        Some(slot)
    }

    /// The populated series, if any.
    pub fn series(&self) -> Option<&Series> {
        [
            &self.one_min,
            &self.five_min,
            &self.fifteen_min,
            &self.thirty_min,
            &self.sixty_min,
            &self.daily,
            &self.weekly,
            &self.weekly_adjusted,
            &self.monthly,
            &self.monthly_adjusted,
        ]
        .into_iter()
        .find_map(Option::as_ref)
    }

    /// True when neither a series nor a quote was returned.
    pub fn is_empty(&self) -> bool {
        self.series().is_none() && self.global_quote.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::encode_query;
    use crate::records::parse_records;

    #[test]
    fn intraday_requires_interval() {
        let mut options = TimeSeriesOptions::new(Function::TimeSeriesIntraday, "IBM");
        assert_eq!(options.validate().unwrap_err().field, "interval");
        options.interval = Some("5min".parse().unwrap());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn symbol_is_required() {
        let options = TimeSeriesOptions::new(Function::TimeSeriesDaily, "  ");
        assert_eq!(options.validate().unwrap_err().field, "symbol");
    }

    #[test]
    fn month_must_be_year_month() {
        let mut options = TimeSeriesOptions::intraday("IBM", Interval::OneMin);
        options.month = "2009-01".into();
        assert!(options.validate().is_ok());
        for bad in ["2009-13", "2009-1", "200901", "abcd-01"] {
            options.month = bad.into();
            assert_eq!(options.validate().unwrap_err().field, "month", "{bad}");
        }
    }

    #[test]
    fn month_is_intraday_only() {
        let options = TimeSeriesOptions {
            month: "2009-01".into(),
            ..TimeSeriesOptions::new(Function::TimeSeriesDaily, "IBM")
        };
        assert_eq!(options.validate().unwrap_err().field, "month");
    }

    #[test]
    fn function_parses_upper_or_lower_case() {
        assert_eq!(
            "time_series_daily_adjusted".parse::<Function>().unwrap(),
            Function::TimeSeriesDailyAdjusted
        );
        assert!("TIME_SERIES_HOURLY".parse::<Function>().is_err());
        assert_eq!("CSV".parse::<DataType>().unwrap(), DataType::Csv);
        assert!("xml".parse::<DataType>().is_err());
        assert!("2min".parse::<Interval>().is_err());
        assert_eq!("FULL".parse::<OutputSize>().unwrap(), OutputSize::Full);
    }

    #[test]
    fn blank_choices_mean_server_default() {
        let options: TimeSeriesOptions = serde_json::from_str(
            r#"{"function": "TIME_SERIES_DAILY", "symbol": "IBM", "datatype": "", "outputsize": "", "interval": ""}"#,
        )
        .unwrap();
        assert_eq!(options.datatype, None);
        assert_eq!(options.outputsize, None);
        assert_eq!(options.interval, None);
        assert_eq!(options.response_format(), ResponseFormat::Json);
        assert!(serde_json::from_str::<TimeSeriesOptions>(
            r#"{"function": "TIME_SERIES_DAILY", "symbol": "IBM", "datatype": "xml"}"#
        )
        .is_err());
    }

    #[test]
    fn query_omits_unset_fields() {
        let mut options = TimeSeriesOptions::intraday("IBM", Interval::FiveMin);
        assert_eq!(encode_query(Some(&options)), "symbol=IBM&interval=5min");
        options.datatype = Some(DataType::Csv);
        options.extended_hours = Some(false);
        options.outputsize = Some(OutputSize::Full);
        assert_eq!(
            encode_query(Some(&options)),
            "symbol=IBM&interval=5min&datatype=csv&extended_hours=false&outputsize=full"
        );
    }

    #[test]
    fn response_format_follows_datatype() {
        let mut options = TimeSeriesOptions::new(Function::TimeSeriesDaily, "IBM");
        assert_eq!(options.response_format(), ResponseFormat::Json);
        options.datatype = Some(DataType::Csv);
        assert_eq!(options.response_format(), ResponseFormat::Csv);
    }

    #[test]
    fn json_daily_series_decodes() {
        let body = r#"{
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "IBM",
                "3. Last Refreshed": "2024-01-05",
                "4. Output Size": "Compact",
                "5. Time Zone": "US/Eastern"
            },
            "Time Series (Daily)": {
                "2024-01-05": {"1. open": "162.44", "2. high": "162.53", "3. low": "160.95",
                               "4. close": "161.70", "5. volume": "3026218"}
            }
        }"#;
        let response: TimeSeriesResponse = serde_json::from_str(body).unwrap();
        let meta = response.meta_data.as_ref().unwrap();
        assert_eq!(meta.output_size.as_deref(), Some("Compact"));
        assert_eq!(meta.time_zone.as_deref(), Some("US/Eastern"));
        let bar = &response.series().unwrap()["2024-01-05"];
        assert_eq!(bar.close.as_deref(), Some("161.70"));
        assert_eq!(bar.adjusted_close, None);
        assert!(!response.is_empty());
    }

    #[test]
    fn csv_rows_fill_the_requested_slot() {
        let records = parse_records(
            b"timestamp,open,high,low,close,volume\n\
              2024-01-05 19:55:00,161.70,161.75,161.70,161.75,120\n\
              2024-01-05 19:50:00,161.60,161.70,161.60,161.70,340\n",
        )
        .unwrap();
        let response = TimeSeriesResponse::from_records(
            Function::TimeSeriesIntraday,
            Some(Interval::FiveMin),
            &records,
        );
        let series = response.five_min.as_ref().unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series["2024-01-05 19:50:00"].volume.as_deref(), Some("340"));
        assert!(response.one_min.is_none());
    }

    #[test]
    fn adjusted_csv_uses_adjusted_columns() {
        let records = parse_records(
            b"timestamp,open,high,low,close,adjusted_close,volume,dividend_amount\n\
              2023-12-29,162.00,163.00,161.00,163.55,160.10,9000,1.66\n",
        )
        .unwrap();
        let response =
            TimeSeriesResponse::from_records(Function::TimeSeriesMonthlyAdjusted, None, &records);
        let bar = &response.monthly_adjusted.as_ref().unwrap()["2023-12-29"];
        assert_eq!(bar.adjusted_close.as_deref(), Some("160.10"));
        assert_eq!(bar.adjusted_volume.as_deref(), Some("9000"));
        assert_eq!(bar.volume, None);
        assert_eq!(bar.dividend_amount.as_deref(), Some("1.66"));
    }

    #[test]
    fn global_quote_csv_takes_first_row() {
        let records = parse_records(
            b"symbol,open,high,low,price,volume,latestDay,previousClose,change,changePercent\n\
              IBM,162.44,162.53,160.95,161.70,3026218,2024-01-05,162.00,-0.30,-0.1852%\n",
        )
        .unwrap();
        let response = TimeSeriesResponse::from_records(Function::GlobalQuote, None, &records);
        let quote = response.global_quote.unwrap();
        assert_eq!(quote.latest_trading_day.as_deref(), Some("2024-01-05"));
        assert_eq!(quote.change_percent.as_deref(), Some("-0.1852%"));
    }

    #[test]
    fn empty_response_is_detected() {
        assert!(TimeSeriesResponse::default().is_empty());
    }
}
