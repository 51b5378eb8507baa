//! `LISTING_STATUS`: active or delisted tickers, served as CSV only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::choice::choice_enum;
use crate::error::InvalidInput;
use crate::query::{QueryParams, QueryWriter};
use crate::records::{FromRecord, Record};

/// Listing history starts on this date.
pub const MIN_LISTING_DATE: &str = "2010-01-01";

choice_enum! {
    pub enum ListingState: "state" {
        Active => "active",
        Delisted => "delisted",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingStatusOptions {
    /// `YYYY-MM-DD`; listings as of that day. Empty means the latest.
    pub date: String,
    #[serde(default, deserialize_with = "crate::choice::deserialize_optional")]
    pub state: Option<ListingState>,
}

impl ListingStatusOptions {
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.date.is_empty() {
            return Ok(());
        }
        if !is_iso_date_shape(&self.date) {
            return Err(InvalidInput::new(
                "date",
                format!("expected YYYY-MM-DD, got {:?}", self.date),
            ));
        }
        if NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").is_err() {
            return Err(InvalidInput::new(
                "date",
                format!("{:?} is not a calendar date", self.date),
            ));
        }
        // Same fixed-width shape, so lexical order is date order.
        if self.date.as_str() < MIN_LISTING_DATE {
            return Err(InvalidInput::new(
                "date",
                format!("must be on or after {MIN_LISTING_DATE}"),
            ));
        }
        Ok(())
    }
}

fn is_iso_date_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

impl QueryParams for ListingStatusOptions {
    fn write_query(&self, query: &mut QueryWriter) {
        query.text("date", &self.date).choice("state", self.state);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub symbol: String,
    pub name: String,
    pub exchange: String,
    pub asset_type: String,
    #[serde(default)]
    pub ipo_date: Option<String>,
    #[serde(default)]
    pub delisting_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl FromRecord for Listing {
    fn from_record(record: &Record) -> Self {
        let symbol = record.text("symbol");
        let name = record.optional("name").unwrap_or_else(|| symbol.clone());
        Self {
            name,
            exchange: record.text("exchange"),
            asset_type: record.text("assetType"),
            ipo_date: record.optional("ipoDate"),
            delisting_date: record.optional("delistingDate").filter(|d| d != "null"),
            status: record.optional("status"),
            symbol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::encode_query;
    use crate::records::{parse_records, project};

    fn with_date(date: &str) -> ListingStatusOptions {
        ListingStatusOptions {
            date: date.to_string(),
            state: None,
        }
    }

    #[test]
    fn date_shape_and_range() {
        assert_eq!(with_date("1234-56-78").validate().unwrap_err().field, "date");
        assert_eq!(with_date("2009-12-31").validate().unwrap_err().field, "date");
        assert!(with_date("2010-01-01").validate().is_ok());
        assert!(with_date("2010-01-02").validate().is_ok());
        assert!(with_date("").validate().is_ok());
    }

    #[test]
    fn date_rejects_loose_formats() {
        for bad in ["2010-1-01", "2010/01/01", "20100101", " 2010-01-01", "2011-02-29"] {
            assert!(with_date(bad).validate().is_err(), "{bad}");
        }
        assert!(with_date("2012-02-29").validate().is_ok());
    }

    #[test]
    fn state_parses_case_insensitively() {
        assert_eq!("Delisted".parse::<ListingState>().unwrap(), ListingState::Delisted);
        assert_eq!("invalid-State".parse::<ListingState>().unwrap_err().field, "state");
    }

    #[test]
    fn blank_state_means_server_default() {
        let options: ListingStatusOptions = serde_json::from_str(r#"{"state": ""}"#).unwrap();
        assert_eq!(options.state, None);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn query_encoding() {
        assert_eq!(encode_query(Some(&ListingStatusOptions::default())), "");
        let options = ListingStatusOptions {
            date: "2014-07-10".into(),
            state: Some(ListingState::Delisted),
        };
        assert_eq!(encode_query(Some(&options)), "date=2014-07-10&state=delisted");
    }

    #[test]
    fn blank_name_falls_back_to_symbol() {
        let records = parse_records(
            b"symbol,name,exchange,assetType,ipoDate,delistingDate,status\n\
              A,Agilent Technologies Inc,NYSE,Stock,1999-11-18,null,Active\n\
              AAA,,NYSE ARCA,ETF,2020-09-09,null,Active\n",
        )
        .unwrap();
        let listings: Vec<Listing> = project(&records);
        assert_eq!(listings[0].name, "Agilent Technologies Inc");
        assert_eq!(listings[1].name, "AAA");
        assert_eq!(listings[1].asset_type, "ETF");
        assert_eq!(listings[1].delisting_date, None);
        assert_eq!(listings[0].ipo_date.as_deref(), Some("1999-11-18"));
    }

    #[test]
    fn raw_record_keeps_blank_name() {
        let records = parse_records(b"symbol,name\nAAA,\n").unwrap();
        assert_eq!(records[0].get("name"), Some(""));
    }
}
