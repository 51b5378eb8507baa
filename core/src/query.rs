//! Options object → URL query string.
//!
//! Each options shape implements `QueryParams` by hand, naming every
//! parameter it writes. `QueryWriter` owns the omission rules: an empty
//! string, an empty collection, a zero number and `None` are all left out, so
//! the server falls back to its default. Collections are written as one
//! `name=value` pair per element rather than comma-joined.

use url::form_urlencoded;

use crate::choice::Choice;

/// Explicit field → parameter declaration for an options shape.
pub trait QueryParams {
    fn write_query(&self, query: &mut QueryWriter);
}

/// Ordered list of query pairs, encoded on `finish`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryWriter {
    pairs: Vec<(&'static str, String)>,
}

impl QueryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&mut self, name: &'static str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn list<S: AsRef<str>>(&mut self, name: &'static str, values: &[S]) -> &mut Self {
        for value in values {
            self.text(name, value.as_ref());
        }
        self
    }

    pub fn number(&mut self, name: &'static str, value: Option<u32>) -> &mut Self {
        if let Some(value) = value.filter(|v| *v != 0) {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn choice<C: Choice>(&mut self, name: &'static str, value: Option<C>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((name, value.as_str().to_string()));
        }
        self
    }

    pub fn choices<C: Choice>(&mut self, name: &'static str, values: &[C]) -> &mut Self {
        for value in values {
            self.pairs.push((name, value.as_str().to_string()));
        }
        self
    }

    pub fn flag(&mut self, name: &'static str, value: Option<bool>) -> &mut Self {
        if let Some(value) = value {
            self.pairs.push((name, value.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `application/x-www-form-urlencoded` rendering, in insertion order.
    pub fn finish(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(name, value)| (*name, value.as_str())))
            .finish()
    }
}

/// Encode `options` on its own. `None` yields an empty string.
pub fn encode_query<Q: QueryParams + ?Sized>(options: Option<&Q>) -> String {
    let mut query = QueryWriter::new();
    if let Some(options) = options {
        options.write_query(&mut query);
    }
    query.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Sample {
        name: String,
        tags: Vec<String>,
        count: Option<u32>,
        enabled: Option<bool>,
    }

    impl QueryParams for Sample {
        fn write_query(&self, query: &mut QueryWriter) {
            query
                .text("name", &self.name)
                .list("tag", &self.tags)
                .number("count", self.count)
                .flag("enabled", self.enabled);
        }
    }

    fn empty() -> Sample {
        Sample {
            name: String::new(),
            tags: Vec::new(),
            count: None,
            enabled: None,
        }
    }

    #[test]
    fn none_encodes_to_empty_string() {
        assert_eq!(encode_query::<Sample>(None), "");
    }

    #[test]
    fn zero_values_are_omitted() {
        let mut sample = empty();
        assert_eq!(encode_query(Some(&sample)), "");
        sample.count = Some(0);
        sample.tags = vec![String::new()];
        assert_eq!(encode_query(Some(&sample)), "");
    }

    #[test]
    fn collections_repeat_the_parameter() {
        let sample = Sample {
            tags: vec!["AAPL".into(), "IBM".into()],
            ..empty()
        };
        assert_eq!(encode_query(Some(&sample)), "tag=AAPL&tag=IBM");
    }

    #[test]
    fn values_are_form_encoded_in_declaration_order() {
        let sample = Sample {
            name: "a b&c".into(),
            tags: vec!["x".into()],
            count: Some(50),
            enabled: Some(false),
        };
        assert_eq!(
            encode_query(Some(&sample)),
            "name=a+b%26c&tag=x&count=50&enabled=false"
        );
    }
}
