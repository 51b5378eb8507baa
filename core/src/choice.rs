//! Closed value sets for enumerated query parameters.
//!
//! Every enumerated option (`sort`, `interval`, `datatype`, ...) is a plain
//! Rust enum declared through `choice_enum!`, which ties each variant to its
//! wire string. Parsing is the one validity predicate: case-insensitive,
//! exhaustive over `Choice::ALL`, and failing with `InvalidInput` naming the
//! query parameter.

use std::fmt;
use std::str::FromStr;

use crate::error::InvalidInput;

pub trait Choice: Copy + Eq + fmt::Debug + FromStr<Err = InvalidInput> + 'static {
    /// Query parameter the value is sent under.
    const FIELD: &'static str;
    const ALL: &'static [Self];

    fn as_str(self) -> &'static str;
}

/// Case-insensitive lookup of `value` among `T::ALL`.
pub fn parse_choice<T: Choice>(value: &str) -> Result<T, InvalidInput> {
    let wanted = value.trim();
    T::ALL
        .iter()
        .copied()
        .find(|choice| choice.as_str().eq_ignore_ascii_case(wanted))
        .ok_or_else(|| {
            let allowed: Vec<&str> = T::ALL.iter().map(|c| c.as_str()).collect();
            InvalidInput::new(
                T::FIELD,
                format!("unsupported value {value:?} (expected one of {})", allowed.join(", ")),
            )
        })
}

/// Like `parse_choice`, but a blank string means "use the server default".
pub fn parse_optional<T: Choice>(value: &str) -> Result<Option<T>, InvalidInput> {
    if value.trim().is_empty() {
        Ok(None)
    } else {
        parse_choice(value).map(Some)
    }
}

/// Serde counterpart of `parse_optional` for `Option<T>` fields: `null`, a
/// missing field and a blank string all deserialize to `None`.
pub fn deserialize_optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Choice,
{
    let raw = <Option<String> as serde::Deserialize>::deserialize(deserializer)?;
    match raw {
        Some(raw) => parse_optional(&raw).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $field:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $crate::choice::Choice for $name {
            const FIELD: &'static str = $field;
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::InvalidInput;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $crate::choice::parse_choice(s)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::choice::Choice::as_str(*self))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::choice::Choice::as_str(*self))
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                let raw = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(::serde::de::Error::custom)
            }
        }
    };
}

pub(crate) use choice_enum;

#[cfg(test)]
mod tests {
    use super::*;

    choice_enum! {
        enum Colour: "colour" {
            Red => "red",
            Green => "GREEN",
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("RED".parse::<Colour>().unwrap(), Colour::Red);
        assert_eq!("green".parse::<Colour>().unwrap(), Colour::Green);
        assert_eq!(" Red ".parse::<Colour>().unwrap(), Colour::Red);
    }

    #[test]
    fn unknown_value_names_the_field() {
        let err = "blue".parse::<Colour>().unwrap_err();
        assert_eq!(err.field, "colour");
        assert!(err.reason.contains("red, GREEN"), "{}", err.reason);
    }

    #[test]
    fn blank_means_default_only_for_optional_parse() {
        assert_eq!(parse_optional::<Colour>("").unwrap(), None);
        assert_eq!(parse_optional::<Colour>("  ").unwrap(), None);
        assert!("".parse::<Colour>().is_err());
        assert_eq!(parse_optional::<Colour>("Green").unwrap(), Some(Colour::Green));
    }

    #[test]
    fn serde_uses_wire_strings() {
        assert_eq!(serde_json::to_string(&Colour::Green).unwrap(), r#""GREEN""#);
        let back: Colour = serde_json::from_str(r#""gReEn""#).unwrap();
        assert_eq!(back, Colour::Green);
        assert!(serde_json::from_str::<Colour>(r#""blue""#).is_err());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Palette {
        #[serde(default, deserialize_with = "deserialize_optional")]
        colour: Option<Colour>,
    }

    #[test]
    fn optional_field_treats_blank_as_unset() {
        for body in [r#"{"colour": ""}"#, r#"{"colour": " "}"#, r#"{"colour": null}"#, "{}"] {
            let palette: Palette = serde_json::from_str(body).unwrap();
            assert_eq!(palette.colour, None, "{body}");
        }
        let palette: Palette = serde_json::from_str(r#"{"colour": "RED"}"#).unwrap();
        assert_eq!(palette.colour, Some(Colour::Red));
        let err = serde_json::from_str::<Palette>(r#"{"colour": "blue"}"#).unwrap_err();
        assert!(err.to_string().contains("colour"), "{err}");
    }
}
