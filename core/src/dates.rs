//! Serde adapters for the two date formats the backend speaks.
//!
//! Responses carry ISO-8601 timestamps with milliseconds and a literal `Z`
//! (`2021-12-28T18:44:55.596Z`). Outgoing tracking timestamps use a plain
//! `2020-12-30 07:30:00`, UTC without a designator.

use chrono::{DateTime, NaiveDateTime, Utc};

pub const ISO8601_MILLIS: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
pub const SIMPLE_DATE_TIME: &str = "%Y-%m-%d %H:%M:%S";

pub fn parse(text: &str, format: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(text, format).map(|naive| naive.and_utc())
}

pub fn format(date: &DateTime<Utc>, format: &str) -> String {
    date.format(format).to_string()
}

macro_rules! date_format_module {
    ($name:ident, $format:expr) => {
        pub mod $name {
            use chrono::{DateTime, Utc};
            use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

            pub fn serialize<S: Serializer>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&super::format(date, $format))
            }

            pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
                let text = String::deserialize(deserializer)?;
                super::parse(&text, $format).map_err(D::Error::custom)
            }

            /// Same format for `Option<DateTime<Utc>>`; pair with `#[serde(default)]`.
            pub mod option {
                use chrono::{DateTime, Utc};
                use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

                pub fn serialize<S: Serializer>(
                    date: &Option<DateTime<Utc>>,
                    serializer: S,
                ) -> Result<S::Ok, S::Error> {
                    match date {
                        Some(date) => serializer.serialize_str(&super::super::format(date, $format)),
                        None => serializer.serialize_none(),
                    }
                }

                pub fn deserialize<'de, D: Deserializer<'de>>(
                    deserializer: D,
                ) -> Result<Option<DateTime<Utc>>, D::Error> {
                    Option::<String>::deserialize(deserializer)?
                        .map(|text| super::super::parse(&text, $format).map_err(D::Error::custom))
                        .transpose()
                }
            }
        }
    };
}

date_format_module!(iso8601_millis, crate::dates::ISO8601_MILLIS);
date_format_module!(simple_date_time, crate::dates::SIMPLE_DATE_TIME);
