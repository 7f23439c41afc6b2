//! Lenient serde helpers for the shapes the booking service puts on the wire.

use chrono::{DateTime, NaiveDate};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

fn number_from(value: NumberOrString) -> Result<f64, String> {
    match value {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid decimal {:?}: {}", s, e)),
    }
}

/// Decimal fields are serialized as strings (`"100.00"`) by the service.
pub fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    number_from(NumberOrString::deserialize(deserializer)?).map_err(de::Error::custom)
}

pub fn opt_decimal<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(number_from)
        .transpose()
        .map_err(de::Error::custom)
}

pub fn parse_day(s: &str) -> Result<NaiveDate, String> {
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(day);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.date_naive())
        .map_err(|e| format!("invalid date {:?}: {}", s, e))
}

/// Dates go out as `YYYY-MM-DD`; coming back they may be full timestamps.
pub mod day {
    use super::*;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_day(&s).map_err(de::Error::custom)
    }
}

/// Collection endpoints answer either with a bare array or a paginated page.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Page { results: Vec<T> },
    List(Vec<T>),
}

impl<T> Collection<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Collection::Page { results } => results,
            Collection::List(items) => items,
        }
    }
}

pub fn money(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Serializes an amount as a two-decimal string, the way the service expects it.
pub fn serialize_money<S>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    money(*amount).serialize(serializer)
}
