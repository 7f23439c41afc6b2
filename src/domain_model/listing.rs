use super::wire;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(pub uuid::Uuid);

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(ListingId)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub property_id: ListingId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default, alias = "bedroom")]
    pub bedrooms: u32,
    #[serde(default, alias = "bathroom")]
    pub bathrooms: u32,
    #[serde(default)]
    pub max_guests: u32,
    #[serde(deserialize_with = "wire::decimal")]
    pub price_per_night: f64,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default, deserialize_with = "wire::opt_decimal")]
    pub average_rating: Option<f64>,
    #[serde(default)]
    pub review_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    pub fn location(&self) -> String {
        match (self.city.is_empty(), self.county.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.county),
            (false, true) => self.city.clone(),
            (true, false) => self.county.clone(),
            (true, true) => "unknown location".to_string(),
        }
    }
}

/// Body of `POST /api/listings/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewListing {
    pub name: String,
    pub description: String,
    pub property_type: String,
    pub room_type: String,
    pub city: String,
    pub county: String,
    pub postal_code: String,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub max_guests: u32,
    #[serde(serialize_with = "wire::serialize_money")]
    pub price_per_night: f64,
}

/// Optional query parameters of `GET /api/listings/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub city: Option<String>,
    pub county: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_guests: Option<u32>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub property_type: Option<String>,
    pub room_type: Option<String>,
    pub available_from: Option<NaiveDate>,
    pub available_to: Option<NaiveDate>,
}

impl ListingFilter {
    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        let mut push = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                query.push((key.to_string(), value));
            }
        };
        push("city", self.city.clone());
        push("county", self.county.clone());
        push("min_price", self.min_price.map(wire::money));
        push("max_price", self.max_price.map(wire::money));
        push("min_guests", self.min_guests.map(|n| n.to_string()));
        push("min_bedrooms", self.min_bedrooms.map(|n| n.to_string()));
        push("min_bathrooms", self.min_bathrooms.map(|n| n.to_string()));
        push("property_type", self.property_type.clone());
        push("room_type", self.room_type.clone());
        push(
            "available_from",
            self.available_from.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        push(
            "available_to",
            self.available_to.map(|d| d.format("%Y-%m-%d").to_string()),
        );
        query
    }
}

/// Query of `GET /api/listings/search/`: substring match on city, minimum
/// bedrooms and guest capacity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingSearch {
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub bedrooms: Option<u32>,
    pub guests: Option<u32>,
}

impl ListingSearch {
    pub fn to_query(&self) -> Vec<(String, String)> {
        [
            ("city", self.city.clone()),
            ("min_price", self.min_price.map(wire::money)),
            ("max_price", self.max_price.map(wire::money)),
            ("bedrooms", self.bedrooms.map(|n| n.to_string())),
            ("guests", self.guests.map(|n| n.to_string())),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|value| (key.to_string(), value)))
        .collect()
    }
}

/// Answer of `GET /api/listings/{id}/availability/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub available: bool,
    #[serde(with = "wire::day")]
    pub start_date: NaiveDate,
    #[serde(with = "wire::day")]
    pub end_date: NaiveDate,
    #[serde(default)]
    pub conflicting_bookings: u32,
}
