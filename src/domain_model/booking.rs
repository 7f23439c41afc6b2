use super::{Listing, ListingId, TaskId, wire};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(pub uuid::Uuid);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BookingId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        uuid::Uuid::from_str(s).map(BookingId)
    }
}

/// Lifecycle is driven by the service; a host may confirm, guests and hosts may cancel.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Canceled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Canceled,
    ];

    pub fn is_cancellable(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Completed => "completed",
            BookingStatus::Canceled => "canceled",
        };
        f.write_str(label)
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    // The service sometimes sends display labels ("Cancelled") instead of values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "completed" => Ok(BookingStatus::Completed),
            "canceled" | "cancelled" => Ok(BookingStatus::Canceled),
            other => Err(format!("unknown booking status: {}", other)),
        }
    }
}

impl<'de> Deserialize<'de> for BookingStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: BookingId,
    #[serde(default)]
    pub property_id: Option<ListingId>,
    #[serde(default)]
    pub property: Option<Listing>,
    #[serde(with = "wire::day")]
    pub start_date: NaiveDate,
    #[serde(with = "wire::day")]
    pub end_date: NaiveDate,
    #[serde(default = "one_guest", alias = "guests", alias = "guest_count")]
    pub guests_count: u32,
    #[serde(deserialize_with = "wire::decimal")]
    pub total_price: f64,
    pub status: BookingStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn one_guest() -> u32 {
    1
}

impl Booking {
    pub fn listing_id(&self) -> Option<ListingId> {
        self.property_id
            .or_else(|| self.property.as_ref().map(|p| p.property_id))
    }

    pub fn listing_name(&self) -> String {
        match (&self.property, self.property_id) {
            (Some(listing), _) => listing.name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "unknown property".to_string(),
        }
    }

    pub fn nights(&self) -> u32 {
        stay_nights(self.start_date, self.end_date)
    }
}

/// Body of `POST /api/bookings/`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewBooking {
    pub property_id: ListingId,
    #[serde(with = "wire::day")]
    pub start_date: NaiveDate,
    #[serde(with = "wire::day")]
    pub end_date: NaiveDate,
    pub guests_count: u32,
    #[serde(serialize_with = "wire::serialize_money")]
    pub total_price: f64,
}

/// A freshly created booking plus the confirmation e-mail job, when one was queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedBooking {
    #[serde(flatten)]
    pub booking: Booking,
    #[serde(default, alias = "task_id")]
    pub email_task_id: Option<TaskId>,
}

/// Whole nights between check-in and check-out, never negative.
pub fn stay_nights(start: NaiveDate, end: NaiveDate) -> u32 {
    let days = end.signed_duration_since(start).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

pub fn quote_total(start: NaiveDate, end: NaiveDate, price_per_night: f64) -> f64 {
    stay_nights(start, end) as f64 * price_per_night
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        wire::parse_day(s).unwrap()
    }

    #[test]
    fn quote_counts_whole_nights() {
        assert_eq!(stay_nights(day("2025-06-01"), day("2025-06-04")), 3);
        assert_eq!(quote_total(day("2025-06-01"), day("2025-06-04"), 100.0), 300.0);
    }

    #[test]
    fn quote_clamps_inverted_ranges_to_zero() {
        assert_eq!(quote_total(day("2025-06-04"), day("2025-06-01"), 100.0), 0.0);
        assert_eq!(quote_total(day("2025-06-04"), day("2025-06-04"), 100.0), 0.0);
    }

    #[test]
    fn status_accepts_values_and_display_labels() {
        assert_eq!("Cancelled".parse::<BookingStatus>(), Ok(BookingStatus::Canceled));
        assert_eq!("canceled".parse::<BookingStatus>(), Ok(BookingStatus::Canceled));
        assert_eq!("Confirmed".parse::<BookingStatus>(), Ok(BookingStatus::Confirmed));
        assert!("archived".parse::<BookingStatus>().is_err());
        assert!(!BookingStatus::Completed.is_cancellable());
    }

    #[test]
    fn created_booking_picks_up_task_id_aliases() {
        let body = serde_json::json!({
            "booking_id": "4b7f2a10-1c55-4f7e-8e2a-7d6c5b4a3f21",
            "property_id": "0b8f7c52-7a1e-4cde-9c6b-1d0f3b9b2a11",
            "start_date": "2025-06-01T00:00:00Z",
            "end_date": "2025-06-04",
            "guests_count": 2,
            "total_price": "300.00",
            "status": "Pending",
            "task_id": "celery-abc"
        });
        let created: CreatedBooking = serde_json::from_value(body).unwrap();
        assert_eq!(created.email_task_id, Some(TaskId("celery-abc".to_string())));
        assert_eq!(created.booking.nights(), 3);
        assert_eq!(created.booking.total_price, 300.0);

        let without = serde_json::json!({
            "booking_id": "4b7f2a10-1c55-4f7e-8e2a-7d6c5b4a3f21",
            "start_date": "2025-06-01",
            "end_date": "2025-06-04",
            "total_price": 300,
            "status": "pending"
        });
        let created: CreatedBooking = serde_json::from_value(without).unwrap();
        assert_eq!(created.email_task_id, None);
        assert_eq!(created.booking.guests_count, 1);
    }

    #[test]
    fn new_booking_serializes_dates_and_money() {
        let request = NewBooking {
            property_id: "0b8f7c52-7a1e-4cde-9c6b-1d0f3b9b2a11".parse().unwrap(),
            start_date: day("2025-06-01"),
            end_date: day("2025-06-04"),
            guests_count: 2,
            total_price: 300.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["start_date"], "2025-06-01");
        assert_eq!(json["total_price"], "300.00");
    }
}
