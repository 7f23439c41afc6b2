use super::{
    App, BOOKING_FAILED, Outcome, booking_notice, print_json, render, require_login, show_error,
    show_info,
};
use super::reviews::print_review;
use crate::application_port::{ApiError, ApiResponse, ApiResult, BookingApi, ListingApi};
use crate::domain_model::{
    BackgroundTask, CreatedBooking, Listing, ListingFilter, ListingId, ListingSearch, NewBooking,
    NewListing, Review, TaskKind, quote_total, stay_nights, wire,
};
use crate::settings::{ListingQuery, NewListingArgs, SearchQuery};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

impl From<ListingQuery> for ListingFilter {
    fn from(query: ListingQuery) -> Self {
        ListingFilter {
            city: query.city,
            county: query.county,
            min_price: query.min_price,
            max_price: query.max_price,
            min_guests: query.guests,
            min_bedrooms: query.bedrooms,
            min_bathrooms: query.bathrooms,
            property_type: query.property_type,
            room_type: query.room_type,
            available_from: query.available_from,
            available_to: query.available_to,
        }
    }
}

impl From<SearchQuery> for ListingSearch {
    fn from(query: SearchQuery) -> Self {
        ListingSearch {
            city: query.city,
            min_price: query.min_price,
            max_price: query.max_price,
            bedrooms: query.bedrooms,
            guests: query.guests,
        }
    }
}

impl From<NewListingArgs> for NewListing {
    fn from(args: NewListingArgs) -> Self {
        NewListing {
            name: args.name,
            description: args.description,
            property_type: args.property_type,
            room_type: args.room_type,
            city: args.city,
            county: args.county,
            postal_code: args.postal_code,
            bedrooms: args.bedrooms,
            bathrooms: args.bathrooms,
            max_guests: args.max_guests,
            price_per_night: args.price,
        }
    }
}

fn print_row(listing: &Listing) {
    let rating = listing
        .average_rating
        .map(|r| format!("{:.1}*", r))
        .unwrap_or_else(|| "new".to_string());
    println!(
        "{}  {:<32} {:<24} {:>9}/night  up to {} guests  {}",
        listing.property_id,
        listing.name,
        listing.location(),
        wire::money(listing.price_per_night),
        listing.max_guests,
        rating
    );
}

fn print_listing(listing: &Listing) {
    println!("{}", listing.name);
    println!("  id:        {}", listing.property_id);
    println!("  where:     {}", listing.location());
    if let Some(kind) = &listing.property_type {
        println!("  type:      {}", kind);
    }
    println!(
        "  rooms:     {} bedrooms, {} bathrooms, up to {} guests",
        listing.bedrooms, listing.bathrooms, listing.max_guests
    );
    println!("  price:     {} per night", wire::money(listing.price_per_night));
    if let (Some(rating), Some(count)) = (listing.average_rating, listing.review_count) {
        println!("  rating:    {:.1} from {} reviews", rating, count);
    }
    if !listing.description.is_empty() {
        println!();
        println!("{}", listing.description);
    }
}

pub async fn listings(app: &App, query: ListingQuery) -> Outcome {
    let filter = ListingFilter::from(query);
    let result = app.api.list_listings(&filter).await;
    render(app.json, result, "Could not load listings", |listings| {
        if listings.is_empty() {
            println!("No listings match");
        }
        listings.iter().for_each(print_row);
    })
}

pub async fn search(app: &App, query: SearchQuery) -> Outcome {
    let search = ListingSearch::from(query);
    let result = app.api.search_listings(&search).await;
    render(app.json, result, "Search failed", |listings| {
        if listings.is_empty() {
            println!("No listings match");
        }
        listings.iter().for_each(print_row);
    })
}

#[derive(Serialize)]
struct ListingPage {
    #[serde(flatten)]
    listing: Listing,
    #[serde(skip_serializing_if = "Option::is_none")]
    reviews: Option<Vec<Review>>,
}

pub async fn listing(app: &App, id: ListingId, with_reviews: bool) -> Outcome {
    let result = if with_reviews {
        let (listing, reviews) = tokio::join!(app.api.get_listing(id), app.api.listing_reviews(id));
        listing.and_then(|listing| {
            Ok(ListingPage {
                listing,
                reviews: Some(reviews?),
            })
        })
    } else {
        app.api
            .get_listing(id)
            .await
            .map(|listing| ListingPage { listing, reviews: None })
    };
    render(app.json, result, "Could not load listing", |page| {
        print_listing(&page.listing);
        if let Some(reviews) = &page.reviews {
            println!();
            if reviews.is_empty() {
                println!("No reviews yet");
            }
            reviews.iter().for_each(print_review);
        }
    })
}

pub async fn availability(app: &App, id: ListingId, from: NaiveDate, to: NaiveDate) -> Outcome {
    let result = app.api.check_availability(id, from, to).await;
    render(app.json, result, "Could not check availability", |answer| {
        if answer.available {
            println!("Available from {} to {}", answer.start_date, answer.end_date);
        } else {
            println!(
                "Not available from {} to {} ({} overlapping bookings)",
                answer.start_date, answer.end_date, answer.conflicting_bookings
            );
        }
    })
}

pub async fn create_listing(app: &App, args: NewListingArgs) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let listing = NewListing::from(args);
    let result = app.api.create_listing(&listing).await;
    render(app.json, result, "Listing could not be created", |created| {
        println!("Listed {} ({})", created.name, created.property_id);
    })
}

/// Prices the stay from the listing's nightly rate before anything is sent.
pub fn quote_booking(
    listing: &Listing,
    start: NaiveDate,
    end: NaiveDate,
    guests: u32,
) -> ApiResult<NewBooking> {
    if stay_nights(start, end) == 0 {
        return Err(ApiError::validation("Check-out must be after check-in"));
    }
    if listing.max_guests > 0 && guests > listing.max_guests {
        return Err(ApiError::validation(format!(
            "{} sleeps at most {} guests",
            listing.name, listing.max_guests
        )));
    }
    Ok(NewBooking {
        property_id: listing.property_id,
        start_date: start,
        end_date: end,
        guests_count: guests,
        total_price: quote_total(start, end, listing.price_per_night),
    })
}

async fn place_booking(
    app: &App,
    id: ListingId,
    start: NaiveDate,
    end: NaiveDate,
    guests: u32,
) -> ApiResult<CreatedBooking> {
    let listing = app.api.get_listing(id).await?;
    let booking = quote_booking(&listing, start, end, guests)?;
    info!(
        listing = %listing.property_id,
        nights = stay_nights(start, end),
        total = %wire::money(booking.total_price),
        "placing booking"
    );
    app.api.create_booking(&booking).await
}

pub async fn book(
    app: &App,
    id: ListingId,
    start: NaiveDate,
    end: NaiveDate,
    guests: u32,
    watch: bool,
) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let created = match place_booking(app, id, start, end, guests).await {
        Ok(created) => created,
        Err(e) if app.json => {
            print_json(&ApiResponse::<CreatedBooking>::err(&e));
            return Outcome::Failed;
        }
        Err(e) => {
            show_error(&e, BOOKING_FAILED);
            return Outcome::Failed;
        }
    };

    if let Some(task_id) = &created.email_task_id {
        app.poller.track(BackgroundTask::submitted(
            task_id.clone(),
            TaskKind::BookingConfirmation,
            format!("confirmation for booking {}", created.booking.booking_id),
        ));
    }

    if app.json {
        print_json(&ApiResponse::ok(&created));
    } else {
        let booking = &created.booking;
        println!(
            "Booked {} from {} to {} ({} nights, {} guests) for {}",
            booking.listing_name(),
            booking.start_date,
            booking.end_date,
            booking.nights(),
            booking.guests_count,
            wire::money(booking.total_price)
        );
        println!("  booking id: {}  status: {}", booking.booking_id, booking.status);
        if let Some(notice) = booking_notice(&created) {
            show_info(&notice);
        }
    }

    if watch && created.email_task_id.is_some() {
        return super::watch_tasks(app).await;
    }
    Outcome::Done
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(price: &str, max_guests: u32) -> Listing {
        serde_json::from_value(serde_json::json!({
            "property_id": "0b6b7b0e-6a8c-4f3e-9f61-2f7d7f1c5b11",
            "name": "Harbour loft",
            "city": "Cork",
            "max_guests": max_guests,
            "price_per_night": price,
        }))
        .unwrap()
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn quote_multiplies_nights_by_rate() {
        let booking =
            quote_booking(&listing("100.00", 4), day("2025-06-01"), day("2025-06-04"), 2).unwrap();
        assert_eq!(booking.total_price, 300.0);
        assert_eq!(booking.guests_count, 2);
        assert_eq!(
            serde_json::to_value(&booking).unwrap()["total_price"],
            serde_json::json!("300.00")
        );
    }

    #[test]
    fn quote_rejects_empty_stays_and_crowds() {
        let loft = listing("80", 2);
        let err = quote_booking(&loft, day("2025-06-04"), day("2025-06-01"), 1).unwrap_err();
        assert_eq!(err.to_string(), "Check-out must be after check-in");

        let err = quote_booking(&loft, day("2025-06-01"), day("2025-06-02"), 3).unwrap_err();
        assert_eq!(err.to_string(), "Harbour loft sleeps at most 2 guests");
    }

    #[test]
    fn query_flags_map_onto_filter() {
        let filter = ListingFilter::from(ListingQuery {
            city: Some("Galway".to_string()),
            guests: Some(3),
            ..ListingQuery::default()
        });
        assert_eq!(filter.city.as_deref(), Some("Galway"));
        assert_eq!(filter.min_guests, Some(3));
        assert_eq!(filter.max_price, None);
    }

    #[test]
    fn listing_page_inlines_the_listing() {
        let page = ListingPage {
            listing: listing("120", 4),
            reviews: Some(Vec::new()),
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["name"], "Harbour loft");
        assert_eq!(value["reviews"], serde_json::json!([]));

        let bare = ListingPage {
            listing: listing("120", 4),
            reviews: None,
        };
        assert!(serde_json::to_value(&bare).unwrap().get("reviews").is_none());
    }
}
