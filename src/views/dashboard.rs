use super::{App, Outcome, print_json, require_login, show_error};
use crate::application_port::BookingApi;
use crate::domain_model::{BackgroundTask, Booking, BookingStatus, User};
use chrono::{NaiveDate, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingSummary {
    pub total: usize,
    pub by_status: Vec<(BookingStatus, usize)>,
    pub upcoming: Vec<Booking>,
}

/// Counts per status plus the stays that have not started yet, soonest first.
pub fn summarize_bookings(bookings: &[Booking], today: NaiveDate) -> BookingSummary {
    let by_status = BookingStatus::ALL
        .iter()
        .map(|status| {
            let count = bookings.iter().filter(|b| b.status == *status).count();
            (*status, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();

    let mut upcoming: Vec<Booking> = bookings
        .iter()
        .filter(|b| b.start_date >= today && b.status.is_cancellable())
        .cloned()
        .collect();
    upcoming.sort_by_key(|b| b.start_date);

    BookingSummary {
        total: bookings.len(),
        by_status,
        upcoming,
    }
}

#[derive(Serialize)]
struct Dashboard {
    user: Option<User>,
    bookings: BookingSummary,
    tasks: Vec<BackgroundTask>,
}

pub async fn dashboard(app: &App) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let session = app.session.snapshot();

    let bookings = match app.api.list_bookings().await {
        Ok(bookings) => bookings,
        Err(e) => {
            show_error(&e, "Could not load bookings");
            return Outcome::Failed;
        }
    };
    let dashboard = Dashboard {
        user: session.user,
        bookings: summarize_bookings(&bookings, Utc::now().date_naive()),
        tasks: app.poller.snapshot().into_iter().take(5).collect(),
    };

    if app.json {
        print_json(&dashboard);
        return Outcome::Done;
    }

    match &dashboard.user {
        Some(user) => println!("Welcome back, {}", user.display_name()),
        None => println!("Welcome back"),
    }
    println!();
    println!("Bookings: {}", dashboard.bookings.total);
    for (status, count) in &dashboard.bookings.by_status {
        println!("  {:<10} {}", status.to_string(), count);
    }
    if !dashboard.bookings.upcoming.is_empty() {
        println!();
        println!("Upcoming stays:");
        for booking in &dashboard.bookings.upcoming {
            println!(
                "  {}  {} -> {}  {}",
                booking.listing_name(),
                booking.start_date,
                booking.end_date,
                booking.status
            );
        }
    }
    if !dashboard.tasks.is_empty() {
        println!();
        println!("Recent background tasks:");
        for task in &dashboard.tasks {
            println!("  {}  {:<8} {}", task.task_id, task.status.to_string(), task.description);
        }
    }
    Outcome::Done
}
