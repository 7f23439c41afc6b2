use super::{App, Outcome, render, require_login};
use crate::application_port::BookingApi;
use crate::domain_model::{Booking, BookingId, wire};

fn print_booking(booking: &Booking) {
    println!(
        "{}  {:<28} {} -> {}  {} guests  {:>9}  {}",
        booking.booking_id,
        booking.listing_name(),
        booking.start_date,
        booking.end_date,
        booking.guests_count,
        wire::money(booking.total_price),
        booking.status
    );
}

pub async fn bookings(app: &App) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.list_bookings().await;
    render(app.json, result, "Could not load bookings", |bookings| {
        if bookings.is_empty() {
            println!("No bookings yet");
        }
        bookings.iter().for_each(print_booking);
    })
}

pub async fn booking(app: &App, id: BookingId) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.get_booking(id).await;
    render(app.json, result, "Could not load booking", print_booking)
}

pub async fn cancel(app: &App, id: BookingId) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.cancel_booking(id).await;
    render(app.json, result, "Booking could not be canceled", |_| {
        println!("Booking {} canceled", id);
    })
}

pub async fn confirm(app: &App, id: BookingId) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.confirm_booking(id).await;
    render(app.json, result, "Booking could not be confirmed", |booking| {
        println!("Booking {} is now {}", booking.booking_id, booking.status);
    })
}
