use super::{App, Outcome, render, require_login};
use crate::application_port::ReviewApi;
use crate::domain_model::{BookingId, ListingId, NewReview, Review, ReviewId};

pub(super) fn print_review(review: &Review) {
    let stars = "*".repeat(usize::from(review.rating));
    let date = review
        .created_at
        .map(|at| at.date_naive().to_string())
        .unwrap_or_default();
    println!("{:<5} {}  {}", stars, date, review.comment.as_deref().unwrap_or(""));
    if let Some(reply) = &review.host_response {
        println!("      host: {}", reply);
    }
}

pub async fn reviews(app: &App, listing: ListingId) -> Outcome {
    let result = app.api.list_reviews(listing).await;
    render(app.json, result, "Could not load reviews", |reviews| {
        if reviews.is_empty() {
            println!("No reviews yet");
        }
        reviews.iter().for_each(print_review);
    })
}

pub async fn review(
    app: &App,
    listing: ListingId,
    rating: u8,
    comment: Option<String>,
    booking: Option<BookingId>,
) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let review = NewReview {
        property_id: listing,
        booking_id: booking,
        rating,
        comment,
    };
    let result = app.api.create_review(&review).await;
    render(app.json, result, "Review could not be posted", |posted| {
        println!("Thanks! Review {} posted", posted.review_id);
    })
}

pub async fn respond(app: &App, id: ReviewId, response: &str) -> Outcome {
    if !require_login(app).await {
        return Outcome::Failed;
    }
    let result = app.api.respond_to_review(id, response).await;
    render(app.json, result, "Response could not be posted", |review| {
        println!("Response posted to review {}", review.review_id);
    })
}
