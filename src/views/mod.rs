//! Terminal pages. Each page prints to stdout, sends notices to stderr and
//! reports an [`Outcome`] that becomes the exit code.

mod account;
mod app;
mod bookings;
mod dashboard;
mod listings;
mod notice;
mod reviews;
mod tasks;

pub use account::*;
pub use app::*;
pub use bookings::*;
pub use dashboard::*;
pub use listings::*;
pub use notice::*;
pub use reviews::*;
pub use tasks::*;

use crate::settings::Command;

pub async fn run(app: &App, command: Command) -> Outcome {
    match command {
        Command::Login { username, password } => login(app, &username, &password).await,
        Command::Logout => logout(app).await,
        Command::Whoami => whoami(app).await,
        Command::Dashboard => dashboard(app).await,
        Command::Listings(query) => listings(app, query).await,
        Command::Search(query) => search(app, query).await,
        Command::Listing { id, reviews } => listing(app, id, reviews).await,
        Command::Availability { id, from, to } => availability(app, id, from, to).await,
        Command::CreateListing(args) => create_listing(app, args).await,
        Command::Book {
            listing,
            from,
            to,
            guests,
            watch,
        } => book(app, listing, from, to, guests, watch).await,
        Command::Bookings => bookings(app).await,
        Command::Booking { id } => booking(app, id).await,
        Command::Cancel { id } => cancel(app, id).await,
        Command::Confirm { id } => confirm(app, id).await,
        Command::Reviews { listing } => reviews(app, listing).await,
        Command::Review {
            listing,
            rating,
            comment,
            booking,
        } => review(app, listing, rating, comment, booking).await,
        Command::Respond { review, response } => respond(app, review, &response).await,
        Command::TaskStatus { task_id } => task_status(app, task_id).await,
        Command::TestTask => test_task(app).await,
        Command::TestEmail { email } => test_email(app, &email).await,
        Command::Tasks { watch } => tasks(app, watch).await,
    }
}
