use super::{Parser, Subcommand};
use crate::domain_model::{BookingId, ListingId, ReviewId};
use chrono::NaiveDate;

#[derive(Parser, Debug)]
#[command(name = "stayline", version, about = "Browse stays, book them and follow confirmation e-mails")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,
    /// Print the uniform `{success, data, error}` envelope instead of text.
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Obtain a token pair and load the profile
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored tokens
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Session, bookings and recent background tasks at a glance
    Dashboard,
    /// Browse listings
    Listings(ListingQuery),
    /// Search listings by city, price, bedrooms and guests
    Search(SearchQuery),
    /// Show one listing
    Listing {
        id: ListingId,
        /// Also print the listing's reviews
        #[arg(long)]
        reviews: bool,
    },
    /// Check whether a listing is free for a date range
    Availability {
        id: ListingId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
    },
    /// Publish a new listing
    CreateListing(NewListingArgs),
    /// Book a listing; the total is computed from the nightly price
    Book {
        listing: ListingId,
        #[arg(long)]
        from: NaiveDate,
        #[arg(long)]
        to: NaiveDate,
        #[arg(long, default_value_t = 1)]
        guests: u32,
        /// Follow the confirmation e-mail task until it finishes
        #[arg(long)]
        watch: bool,
    },
    /// List your bookings
    Bookings,
    /// Show one booking
    Booking { id: BookingId },
    /// Cancel a booking
    Cancel { id: BookingId },
    /// Confirm a pending booking on one of your listings
    Confirm { id: BookingId },
    /// Reviews for a listing
    Reviews { listing: ListingId },
    /// Review a listing
    Review {
        listing: ListingId,
        #[arg(long)]
        rating: u8,
        #[arg(long)]
        comment: Option<String>,
        #[arg(long)]
        booking: Option<BookingId>,
    },
    /// Answer a review of one of your listings
    Respond {
        review: ReviewId,
        #[arg(long)]
        response: String,
    },
    /// Query one background task
    TaskStatus { task_id: String },
    /// Queue the diagnostic worker task
    TestTask,
    /// Queue a diagnostic e-mail
    TestEmail { email: String },
    /// Show tracked background tasks
    Tasks {
        /// Keep polling until every task is finished (Ctrl-C to stop)
        #[arg(long)]
        watch: bool,
    },
}

#[derive(clap::Args, Debug, Default)]
pub struct ListingQuery {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub county: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub guests: Option<u32>,
    #[arg(long)]
    pub bedrooms: Option<u32>,
    #[arg(long)]
    pub bathrooms: Option<u32>,
    #[arg(long = "type")]
    pub property_type: Option<String>,
    #[arg(long)]
    pub room_type: Option<String>,
    #[arg(long)]
    pub available_from: Option<NaiveDate>,
    #[arg(long)]
    pub available_to: Option<NaiveDate>,
}

#[derive(clap::Args, Debug, Default)]
pub struct SearchQuery {
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub bedrooms: Option<u32>,
    #[arg(long)]
    pub guests: Option<u32>,
}

#[derive(clap::Args, Debug)]
pub struct NewListingArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long = "type", default_value = "apartment")]
    pub property_type: String,
    #[arg(long, default_value = "entire_place")]
    pub room_type: String,
    #[arg(long)]
    pub city: String,
    #[arg(long)]
    pub county: String,
    #[arg(long, default_value = "")]
    pub postal_code: String,
    #[arg(long, default_value_t = 1)]
    pub bedrooms: u32,
    #[arg(long, default_value_t = 1)]
    pub bathrooms: u32,
    #[arg(long)]
    pub max_guests: u32,
    #[arg(long)]
    pub price: f64,
}
