mod auth_api_fake;
mod rest_api;
mod rest_auth_api;
mod rest_booking_api;
mod rest_listing_api;
mod rest_review_api;
mod rest_task_api;
mod task_api_fake;

pub use auth_api_fake::*;
pub use rest_api::*;
pub use task_api_fake::*;
