mod api_error;
mod api_response;
mod auth_api;
mod booking_api;
mod listing_api;
mod review_api;
mod task_api;

pub use api_error::*;
pub use api_response::*;
pub use auth_api::*;
pub use booking_api::*;
pub use listing_api::*;
pub use review_api::*;
pub use task_api::*;
