mod booking;
mod listing;
mod review;
mod task;
mod token;
mod user;
pub mod wire;

pub use booking::*;
pub use listing::*;
pub use review::*;
pub use task::*;
pub use token::*;
pub use user::*;
