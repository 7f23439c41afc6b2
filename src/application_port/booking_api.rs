use super::ApiResult;
use crate::domain_model::{Booking, BookingId, CreatedBooking, NewBooking};

#[async_trait::async_trait]
pub trait BookingApi: Send + Sync {
    async fn list_bookings(&self) -> ApiResult<Vec<Booking>>;
    async fn get_booking(&self, id: BookingId) -> ApiResult<Booking>;
    async fn create_booking(&self, booking: &NewBooking) -> ApiResult<CreatedBooking>;
    /// `DELETE /api/bookings/{id}/`; the server answers without a body.
    async fn cancel_booking(&self, id: BookingId) -> ApiResult<()>;
    /// Host-only: moves a pending booking to confirmed.
    async fn confirm_booking(&self, id: BookingId) -> ApiResult<Booking>;
}
