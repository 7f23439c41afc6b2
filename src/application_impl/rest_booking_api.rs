use super::RestApi;
use crate::application_port::*;
use crate::domain_model::wire::Collection;
use crate::domain_model::{Booking, BookingId, CreatedBooking, NewBooking};
use crate::infra::ApiRequest;
use reqwest::Method;
use tracing::info;

const BOOKINGS_PATH: &str = "/api/bookings/";

fn booking_path(id: BookingId) -> String {
    format!("{}{}/", BOOKINGS_PATH, id)
}

#[async_trait::async_trait]
impl BookingApi for RestApi {
    async fn list_bookings(&self) -> ApiResult<Vec<Booking>> {
        let bookings: Collection<Booking> = self.http.send(ApiRequest::get(BOOKINGS_PATH)).await?;
        Ok(bookings.into_vec())
    }

    async fn get_booking(&self, id: BookingId) -> ApiResult<Booking> {
        self.http.send(ApiRequest::get(booking_path(id))).await
    }

    async fn create_booking(&self, booking: &NewBooking) -> ApiResult<CreatedBooking> {
        if booking.end_date <= booking.start_date {
            return Err(ApiError::validation("End date must be after the start date"));
        }
        if booking.guests_count == 0 {
            return Err(ApiError::validation("A booking needs at least one guest"));
        }
        let created: CreatedBooking = self
            .http
            .send(ApiRequest::post(BOOKINGS_PATH).json(booking)?)
            .await?;
        info!(
            booking_id = %created.booking.booking_id,
            email_task = ?created.email_task_id,
            "booking created"
        );
        Ok(created)
    }

    async fn cancel_booking(&self, id: BookingId) -> ApiResult<()> {
        self.http
            .send_empty(ApiRequest::new(Method::DELETE, booking_path(id)))
            .await?;
        info!(booking_id = %id, "booking canceled");
        Ok(())
    }

    async fn confirm_booking(&self, id: BookingId) -> ApiResult<Booking> {
        let booking: Booking = self
            .http
            .send(ApiRequest::post(format!("{}confirm/", booking_path(id))))
            .await?;
        info!(booking_id = %id, status = %booking.status, "booking confirmed");
        Ok(booking)
    }
}
