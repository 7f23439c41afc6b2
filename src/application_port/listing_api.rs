use super::ApiResult;
use crate::domain_model::{
    Availability, Listing, ListingFilter, ListingId, ListingSearch, NewListing, Review,
};
use chrono::NaiveDate;

#[async_trait::async_trait]
pub trait ListingApi: Send + Sync {
    async fn list_listings(&self, filter: &ListingFilter) -> ApiResult<Vec<Listing>>;
    async fn get_listing(&self, id: ListingId) -> ApiResult<Listing>;
    async fn create_listing(&self, listing: &NewListing) -> ApiResult<Listing>;
    async fn check_availability(
        &self,
        id: ListingId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Availability>;
    /// `GET /api/listings/search/`
    async fn search_listings(&self, search: &ListingSearch) -> ApiResult<Vec<Listing>>;
    /// `GET /api/listings/{id}/reviews/`
    async fn listing_reviews(&self, id: ListingId) -> ApiResult<Vec<Review>>;
}
