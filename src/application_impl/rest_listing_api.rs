use super::RestApi;
use crate::application_port::*;
use crate::domain_model::wire::Collection;
use crate::domain_model::{
    Availability, Listing, ListingFilter, ListingId, ListingSearch, NewListing, Review,
};
use crate::infra::ApiRequest;
use chrono::NaiveDate;

const LISTINGS_PATH: &str = "/api/listings/";

fn listing_path(id: ListingId) -> String {
    format!("{}{}/", LISTINGS_PATH, id)
}

#[async_trait::async_trait]
impl ListingApi for RestApi {
    async fn list_listings(&self, filter: &ListingFilter) -> ApiResult<Vec<Listing>> {
        let request = ApiRequest::get(LISTINGS_PATH).query(filter.to_query());
        let listings: Collection<Listing> = self.http.send(request).await?;
        Ok(listings.into_vec())
    }

    async fn get_listing(&self, id: ListingId) -> ApiResult<Listing> {
        self.http.send(ApiRequest::get(listing_path(id))).await
    }

    async fn create_listing(&self, listing: &NewListing) -> ApiResult<Listing> {
        if listing.price_per_night <= 0.0 {
            return Err(ApiError::validation("price per night must be greater than 0"));
        }
        if listing.max_guests == 0 {
            return Err(ApiError::validation("a listing must host at least one guest"));
        }
        self.http
            .send(ApiRequest::post(LISTINGS_PATH).json(listing)?)
            .await
    }

    async fn check_availability(
        &self,
        id: ListingId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> ApiResult<Availability> {
        let request = ApiRequest::get(format!("{}availability/", listing_path(id))).query(vec![
            ("start_date".to_string(), start.format("%Y-%m-%d").to_string()),
            ("end_date".to_string(), end.format("%Y-%m-%d").to_string()),
        ]);
        self.http.send(request).await
    }

    async fn search_listings(&self, search: &ListingSearch) -> ApiResult<Vec<Listing>> {
        let request = ApiRequest::get(format!("{}search/", LISTINGS_PATH)).query(search.to_query());
        let listings: Collection<Listing> = self.http.send(request).await?;
        Ok(listings.into_vec())
    }

    async fn listing_reviews(&self, id: ListingId) -> ApiResult<Vec<Review>> {
        let reviews: Collection<Review> = self
            .http
            .send(ApiRequest::get(format!("{}reviews/", listing_path(id))))
            .await?;
        Ok(reviews.into_vec())
    }
}
