use super::RestApi;
use crate::application_port::*;
use crate::domain_model::wire::Collection;
use crate::domain_model::{ListingId, MAX_RATING, MIN_RATING, NewReview, Review, ReviewId};
use crate::infra::ApiRequest;
use serde_json::json;
use tracing::info;

const REVIEWS_PATH: &str = "/api/reviews/";

#[async_trait::async_trait]
impl ReviewApi for RestApi {
    async fn list_reviews(&self, property: ListingId) -> ApiResult<Vec<Review>> {
        let request = ApiRequest::get(REVIEWS_PATH)
            .query(vec![("property_id".to_string(), property.to_string())]);
        let reviews: Collection<Review> = self.http.send(request).await?;
        Ok(reviews.into_vec())
    }

    async fn create_review(&self, review: &NewReview) -> ApiResult<Review> {
        if !review.rating_in_range() {
            return Err(ApiError::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }
        self.http
            .send(ApiRequest::post(REVIEWS_PATH).json(review)?)
            .await
    }

    async fn respond_to_review(&self, id: ReviewId, response: &str) -> ApiResult<Review> {
        let response = response.trim();
        if response.is_empty() {
            return Err(ApiError::validation("A response cannot be empty"));
        }
        let request = ApiRequest::post(format!("{}{}/respond/", REVIEWS_PATH, id))
            .json(&json!({ "host_response": response }))?;
        let review: Review = self.http.send(request).await?;
        info!(review_id = %id, "host response posted");
        Ok(review)
    }
}
