use super::ApiResult;
use crate::domain_model::{ListingId, NewReview, Review, ReviewId};

#[async_trait::async_trait]
pub trait ReviewApi: Send + Sync {
    async fn list_reviews(&self, property: ListingId) -> ApiResult<Vec<Review>>;
    async fn create_review(&self, review: &NewReview) -> ApiResult<Review>;
    /// Host-only: `POST /api/reviews/{id}/respond/` with `{host_response}`.
    async fn respond_to_review(&self, id: ReviewId, response: &str) -> ApiResult<Review>;
}
