#![allow(dead_code)]

use serde_json::{Value, json};
use stayline::application_impl::RestApi;
use stayline::application_port::AuthEvents;
use stayline::domain_model::{AccessToken, RefreshToken, TokenPair};
use stayline::infra::{HttpClient, MemoryStore, TokenVault};
use std::sync::Arc;
use std::time::Duration;
use wiremock::MockServer;

pub const LOFT_ID: &str = "0b6b7b0e-6a8c-4f3e-9f61-2f7d7f1c5b11";
pub const BOOKING_ID: &str = "7f0c7d36-3f55-4c52-9a5c-2d3f2c8c2a01";

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestContext {
    pub server: MockServer,
    pub store: Arc<MemoryStore>,
    pub vault: TokenVault,
    pub events: AuthEvents,
    pub http: Arc<HttpClient>,
    pub api: RestApi,
}

impl TestContext {
    pub async fn new() -> Self {
        init_logging();
        let server = MockServer::start().await;
        let store = Arc::new(MemoryStore::new());
        let vault = TokenVault::new(store.clone());
        let events = AuthEvents::new();
        let http = Arc::new(
            HttpClient::new(
                &server.uri(),
                Duration::from_secs(5),
                vault.clone(),
                events.clone(),
            )
            .unwrap(),
        );
        let api = RestApi::new(http.clone());
        Self {
            server,
            store,
            vault,
            events,
            http,
            api,
        }
    }

    /// A context that already holds a token pair.
    pub async fn signed_in(access: &str, refresh: &str) -> Self {
        let ctx = Self::new().await;
        ctx.vault
            .save_pair(&TokenPair {
                access: AccessToken(access.to_string()),
                refresh: RefreshToken(refresh.to_string()),
            })
            .await
            .unwrap();
        ctx
    }

    pub async fn access_token(&self) -> Option<String> {
        self.vault.access_token().await.unwrap().map(|t| t.0)
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.vault.refresh_token().await.unwrap().map(|t| t.0)
    }
}

pub fn listing_json() -> Value {
    json!({
        "property_id": LOFT_ID,
        "name": "Harbour loft",
        "description": "Two rooms over the quay",
        "property_type": "apartment",
        "room_type": "entire_place",
        "city": "Cork",
        "county": "Cork",
        "bedroom": 2,
        "bathroom": 1,
        "max_guests": 4,
        "price_per_night": "100.00",
        "average_rating": "4.50",
        "review_count": 12,
    })
}

pub fn booking_json(status: &str) -> Value {
    json!({
        "booking_id": BOOKING_ID,
        "property_id": LOFT_ID,
        "start_date": "2025-06-01",
        "end_date": "2025-06-04",
        "guests_count": 2,
        "total_price": "300.00",
        "status": status,
        "created_at": "2025-05-20T09:30:00Z",
    })
}
