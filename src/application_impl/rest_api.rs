use crate::infra::HttpClient;
use std::sync::Arc;

/// The REST-backed facade; one value implements every `*Api` port.
#[derive(Clone)]
pub struct RestApi {
    pub(crate) http: Arc<HttpClient>,
}

impl RestApi {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}
