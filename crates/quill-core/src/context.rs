//! Per-request context threaded explicitly from the transport into services.

use uuid::Uuid;

/// Identifies the request a service call belongs to, for log correlation.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: String,
    pub user_id: Option<Uuid>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: Uuid) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// Context for work not triggered by a request (seeding, tests).
    pub fn background() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}
