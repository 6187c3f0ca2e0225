use serde::{Deserialize, Serialize};

/// Success body of the signup and unregister endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// API error payload
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub detail: String,
}

/// `?email=` query parameter of the registration endpoints.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}
