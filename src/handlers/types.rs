//! # Common API Types
//!
//! Success envelope shared by every endpoint, also decoded by the client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Success envelope wrapping the payload of every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Always `true` for successful responses
    pub success: bool,
    /// Human-readable outcome
    pub message: String,
    /// Endpoint payload
    pub data: T,
    /// Number of items in `data`, list endpoints only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
    /// Time the response was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl<T> ApiResponse<T> {
    /// Create a success envelope without total or timestamp
    pub fn new<S: Into<String>>(message: S, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
            total: None,
            timestamp: None,
        }
    }

    /// Stamp the envelope with the current time
    pub fn with_timestamp(mut self) -> Self {
        self.timestamp = Some(Utc::now());
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Create a list envelope with `total` and `timestamp` filled in
    pub fn list<S: Into<String>>(message: S, data: Vec<T>) -> Self {
        let total = data.len();
        Self {
            total: Some(total),
            ..Self::new(message, data)
        }
        .with_timestamp()
    }
}
