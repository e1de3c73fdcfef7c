//! Data Transfer Objects for the HTTP API
//!
//! Request bodies sent by the web client and the response envelopes the
//! server answers with. Envelopes follow the client's existing contract:
//! some routes report `status: "success"`, others `success: true`.

pub mod account;
pub mod booking;
pub mod listing;
pub mod saved;

use serde::{Deserialize, Serialize};

/// Value of the `status` field on successful responses
pub const SUCCESS: &str = "success";

/// Value of the `status` field on failed responses
pub const ERROR: &str = "error";

/// Plain acknowledgement, `{status, message?}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn success() -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: None,
        }
    }

    pub fn success_with(message: impl Into<String>) -> Self {
        Self {
            status: SUCCESS.to_string(),
            message: Some(message.into()),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ERROR.to_string(),
            message: Some(message.into()),
        }
    }
}

/// Acknowledgement for routes using the `success` flag, `{success, message}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}
