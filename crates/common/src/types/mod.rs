use serde::{Deserialize, Serialize};

/// Liveness reply for `GET /api/ping`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Pong {
    pub message: String,
}

impl Default for Pong {
    fn default() -> Self {
        Self { message: "pong".into() }
    }
}

/// Plain acknowledgement body, e.g. after a delete.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
