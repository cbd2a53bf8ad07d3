use serde::{Deserialize, Serialize};

/// Row identifier shared by every table (`SERIAL` in Postgres)
pub type Id = i32;

/// Body returned by every successful write endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}
