use serde::{Deserialize, Serialize};

pub const STATUS_OK: &str = "OK";
pub const STATUS_ERROR: &str = "ERROR";

/// Body of every non 2xx response
#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct APIErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl APIErrorResponse {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            status: STATUS_ERROR.into(),
            code: code.into(),
            message,
        }
    }
}
