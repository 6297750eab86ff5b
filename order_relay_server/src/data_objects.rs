use std::fmt::Display;

use order_relay_engine::RoundSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

/// Body of `GET /status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// One of `active`, `inactive` or `configuration_error`
    pub status: String,
    /// Human-readable status line, as an operator would see it
    pub message: String,
    pub processed_count: usize,
    pub order_status: String,
    pub target_sales_channel: String,
    pub poll_interval_seconds: u64,
    /// Counts from the most recent round, if one has completed since the server started
    pub last_round: Option<RoundSummary>,
}

/// Body of `GET /logs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogsResponse {
    pub lines: Vec<String>,
}
