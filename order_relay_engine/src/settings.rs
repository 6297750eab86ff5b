use std::time::Duration;

pub const DEFAULT_ORDER_STATUS: &str = "ready-for-handling";
pub const DEFAULT_TARGET_SALES_CHANNEL: &str = "1";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1800);
pub const DEFAULT_RECOVERY_INTERVAL: Duration = Duration::from_secs(60);

/// Everything the worker needs to know about *what* to relay and *how often*.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    /// Only orders in this status are listed.
    pub order_status: String,
    /// Orders from any other sales channel are skipped for good.
    pub target_sales_channel: String,
    /// Pause between polling rounds
    pub poll_interval: Duration,
    /// Pause after a round fails, independent of `poll_interval`
    pub recovery_interval: Duration,
    /// The relay only ever reads this one page of the order list.
    pub page: u32,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            order_status: DEFAULT_ORDER_STATUS.to_string(),
            target_sales_channel: DEFAULT_TARGET_SALES_CHANNEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            recovery_interval: DEFAULT_RECOVERY_INTERVAL,
            page: 1,
        }
    }
}

impl RelaySettings {
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_recovery_interval(mut self, interval: Duration) -> Self {
        self.recovery_interval = interval;
        self
    }

    pub fn with_target_sales_channel<S: Into<String>>(mut self, channel: S) -> Self {
        self.target_sales_channel = channel.into();
        self
    }
}
