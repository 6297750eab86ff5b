use vtex_tools::OrderDetail;

/// Accepts orders from a single sales channel (a.k.a. trade policy).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFilter {
    target: String,
}

impl ChannelFilter {
    pub fn new<S: Into<String>>(target: S) -> Self {
        Self { target: target.into() }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The order's sales channel is compared as a string, so `1` and `"1"` are the same channel.
    pub fn matches(&self, detail: &OrderDetail) -> bool {
        detail.sales_channel_label() == self.target
    }
}
