//! Server configuration, read from environment variables.
//!
//! | Variable                    | Default                  |
//! |-----------------------------|--------------------------|
//! | `RELAY_HOST`                | `127.0.0.1`              |
//! | `RELAY_PORT`                | `8460`                   |
//! | `RELAY_PROCESSED_FILE`      | `processed_orders.json`  |
//! | `RELAY_AUTOSTART`           | `true`                   |
//! | `VTEX_ORDER_STATUS`         | `ready-for-handling`     |
//! | `VTEX_TARGET_SALES_CHANNEL` | `1`                      |
//! | `VTEX_SLEEP_TIME_SECONDS`   | `1800`                   |
//!
//! The VTEX connection itself is configured by [`VtexConfig`].
use std::{env, path::PathBuf, time::Duration};

use log::*;
use order_relay_engine::{
    settings::{DEFAULT_ORDER_STATUS, DEFAULT_POLL_INTERVAL, DEFAULT_TARGET_SALES_CHANNEL},
    RelaySettings,
};
use relay_common::parse_boolean_flag;
use vtex_tools::VtexConfig;

const DEFAULT_RELAY_HOST: &str = "127.0.0.1";
const DEFAULT_RELAY_PORT: u16 = 8460;
const DEFAULT_PROCESSED_FILE: &str = "processed_orders.json";

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Where the processed order ids are persisted.
    pub processed_file: PathBuf,
    /// Start polling as soon as the server is up.
    pub autostart: bool,
    pub order_status: String,
    pub target_sales_channel: String,
    pub poll_interval: Duration,
    pub vtex: VtexConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RELAY_HOST.to_string(),
            port: DEFAULT_RELAY_PORT,
            processed_file: PathBuf::from(DEFAULT_PROCESSED_FILE),
            autostart: true,
            order_status: DEFAULT_ORDER_STATUS.to_string(),
            target_sales_channel: DEFAULT_TARGET_SALES_CHANNEL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            vtex: VtexConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_env_or_default() -> Self {
        let host = env::var("RELAY_HOST").ok().unwrap_or_else(|| DEFAULT_RELAY_HOST.into());
        let port = env::var("RELAY_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for RELAY_PORT. {e} Using the default, {DEFAULT_RELAY_PORT}, \
                         instead."
                    );
                    DEFAULT_RELAY_PORT
                })
            })
            .unwrap_or(DEFAULT_RELAY_PORT);
        let processed_file = env::var("RELAY_PROCESSED_FILE")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                info!("🪛️ RELAY_PROCESSED_FILE is not set. Using {DEFAULT_PROCESSED_FILE} as default");
                PathBuf::from(DEFAULT_PROCESSED_FILE)
            });
        let autostart = parse_boolean_flag(env::var("RELAY_AUTOSTART").ok(), true);
        let order_status = env::var("VTEX_ORDER_STATUS").ok().filter(|s| !s.trim().is_empty()).unwrap_or_else(|| {
            info!("🪛️ VTEX_ORDER_STATUS is not set. Polling for '{DEFAULT_ORDER_STATUS}' orders");
            DEFAULT_ORDER_STATUS.to_string()
        });
        let target_sales_channel = env::var("VTEX_TARGET_SALES_CHANNEL").unwrap_or_else(|_| {
            info!("🪛️ VTEX_TARGET_SALES_CHANNEL is not set. Using '{DEFAULT_TARGET_SALES_CHANNEL}' as default");
            DEFAULT_TARGET_SALES_CHANNEL.to_string()
        });
        let poll_interval = configure_poll_interval(env::var("VTEX_SLEEP_TIME_SECONDS").ok());
        let vtex = VtexConfig::new_from_env_or_default();
        Self { host, port, processed_file, autostart, order_status, target_sales_channel, poll_interval, vtex }
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            order_status: self.order_status.clone(),
            target_sales_channel: self.target_sales_channel.clone(),
            poll_interval: self.poll_interval,
            ..Default::default()
        }
    }
}

fn configure_poll_interval(value: Option<String>) -> Duration {
    let default_secs = DEFAULT_POLL_INTERVAL.as_secs();
    match value.map(|s| s.trim().parse::<u64>()) {
        None => {
            info!("🪛️ VTEX_SLEEP_TIME_SECONDS is not set. Polling every {default_secs} seconds");
            DEFAULT_POLL_INTERVAL
        },
        Some(Ok(0)) => {
            warn!("🪛️ VTEX_SLEEP_TIME_SECONDS must be at least 1. Using the default, {default_secs}, instead.");
            DEFAULT_POLL_INTERVAL
        },
        Some(Ok(secs)) => Duration::from_secs(secs),
        Some(Err(e)) => {
            error!(
                "🪛️ Invalid value for VTEX_SLEEP_TIME_SECONDS. {e} Using the default, {default_secs}, instead."
            );
            DEFAULT_POLL_INTERVAL
        },
    }
}
