use std::{env, time::Duration};

use log::*;
use relay_common::Secret;

pub const DEFAULT_DATA_ENTITY: &str = "OE";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
pub struct VtexConfig {
    /// The VTEX account name, e.g. "mystore"
    pub account: String,
    /// The VTEX environment, usually "vtexcommercestable"
    pub environment: String,
    pub app_key: Secret<String>,
    pub app_token: Secret<String>,
    /// Overrides the `https://{account}.{environment}.com.br` base url. Useful for sandboxes and tests.
    pub base_url: Option<String>,
    /// The Master Data entity that replica documents are written to.
    pub data_entity: String,
    /// Applied to every request
    pub timeout: Duration,
}

impl Default for VtexConfig {
    fn default() -> Self {
        Self {
            account: String::default(),
            environment: String::default(),
            app_key: Secret::default(),
            app_token: Secret::default(),
            base_url: None,
            data_entity: DEFAULT_DATA_ENTITY.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl VtexConfig {
    pub fn new_from_env_or_default() -> Self {
        let account = env::var("VTEX_ACCOUNT").unwrap_or_else(|_| {
            error!("🪛️ VTEX_ACCOUNT is not set. Please set it to your VTEX account name.");
            String::default()
        });
        let environment = env::var("VTEX_ENVIRONMENT").unwrap_or_else(|_| {
            error!("🪛️ VTEX_ENVIRONMENT is not set. Please set it to your VTEX environment, e.g. vtexcommercestable.");
            String::default()
        });
        let app_key = Secret::new(env::var("VTEX_APP_KEY").unwrap_or_else(|_| {
            error!("🪛️ VTEX_APP_KEY is not set. The relay cannot authenticate without it.");
            String::default()
        }));
        let app_token = Secret::new(env::var("VTEX_APP_TOKEN").unwrap_or_else(|_| {
            error!("🪛️ VTEX_APP_TOKEN is not set. The relay cannot authenticate without it.");
            String::default()
        }));
        let base_url = env::var("VTEX_BASE_URL").ok().filter(|s| !s.trim().is_empty());
        if let Some(url) = &base_url {
            warn!("🪛️ VTEX_BASE_URL is set. All requests will go to {url}");
        }
        let data_entity = env::var("VTEX_DATA_ENTITY").unwrap_or_else(|_| {
            info!("🪛️ VTEX_DATA_ENTITY is not set. Using {DEFAULT_DATA_ENTITY} as default");
            DEFAULT_DATA_ENTITY.to_string()
        });
        Self { account, environment, app_key, app_token, base_url, data_entity, timeout: DEFAULT_REQUEST_TIMEOUT }
    }

    /// The names of every required configuration value that is missing or blank.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.account.trim().is_empty() {
            missing.push("VTEX_ACCOUNT");
        }
        if self.environment.trim().is_empty() {
            missing.push("VTEX_ENVIRONMENT");
        }
        if self.app_key.is_blank() {
            missing.push("VTEX_APP_KEY");
        }
        if self.app_token.is_blank() {
            missing.push("VTEX_APP_TOKEN");
        }
        missing
    }

    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}.com.br", self.account, self.environment),
        }
    }
}
