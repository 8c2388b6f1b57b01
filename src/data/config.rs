//! Client configuration (environment + `.env`).

use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Where and how the chart endpoint is reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Chart endpoint; the symbol is appended directly.
    pub base_url: String,
    /// Optional relay prefix; the percent-encoded target URL is appended to it.
    pub relay_url: Option<String>,
    /// `None` waits for the transport indefinitely.
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            relay_url: None,
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    /// Read `QC_*` variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (empty values count as unset).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut config = Self::default();
        if let Some(base) = get("QC_BASE_URL") {
            config.base_url = base;
        }
        config.relay_url = get("QC_RELAY_URL");
        if let Some(raw) = get("QC_TIMEOUT_SECS") {
            let secs = raw
                .parse::<u64>()
                .map_err(|e| AppError::new(2, format!("Invalid QC_TIMEOUT_SECS '{raw}': {e}")))?;
            config.timeout = Some(Duration::from_secs(secs));
        }
        if let Some(agent) = get("QC_USER_AGENT") {
            config.user_agent = agent;
        }
        Ok(config)
    }

    /// Apply CLI overrides on top of the environment.
    pub fn with_overrides(mut self, base_url: Option<&str>, relay_url: Option<&str>) -> Self {
        if let Some(base) = base_url {
            self.base_url = base.to_string();
        }
        if let Some(relay) = relay_url {
            self.relay_url = Some(relay.to_string()).filter(|r| !r.is_empty());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_go_direct_without_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert!(config.relay_url.is_none());
        assert!(config.timeout.is_none());
    }

    #[test]
    fn reads_relay_and_timeout() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("QC_RELAY_URL", "https://corsproxy.io/?"),
            ("QC_TIMEOUT_SECS", "15"),
            ("QC_BASE_URL", "  "),
        ]))
        .unwrap();
        assert_eq!(config.relay_url.as_deref(), Some("https://corsproxy.io/?"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn bad_timeout_is_a_config_error() {
        let err = ClientConfig::from_lookup(lookup(&[("QC_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn empty_relay_override_disables_relay() {
        let config = ClientConfig {
            relay_url: Some("https://relay/?".to_string()),
            ..ClientConfig::default()
        }
        .with_overrides(None, Some(""));
        assert!(config.relay_url.is_none());
    }
}
