//! Server configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::irail::IrailConfig;
use crate::view::DEFAULT_STATION;

/// Default listen address.
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Error returned when an environment variable holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address to listen on (`LIVEBOARD_ADDR`)
    pub addr: SocketAddr,

    /// Station the liveboard shows before any search (`LIVEBOARD_DEFAULT_STATION`)
    pub default_station: String,

    /// iRail client settings (`IRAIL_BASE_URL`, `IRAIL_LANG`, `IRAIL_USER_AGENT`)
    pub irail: IrailConfig,

    /// Serve fixtures from this directory instead of calling iRail (`IRAIL_MOCK_DIR`)
    pub mock_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Read the configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read the configuration through `lookup`, which maps a variable name
    /// to its value. Unset and empty variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let addr_text = get("LIVEBOARD_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_text.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            var: "LIVEBOARD_ADDR",
            value: addr_text.clone(),
            reason: e.to_string(),
        })?;

        let mut irail = IrailConfig::new();
        if let Some(url) = get("IRAIL_BASE_URL") {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::Invalid {
                    var: "IRAIL_BASE_URL",
                    value: url,
                    reason: "must start with http:// or https://".to_string(),
                });
            }
            irail = irail.with_base_url(url);
        }
        if let Some(lang) = get("IRAIL_LANG") {
            irail = irail.with_lang(lang);
        }
        if let Some(user_agent) = get("IRAIL_USER_AGENT") {
            irail = irail.with_user_agent(user_agent);
        }

        Ok(Self {
            addr,
            default_station: get("LIVEBOARD_DEFAULT_STATION")
                .unwrap_or_else(|| DEFAULT_STATION.to_string()),
            irail,
            mock_dir: get("IRAIL_MOCK_DIR").map(PathBuf::from),
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            default_station: DEFAULT_STATION.to_string(),
            irail: IrailConfig::new(),
            mock_dir: None,
        }
    }
}
