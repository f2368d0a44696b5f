use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::validate::ValidationMode;

pub const DEFAULT_CORE_URL: &str = "https://api.frax.finance/combineddata/";
pub const DEFAULT_POOLS_URL: &str = "https://api.frax.finance/pools";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name} URL `{value}`: {reason}")]
    InvalidUrl {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

/// The two remote endpoints the dashboard reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub core_url: Url,
    pub pools_url: Url,
}

/// Runtime configuration for loading the dashboard.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub endpoints: Endpoints,
    pub timeout: Duration,
    pub mode: ValidationMode,
}

impl DashboardConfig {
    pub fn new(
        core_url: &str,
        pools_url: &str,
        timeout_secs: u64,
        strict: bool,
    ) -> Result<Self, ConfigError> {
        if timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(DashboardConfig {
            endpoints: Endpoints {
                core_url: parse_url("core", core_url)?,
                pools_url: parse_url("pools", pools_url)?,
            },
            timeout: Duration::from_secs(timeout_secs),
            mode: if strict {
                ValidationMode::Strict
            } else {
                ValidationMode::Permissive
            },
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("fraxlytics/", env!("CARGO_PKG_VERSION"))
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
