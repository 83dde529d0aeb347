//! Dashboard configuration and resource URL templates.
//!
//! The backing JSON files are served either from the site root (local
//! development) or from a deployment sub-path (production). Which one applies
//! is decided from the host the dashboard is served from.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Instrument selected when nothing else has been chosen.
pub const DEFAULT_INSTRUMENT: &str = "IPSA";

/// Sub-path the production deployment serves its data from.
pub const PRODUCTION_BASE_PATH: &str = "/live-markets-prueba-tecnica";

const CONSTITUENTS_PATH: &str = "/data/constituyentes/constituensList.json";

/// Where the data files are being served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deployment {
    Local,
    Production,
}

impl Deployment {
    /// Classify a host name. Anything that is not a loopback name is production.
    pub fn detect(host: &str) -> Self {
        let host = host.trim().trim_start_matches('[').trim_end_matches(']');
        if host.eq_ignore_ascii_case("localhost") || host == "127.0.0.1" || host == "::1" {
            Self::Local
        } else {
            Self::Production
        }
    }

    pub const fn base_path(self) -> &'static str {
        match self {
            Self::Local => "",
            Self::Production => PRODUCTION_BASE_PATH,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Production => "production",
        }
    }
}

impl Display for Deployment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Runtime configuration consumed by every state container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Scheme and authority, e.g. `http://localhost:5173`. No trailing slash.
    pub origin: String,
    pub deployment: Deployment,
    pub base_path: String,
    pub default_instrument: String,
    pub request_timeout_ms: u64,
    /// Simulated latency applied after a successful status, before parsing.
    pub artificial_delay_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            origin: String::new(),
            deployment: Deployment::Local,
            base_path: String::new(),
            default_instrument: String::from(DEFAULT_INSTRUMENT),
            request_timeout_ms: 10_000,
            artificial_delay_ms: 0,
        }
    }
}

impl DashboardConfig {
    /// Build a configuration for `origin`, detecting the deployment from its host.
    pub fn for_origin(origin: &str) -> Result<Self, ValidationError> {
        let parsed = reqwest::Url::parse(origin).map_err(|_| ValidationError::InvalidOrigin {
            value: origin.to_owned(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ValidationError::InvalidOrigin {
                value: origin.to_owned(),
            });
        }
        let host = parsed.host_str().ok_or_else(|| ValidationError::InvalidOrigin {
            value: origin.to_owned(),
        })?;

        let deployment = Deployment::detect(host);
        Ok(Self {
            origin: origin.trim_end_matches('/').to_owned(),
            deployment,
            base_path: deployment.base_path().to_owned(),
            ..Self::default()
        })
    }

    /// Re-run deployment detection against an explicit host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.deployment = Deployment::detect(host);
        self.base_path = self.deployment.base_path().to_owned();
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_default_instrument(mut self, instrument: impl Into<String>) -> Self {
        self.default_instrument = instrument.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    pub fn with_artificial_delay_ms(mut self, delay_ms: u64) -> Self {
        self.artificial_delay_ms = delay_ms;
        self
    }

    pub fn constituents_url(&self) -> String {
        self.resolve(CONSTITUENTS_PATH)
    }

    pub fn summary_url(&self, instrument: &str) -> String {
        self.resolve(&format!(
            "/data/resumen/{}.json",
            urlencoding::encode(instrument)
        ))
    }

    pub fn history_url(&self, instrument: &str) -> String {
        self.resolve(&format!(
            "/data/history/history-{}.json",
            urlencoding::encode(instrument)
        ))
    }

    fn resolve(&self, path: &str) -> String {
        format!("{}{}{}", self.origin, self.base_path, path)
    }
}
