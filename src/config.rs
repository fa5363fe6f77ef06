// Bayarcash client configuration
//
// Read once at startup from the environment and handed to the client by
// value. Nothing here is mutated after construction.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::{Error, Result};

const SANDBOX_V3_URL: &str = "https://api.console.bayarcash-sandbox.com/v3";
const SANDBOX_V2_URL: &str = "https://console.bayarcash-sandbox.com/api/v2";
const PRODUCTION_V3_URL: &str = "https://api.console.bayar.cash/v3";
const PRODUCTION_V2_URL: &str = "https://console.bayar.cash/api/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiVersion {
    V2,
    #[default]
    V3,
}

impl FromStr for ApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "v2" => Ok(ApiVersion::V2),
            "v3" => Ok(ApiVersion::V3),
            other => Err(Error::Config(format!(
                "unsupported BAYARCASH_API_VERSION `{}` (expected v2 or v3)",
                other
            ))),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V2 => f.write_str("v2"),
            ApiVersion::V3 => f.write_str("v3"),
        }
    }
}

pub struct BayarcashConfig {
    /// Bearer token sent on every upstream request
    pub api_token: SecretString,
    /// HMAC key for payment intent and callback checksums
    pub api_secret_key: SecretString,
    pub use_sandbox: bool,
    pub api_version: ApiVersion,
    /// Replaces the sandbox/production URL when set
    pub base_url_override: Option<String>,
    pub timeout: Duration,
}

impl fmt::Debug for BayarcashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BayarcashConfig")
            .field("api_token", &"[REDACTED]")
            .field("api_secret_key", &"[REDACTED]")
            .field("use_sandbox", &self.use_sandbox)
            .field("api_version", &self.api_version)
            .field("base_url_override", &self.base_url_override)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl BayarcashConfig {
    /// Sandbox, API v3, default timeout.
    pub fn new(api_token: impl Into<String>, api_secret_key: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token.into()),
            api_secret_key: SecretString::new(api_secret_key.into()),
            use_sandbox: true,
            api_version: ApiVersion::default(),
            base_url_override: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    Error::Config(
                        "BAYARCASH_API_TOKEN and BAYARCASH_API_SECRET_KEY environment variables are required"
                            .to_string(),
                    )
                })
        };

        let api_token = required("BAYARCASH_API_TOKEN")?;
        let api_secret_key = required("BAYARCASH_API_SECRET_KEY")?;

        // Anything but an explicit "false" keeps the sandbox
        let use_sandbox = lookup("BAYARCASH_SANDBOX")
            .map(|v| v.trim() != "false")
            .unwrap_or(true);

        let api_version = match lookup("BAYARCASH_API_VERSION") {
            Some(v) if !v.trim().is_empty() => v.parse()?,
            _ => ApiVersion::default(),
        };

        let timeout_secs = match lookup("BAYARCASH_TIMEOUT_SECS") {
            Some(v) => v.trim().parse::<u64>().map_err(|_| {
                Error::Config(format!("invalid BAYARCASH_TIMEOUT_SECS `{}`", v))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_token: SecretString::new(api_token),
            api_secret_key: SecretString::new(api_secret_key),
            use_sandbox,
            api_version,
            base_url_override: lookup("BAYARCASH_BASE_URL").filter(|v| !v.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url_override = Some(base_url.into());
        self
    }

    /// Upstream base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        if let Some(url) = &self.base_url_override {
            return url.trim_end_matches('/').to_string();
        }
        let url = match (self.use_sandbox, self.api_version) {
            (true, ApiVersion::V3) => SANDBOX_V3_URL,
            (true, ApiVersion::V2) => SANDBOX_V2_URL,
            (false, ApiVersion::V3) => PRODUCTION_V3_URL,
            (false, ApiVersion::V2) => PRODUCTION_V2_URL,
        };
        url.to_string()
    }
}
