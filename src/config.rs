// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the CRPT API client.
//!
//! Defaults target the production registry at `https://ismp.crpt.ru` with
//! the most conservative quota (one request per second).

use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Length of one rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
}

impl TimeUnit {
    /// Duration of a single unit.
    pub fn as_duration(self) -> Duration {
        match self {
            Self::Second => Duration::from_secs(1),
            Self::Minute => Duration::from_secs(60),
            Self::Hour => Duration::from_secs(3600),
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Second => write!(f, "SECOND"),
            Self::Minute => write!(f, "MINUTE"),
            Self::Hour => write!(f, "HOUR"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SECOND" => Ok(Self::Second),
            "MINUTE" => Ok(Self::Minute),
            "HOUR" => Ok(Self::Hour),
            other => Err(ApiError::config(format!(
                "unknown time unit {other:?}, expected SECOND, MINUTE or HOUR"
            ))),
        }
    }
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Registry base URL; a trailing slash is stripped (default: https://ismp.crpt.ru)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Headers applied to every request
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,

    /// Outbound request quota
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Document validation behaviour
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Per-request timeout in milliseconds (default: 30000)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

/// Outbound request quota: `request_limit` requests per `time_unit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length (default: SECOND)
    #[serde(default = "default_time_unit")]
    pub time_unit: TimeUnit,

    /// Maximum requests per window, must be positive (default: 1)
    #[serde(default = "default_request_limit")]
    pub request_limit: u32,
}

/// Validation configuration for outgoing documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Fill blank `production_date` / `reg_date` with today's date (default: true)
    #[serde(default = "default_true")]
    pub fill_missing_dates: bool,
}

fn default_base_url() -> String {
    "https://ismp.crpt.ru".to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_time_unit() -> TimeUnit {
    TimeUnit::Second
}

fn default_request_limit() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_headers: BTreeMap::new(),
            rate_limit: RateLimitConfig::default(),
            validation: ValidationConfig::default(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            time_unit: default_time_unit(),
            request_limit: default_request_limit(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            fill_missing_dates: default_true(),
        }
    }
}

impl RateLimitConfig {
    /// Create a quota of `request_limit` requests per `time_unit`.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if `request_limit` is zero.
    pub fn new(time_unit: TimeUnit, request_limit: u32) -> Result<Self> {
        let config = Self {
            time_unit,
            request_limit,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_limit == 0 {
            return Err(ApiError::config("request_limit must be positive"));
        }
        Ok(())
    }

    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        self.time_unit.as_duration()
    }
}

impl ClientConfig {
    /// Build a configuration from the four construction parameters.
    ///
    /// # Errors
    /// Returns [`ApiError::Configuration`] if `request_limit` is zero.
    pub fn new<I, K, V>(
        base_url: impl Into<String>,
        default_headers: I,
        time_unit: TimeUnit,
        request_limit: u32,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Ok(Self {
            base_url: base_url.into(),
            default_headers: default_headers
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            rate_limit: RateLimitConfig::new(time_unit, request_limit)?,
            ..Default::default()
        })
    }

    /// Add or replace a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Get the per-request timeout
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Load configuration from environment variables.
    ///
    /// - `CRPT_BASE_URL`: registry base URL (default: https://ismp.crpt.ru)
    /// - `CRPT_TIME_UNIT`: SECOND, MINUTE or HOUR (default: SECOND)
    /// - `CRPT_REQUEST_LIMIT`: requests per time unit (default: 1)
    /// - `CRPT_REQUEST_TIMEOUT_MS`: per-request timeout (default: 30000)
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = lookup("CRPT_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(unit) = lookup("CRPT_TIME_UNIT") {
            config.rate_limit.time_unit = unit.parse()?;
        }
        if let Some(limit) = lookup("CRPT_REQUEST_LIMIT") {
            config.rate_limit.request_limit = limit.trim().parse().map_err(|_| {
                ApiError::config(format!(
                    "CRPT_REQUEST_LIMIT must be a positive integer, got {limit:?}"
                ))
            })?;
        }
        if let Some(timeout) = lookup("CRPT_REQUEST_TIMEOUT_MS") {
            config.request_timeout_ms = timeout.trim().parse().map_err(|_| {
                ApiError::config(format!(
                    "CRPT_REQUEST_TIMEOUT_MS must be an integer, got {timeout:?}"
                ))
            })?;
        }

        config.rate_limit.validate()?;
        Ok(config)
    }
}
