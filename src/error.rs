// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the CRPT API client

use crate::validator::ValidationError;
use thiserror::Error;

/// Client error types
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected construction parameters. Raised before any work is done.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The document failed validation; no request slot was consumed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The wait for a request slot was cancelled; no request slot was consumed.
    #[error("Interrupted while waiting for a request slot")]
    Interrupted,

    /// The request body could not be encoded; no request slot was consumed.
    #[error("Failed to encode request body: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Network or HTTP failure after a request slot was consumed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Failures of the outbound HTTP call.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{url} responded with {status}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },
}

impl ApiError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;
