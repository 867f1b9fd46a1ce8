// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! CRPT API Client
//!
//! This crate submits goods introduction documents to the CRPT registry
//! while keeping outbound traffic inside the server's quota:
//!
//! - At most N requests per second, minute or hour
//! - Callers over the quota wait for the next window instead of failing
//! - Waits can be cancelled without consuming a slot
//! - Required-field validation and date defaults before any network I/O
//!
//! ```no_run
//! use crpt_api::{ClientConfig, CrptApi, Document, TimeUnit};
//!
//! # async fn run(mut document: Document) -> crpt_api::Result<()> {
//! let config = ClientConfig::new(
//!     "https://ismp.crpt.ru",
//!     [("Authorization", "Bearer <token>")],
//!     TimeUnit::Second,
//!     5,
//! )?;
//! let api = CrptApi::new(config)?;
//! api.create_document(&mut document, "<base64 signature>").await?;
//! api.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod limiter;
pub mod models;
pub mod resetter;
pub mod validator;

pub use client::CrptApi;
pub use config::{ClientConfig, RateLimitConfig, TimeUnit, ValidationConfig};
pub use error::{ApiError, Result, TransportError};
pub use limiter::{RateLimiter, WindowSnapshot};
pub use models::{Description, Document, Product};
pub use validator::{DocumentValidator, ValidationError, ValidationResult};
