// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Document validator.
//!
//! Runs before any network I/O:
//! - Required header fields must be non-blank
//! - Blank production / registration dates are filled with today's date
//! - At least one product, each with a `uit_code` or `uitu_code`

use crate::config::ValidationConfig;
use crate::models::Document;
use chrono::Local;
use thiserror::Error;
use tracing::debug;

/// Date format used by the registry.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("At least one product is required")]
    NoProducts,

    #[error("Each product must have uit_code or uitu_code (product #{index})")]
    MissingProductCode { index: usize },
}

/// Result of validation.
#[derive(Debug, Clone)]
pub enum ValidationResult {
    /// Document is valid
    Valid,
    /// Document is invalid
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<(), ValidationError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(e) => Err(e),
        }
    }
}

/// Validates documents and fills defaults before submission.
#[derive(Debug, Clone, Default)]
pub struct DocumentValidator {
    config: ValidationConfig,
}

impl DocumentValidator {
    /// Create a new validator with the given configuration.
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Fill default dates in place, then validate.
    ///
    /// Dates are filled even if a later check fails.
    pub fn prepare(&self, document: &mut Document) -> Result<(), ValidationError> {
        if let Some(missing) = required_fields(document).find(|(_, value)| is_blank(value)) {
            debug!(field = missing.0, "Document missing required field");
            return Err(ValidationError::MissingField(missing.0));
        }

        if self.config.fill_missing_dates {
            let today = today();
            fill_if_blank(&mut document.production_date, &today);
            fill_if_blank(&mut document.reg_date, &today);
        }

        self.check(document).into_result()
    }

    /// Validate without modifying the document.
    pub fn check(&self, document: &Document) -> ValidationResult {
        if let Some((field, _)) = required_fields(document).find(|(_, value)| is_blank(value)) {
            debug!(field, "Document missing required field");
            return ValidationResult::Invalid(ValidationError::MissingField(field));
        }

        if !self.config.fill_missing_dates {
            if is_blank_opt(&document.production_date) {
                return ValidationResult::Invalid(ValidationError::MissingField("production_date"));
            }
            if is_blank_opt(&document.reg_date) {
                return ValidationResult::Invalid(ValidationError::MissingField("reg_date"));
            }
        }

        if document.products.is_empty() {
            debug!(doc_id = %document.doc_id, "Document has no products");
            return ValidationResult::Invalid(ValidationError::NoProducts);
        }

        if let Some(index) = document
            .products
            .iter()
            .position(|p| is_blank_opt(&p.uit_code) && is_blank_opt(&p.uitu_code))
        {
            debug!(doc_id = %document.doc_id, index, "Product has no identification code");
            return ValidationResult::Invalid(ValidationError::MissingProductCode { index });
        }

        ValidationResult::Valid
    }
}

/// Required header fields in reporting order.
fn required_fields(document: &Document) -> impl Iterator<Item = (&'static str, &str)> {
    [
        ("doc_id", document.doc_id.as_str()),
        ("doc_status", document.doc_status.as_str()),
        ("doc_type", document.doc_type.as_str()),
        ("owner_inn", document.owner_inn.as_str()),
        ("participant_inn", document.participant_inn.as_str()),
        ("producer_inn", document.producer_inn.as_str()),
        ("production_type", document.production_type.as_str()),
        ("reg_number", document.reg_number.as_str()),
    ]
    .into_iter()
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn is_blank_opt(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, is_blank)
}

fn fill_if_blank(slot: &mut Option<String>, value: &str) {
    if is_blank_opt(slot) {
        *slot = Some(value.to_string());
    }
}

/// Today's local date in registry format.
pub fn today() -> String {
    Local::now().date_naive().format(DATE_FORMAT).to_string()
}
