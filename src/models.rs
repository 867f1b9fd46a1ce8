// SPDX-License-Identifier: PMPL-1.0-or-later
//! Data models for registry documents

use serde::{Deserialize, Serialize};

/// Goods introduction document submitted to the registry.
///
/// Required string fields are treated as missing when blank. Dates use the
/// `yyyy-MM-dd` format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Participant description block
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Description>,
    /// Document identifier
    #[serde(default)]
    pub doc_id: String,
    /// Document status
    #[serde(default)]
    pub doc_status: String,
    /// Document type, e.g. `LP_INTRODUCE_GOODS`
    #[serde(default)]
    pub doc_type: String,
    /// Import flag
    #[serde(
        rename = "importRequest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub import_request: Option<bool>,
    /// Owner INN
    #[serde(default)]
    pub owner_inn: String,
    /// Participant INN
    #[serde(default)]
    pub participant_inn: String,
    /// Producer INN
    #[serde(default)]
    pub producer_inn: String,
    /// Production date; defaults to today when blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    /// Production type
    #[serde(default)]
    pub production_type: String,
    /// Products covered by the document
    #[serde(default)]
    pub products: Vec<Product>,
    /// Registration date; defaults to today when blank
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reg_date: Option<String>,
    /// Registration number
    #[serde(default)]
    pub reg_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    #[serde(rename = "participantInn")]
    pub participant_inn: String,
}

/// A single product line. Needs a `uit_code` or a `uitu_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate_document_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer_inn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tnved_code: Option<String>,
    /// Unit identification code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uit_code: Option<String>,
    /// Transport package identification code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uitu_code: Option<String>,
}

/// Body of a document creation request.
#[derive(Debug, Serialize)]
pub struct DocumentRequest<'a> {
    pub document: &'a Document,
    pub signature: &'a str,
}
