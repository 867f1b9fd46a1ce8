// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test data generators for registry documents.

use crpt_api::{Description, Document, Product};

/// A complete, valid document with dates already set.
pub fn valid_document(index: usize) -> Document {
    let inn = format!("77{:08}", index);
    Document {
        description: Some(Description {
            participant_inn: inn.clone(),
        }),
        doc_id: format!("doc-{index}"),
        doc_status: "NEW".to_string(),
        doc_type: "LP_INTRODUCE_GOODS".to_string(),
        owner_inn: inn.clone(),
        participant_inn: inn.clone(),
        producer_inn: inn.clone(),
        production_date: Some("2026-01-15".to_string()),
        production_type: "OWN_PRODUCTION".to_string(),
        products: vec![Product {
            owner_inn: Some(inn.clone()),
            producer_inn: Some(inn),
            production_date: Some("2026-01-15".to_string()),
            tnved_code: Some("6401990000".to_string()),
            uit_code: Some(format!("0104630034070012{index:04}")),
            ..Default::default()
        }],
        reg_date: Some("2026-01-16".to_string()),
        reg_number: format!("reg-{index}"),
        ..Default::default()
    }
}

/// A batch of distinct valid documents.
pub fn generate_documents(count: usize) -> Vec<Document> {
    (0..count).map(valid_document).collect()
}

/// A valid document with both dates blank.
pub fn undated_document(index: usize) -> Document {
    Document {
        production_date: None,
        reg_date: Some(String::new()),
        ..valid_document(index)
    }
}

/// Invalid documents paired with the message fragment each should report.
pub fn generate_invalid_documents() -> Vec<(Document, &'static str)> {
    let mut no_code = valid_document(0);
    no_code.products[0].uit_code = None;
    no_code.products[0].uitu_code = Some("  ".to_string());

    let mut no_products = valid_document(1);
    no_products.products.clear();

    vec![
        (Document::default(), "doc_id"),
        (
            Document {
                doc_status: String::new(),
                ..valid_document(2)
            },
            "doc_status",
        ),
        (
            Document {
                reg_number: " ".to_string(),
                ..valid_document(3)
            },
            "reg_number",
        ),
        (no_products, "At least one product"),
        (no_code, "uit_code or uitu_code"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_documents() {
        let documents = generate_documents(50);
        assert_eq!(documents.len(), 50);
        let unique: std::collections::HashSet<_> = documents.iter().map(|d| &d.doc_id).collect();
        assert_eq!(unique.len(), 50);
    }
}
