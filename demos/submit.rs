// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submit a batch of documents through one rate-limited client.
//!
//! Configuration is loaded from environment variables:
//!
//! - `CRPT_BASE_URL`: registry base URL (default: https://ismp.crpt.ru)
//! - `CRPT_TIME_UNIT`: SECOND, MINUTE or HOUR (default: SECOND)
//! - `CRPT_REQUEST_LIMIT`: requests per time unit (default: 1)
//! - `CRPT_TOKEN`: bearer token sent with every request
//! - `CRPT_DOCUMENT_COUNT`: how many sample documents to send (default: 3)
//!
//! Run with `cargo run --example submit`. Ctrl+C cancels documents still
//! waiting for a request slot.

use crpt_api::{ApiError, ClientConfig, CrptApi, Document, Product};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Ok(token) = std::env::var("CRPT_TOKEN") {
        config = config.with_header("Authorization", format!("Bearer {token}"));
    }
    let count: usize = std::env::var("CRPT_DOCUMENT_COUNT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3);

    info!(
        base_url = %config.base_url,
        time_unit = %config.rate_limit.time_unit,
        request_limit = config.rate_limit.request_limit,
        count,
        "Submitting documents"
    );

    let api = Arc::new(CrptApi::new(config)?);

    let handles: Vec<_> = (0..count)
        .map(|i| {
            let api = Arc::clone(&api);
            tokio::spawn(async move {
                let mut document = sample_document(i);
                let cancel = async {
                    let _ = tokio::signal::ctrl_c().await;
                };
                let result = api
                    .create_document_or_cancel(&mut document, "<detached signature>", cancel)
                    .await;
                (document.doc_id, result)
            })
        })
        .collect();

    for handle in handles {
        let (doc_id, result) = handle.await?;
        match result {
            Ok(()) => info!(%doc_id, "Document accepted"),
            Err(ApiError::Interrupted) => warn!(%doc_id, "Document cancelled before sending"),
            Err(e) => warn!(%doc_id, error = %e, "Document failed"),
        }
    }

    api.shutdown().await;
    Ok(())
}

fn sample_document(index: usize) -> Document {
    Document {
        doc_id: format!("demo-{index}"),
        doc_status: "NEW".to_string(),
        doc_type: "LP_INTRODUCE_GOODS".to_string(),
        owner_inn: "7700000000".to_string(),
        participant_inn: "7700000000".to_string(),
        producer_inn: "7700000000".to_string(),
        production_type: "OWN_PRODUCTION".to_string(),
        reg_number: format!("demo-reg-{index}"),
        products: vec![Product {
            tnved_code: Some("6401990000".to_string()),
            uit_code: Some(format!("010463003407001{index:05}")),
            ..Default::default()
        }],
        ..Default::default()
    }
}
