// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Integration tests for the CRPT API client against a mock registry.

mod harness;

use crpt_api::{ApiError, ClientConfig, CrptApi, TimeUnit, TransportError};
use harness::generators;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/api/v3/lk/documents/create";

fn client(server: &MockServer, time_unit: TimeUnit, limit: u32) -> CrptApi {
    let config = ClientConfig::new(
        format!("{}/", server.uri()),
        [("Authorization", "Bearer test_token")],
        time_unit,
        limit,
    )
    .unwrap();
    CrptApi::new(config).unwrap()
}

async fn registry_responding(status: u16) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(status))
        .mount(&server)
        .await;
    server
}

async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|request| request.body_json::<Value>().unwrap())
        .collect()
}

#[tokio::test]
async fn test_create_document_sends_expected_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("content-type", "application/json"))
        .and(header("authorization", "Bearer test_token"))
        .and(body_partial_json(json!({
            "signature": "c2lnbmF0dXJl",
            "document": {
                "doc_id": "doc-7",
                "doc_type": "LP_INTRODUCE_GOODS",
                "description": {"participantInn": "7700000007"},
                "products": [{"uit_code": "01046300340700120007"}]
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let api = client(&server, TimeUnit::Second, 5);
    assert_eq!(api.base_url(), server.uri());

    let mut document = generators::valid_document(7);
    api.create_document(&mut document, "c2lnbmF0dXJl")
        .await
        .unwrap();

    server.verify().await;
    api.shutdown().await;
}

#[tokio::test]
async fn test_blank_dates_filled_before_sending() {
    let server = registry_responding(200).await;
    let api = client(&server, TimeUnit::Second, 5);
    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();

    let mut document = generators::undated_document(1);
    api.create_document(&mut document, "sig").await.unwrap();

    assert_eq!(document.production_date.as_deref(), Some(today.as_str()));
    assert_eq!(document.reg_date.as_deref(), Some(today.as_str()));

    let bodies = received_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["document"]["production_date"], today.as_str());
    assert_eq!(bodies[0]["document"]["reg_date"], today.as_str());
    api.shutdown().await;
}

#[tokio::test]
async fn test_invalid_documents_never_reach_the_network() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let api = client(&server, TimeUnit::Minute, 1);

    for (mut document, fragment) in generators::generate_invalid_documents() {
        match api.create_document(&mut document, "sig").await {
            Err(ApiError::Validation(err)) => assert!(
                err.to_string().contains(fragment),
                "{err} should mention {fragment}"
            ),
            other => panic!("expected validation error for {fragment}, got {other:?}"),
        }
    }

    assert_eq!(api.limiter().snapshot().await.issued, 0);
    server.verify().await;
    api.shutdown().await;
}

#[tokio::test]
async fn test_http_error_status_is_transport_error_and_consumes_slot() {
    let server = registry_responding(500).await;
    let api = client(&server, TimeUnit::Minute, 2);

    let mut document = generators::valid_document(0);
    let result = api.create_document(&mut document, "sig").await;

    match result {
        Err(ApiError::Transport(TransportError::Status { status, url })) => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with(ENDPOINT));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(api.limiter().snapshot().await.issued, 1);
    api.shutdown().await;
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = ClientConfig::new(
        "http://127.0.0.1:1",
        Vec::<(String, String)>::new(),
        TimeUnit::Minute,
        5,
    )
    .unwrap()
    .with_request_timeout(Duration::from_secs(2));
    let api = CrptApi::new(config).unwrap();

    let mut document = generators::valid_document(0);
    let result = api.create_document(&mut document, "sig").await;

    assert!(matches!(
        result,
        Err(ApiError::Transport(TransportError::Request(_)))
    ));
    assert_eq!(api.limiter().snapshot().await.issued, 1);
    api.shutdown().await;
}

#[tokio::test]
async fn test_one_per_second_spaces_requests() {
    let server = registry_responding(200).await;
    let api = client(&server, TimeUnit::Second, 1);

    let mut first = generators::valid_document(1);
    let mut second = generators::valid_document(2);

    let start = Instant::now();
    api.create_document(&mut first, "sig1").await.unwrap();
    api.create_document(&mut second, "sig2").await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(1000), "both calls done after {elapsed:?}");
    assert_eq!(received_bodies(&server).await.len(), 2);
    api.shutdown().await;
}

#[tokio::test]
async fn test_cancelled_submission_sends_nothing() {
    let server = registry_responding(200).await;
    let api = client(&server, TimeUnit::Minute, 1);

    let mut first = generators::valid_document(1);
    api.create_document(&mut first, "sig1").await.unwrap();

    let mut second = generators::valid_document(2);
    let result = api
        .create_document_or_cancel(
            &mut second,
            "sig2",
            tokio::time::sleep(Duration::from_millis(100)),
        )
        .await;

    assert!(matches!(result, Err(ApiError::Interrupted)));
    assert_eq!(api.limiter().snapshot().await.issued, 1);
    assert_eq!(received_bodies(&server).await.len(), 1);
    api.shutdown().await;
}

#[tokio::test]
async fn test_client_usable_after_shutdown() {
    let server = registry_responding(200).await;
    let api = client(&server, TimeUnit::Second, 2);

    api.shutdown().await;
    api.shutdown().await;

    let mut document = generators::valid_document(3);
    api.create_document(&mut document, "sig").await.unwrap();
    assert_eq!(received_bodies(&server).await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_submissions_share_one_quota() {
    let server = registry_responding(200).await;
    let api = Arc::new(client(&server, TimeUnit::Second, 3));
    let start = Instant::now();

    let handles: Vec<_> = generators::generate_documents(6)
        .into_iter()
        .map(|mut document| {
            let api = Arc::clone(&api);
            tokio::spawn(async move { api.create_document(&mut document, "sig").await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert!(start.elapsed() >= Duration::from_secs(1));
    assert_eq!(received_bodies(&server).await.len(), 6);
    api.shutdown().await;
}

#[tokio::test]
async fn test_zero_limit_rejected_at_construction() {
    let result = ClientConfig::new(
        "https://ismp.crpt.ru",
        [("Authorization", "Bearer test_token")],
        TimeUnit::Second,
        0,
    );
    assert!(matches!(result, Err(ApiError::Configuration(_))));
}
