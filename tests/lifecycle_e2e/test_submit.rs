//! E2E tests: submitting test results.

use labtrack_lib::models::UserRole;
use serde_json::json;
use uuid::Uuid;

use super::mock_analysis_service::analysis_payload;
use super::test_helpers::*;

/// Healthy service: record completes with the service's document.
#[actix_rt::test]
async fn test_submit_with_healthy_service_completes() {
    let (pool, mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    let body = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;

    assert_eq!(body["analysis_completed"], true);
    assert_eq!(body["message"], "Test result created and analyzed successfully");
    let result = &body["test_result"];
    assert_eq!(result["status"], "COMPLETED");
    assert_eq!(result["test_type"], "BLOOD_COUNT");
    assert_eq!(result["raw_data"], json!({"wbc": 5.2}));
    assert_eq!(result["ai_analysis"], analysis_payload());

    assert_eq!(mock.request_count(), 1);
    assert_eq!(
        mock.last_request().unwrap(),
        json!({"test_type": "BLOOD_COUNT", "raw_data": {"wbc": 5.2}})
    );
}

/// Failing service: still 201, record FAILED with raw data intact.
#[actix_rt::test]
async fn test_submit_with_failing_service_marks_failed() {
    let (pool, mock, app) = setup().await;
    mock.set_failing(true);
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    let body = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;

    assert_eq!(body["analysis_completed"], false);
    assert_eq!(body["message"], "Test result created but AI analysis failed");
    let result = &body["test_result"];
    assert_eq!(result["status"], "FAILED");
    assert_eq!(result["raw_data"], json!({"wbc": 5.2}));
    assert!(result.get("ai_analysis").is_none());

    // The client retried up to its attempt limit
    assert_eq!(mock.request_count(), ANALYSIS_ATTEMPTS as usize);

    let id = result["id"].as_str().unwrap();
    let (status, stored) = send(
        &app,
        "GET",
        &format!("/api/v1/test-results/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(stored["status"], "FAILED");
    assert_eq!(stored["test_type"], "BLOOD_COUNT");
    assert_eq!(stored["raw_data"], json!({"wbc": 5.2}));
}

/// Unknown sample is a validation error and nothing is analyzed.
#[actix_rt::test]
async fn test_submit_for_unknown_sample_is_rejected() {
    let (pool, mock, app) = setup().await;
    let (_, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/test-results",
        Some(&token),
        Some(json!({
            "sample_id": Uuid::now_v7(),
            "test_type": "BLOOD_COUNT",
            "raw_data": {"wbc": 5.2}
        })),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
    assert_eq!(mock.request_count(), 0);
}

/// Unknown test type and non-object raw data are rejected at the boundary.
#[actix_rt::test]
async fn test_submit_rejects_invalid_payloads() {
    let (pool, mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/test-results",
        Some(&token),
        Some(json!({
            "sample_id": sample_id,
            "test_type": "XRAY",
            "raw_data": {}
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/test-results",
        Some(&token),
        Some(json!({
            "sample_id": sample_id,
            "test_type": "URINALYSIS",
            "raw_data": "ph=6.5"
        })),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(mock.request_count(), 0);
}

/// camelCase request fields are accepted.
#[actix_rt::test]
async fn test_submit_accepts_camel_case_fields() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/test-results",
        Some(&token),
        Some(json!({
            "sampleId": sample_id,
            "testType": "URINALYSIS",
            "rawData": {"ph": 6.5}
        })),
    )
    .await;

    assert_eq!(status, 201, "{}", body);
    assert_eq!(body["test_result"]["test_type"], "URINALYSIS");
    assert_eq!(body["test_result"]["sample_id"], json!(sample_id));
}
