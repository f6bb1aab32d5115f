//! E2E tests: re-running analysis.

use labtrack_lib::models::UserRole;
use serde_json::json;
use uuid::Uuid;

use super::mock_analysis_service::analysis_payload;
use super::test_helpers::*;

/// FAILED record retried after the service recovers completes with unchanged raw data.
#[actix_rt::test]
async fn test_retry_after_recovery_completes() {
    let (pool, mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    mock.set_failing(true);
    let created = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["test_result"]["status"], "FAILED");

    mock.set_failing(false);
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/test-results/{}/analyze", id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["analysis_completed"], true);
    assert_eq!(body["message"], "Test result analyzed successfully");
    assert_eq!(body["test_result"]["status"], "COMPLETED");
    assert_eq!(body["test_result"]["ai_analysis"], analysis_payload());
    assert_eq!(body["test_result"]["raw_data"], json!({"wbc": 5.2}));
    assert_eq!(
        mock.last_request().unwrap(),
        json!({"test_type": "BLOOD_COUNT", "raw_data": {"wbc": 5.2}})
    );
}

/// Retrying while the service is still down leaves the record FAILED.
#[actix_rt::test]
async fn test_retry_while_failing_stays_failed() {
    let (pool, mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    mock.set_failing(true);
    let created = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/test-results/{}/analyze", id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["analysis_completed"], false);
    assert_eq!(body["message"], "AI analysis failed");
    assert_eq!(body["test_result"]["status"], "FAILED");
    assert_eq!(mock.request_count(), 2 * ANALYSIS_ATTEMPTS as usize);
}

#[actix_rt::test]
async fn test_retry_missing_record_is_not_found() {
    let (pool, _mock, app) = setup().await;
    let (_, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/test-results/{}/analyze", Uuid::now_v7()),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}
