//! E2E tests: replacing raw data.

use labtrack_lib::models::UserRole;
use serde_json::json;
use uuid::Uuid;

use super::mock_analysis_service::analysis_payload;
use super::test_helpers::*;

/// FAILED record updated after recovery completes; test type is kept.
#[actix_rt::test]
async fn test_update_failed_record_completes() {
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
        "PUT",
        &format!("/api/v1/test-results/{}", id),
        Some(&token),
        Some(json!({"raw_data": {"wbc": 6.8}})),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["analysis_completed"], true);
    assert_eq!(body["message"], "Test result updated and analyzed successfully");
    assert_eq!(body["test_result"]["status"], "COMPLETED");
    assert_eq!(body["test_result"]["test_type"], "BLOOD_COUNT");
    assert_eq!(body["test_result"]["raw_data"], json!({"wbc": 6.8}));
    assert_eq!(body["test_result"]["ai_analysis"], analysis_payload());
    assert_eq!(mock.last_request().unwrap()["raw_data"], json!({"wbc": 6.8}));
}

/// COMPLETED record updated while the service is down ends FAILED without the old analysis.
#[actix_rt::test]
async fn test_update_with_failing_service_drops_stale_analysis() {
    let (pool, mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;

    let created = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();

    mock.set_failing(true);
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/v1/test-results/{}", id),
        Some(&token),
        Some(json!({"rawData": {"wbc": 11.0}})),
    )
    .await;

    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["analysis_completed"], false);
    assert_eq!(body["test_result"]["status"], "FAILED");
    assert_eq!(body["test_result"]["raw_data"], json!({"wbc": 11.0}));
    assert!(body["test_result"].get("ai_analysis").is_none());
}

#[actix_rt::test]
async fn test_update_missing_record_is_not_found() {
    let (pool, mock, app) = setup().await;
    let (_, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/v1/test-results/{}", Uuid::now_v7()),
        Some(&token),
        Some(json!({"raw_data": {"wbc": 5.2}})),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
    assert_eq!(mock.request_count(), 0);
}

#[actix_rt::test]
async fn test_update_rejects_non_object_raw_data() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;
    let created = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/test-results/{}", id),
        Some(&token),
        Some(json!({"raw_data": [1, 2, 3]})),
    )
    .await;

    assert_eq!(status, 400);
}
