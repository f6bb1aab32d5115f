//! E2E tests: authentication and role guards.

use labtrack_lib::models::UserRole;
use serde_json::json;

use super::test_helpers::*;

/// No token or a bad token → 401.
#[actix_rt::test]
async fn test_missing_or_invalid_token_rejected() {
    let (_pool, _mock, app) = setup().await;

    let (status, body) = send(&app, "GET", "/api/v1/test-results", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        "GET",
        "/api/v1/test-results",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, 401);
}

/// Pathologists read but cannot submit, update or retry.
#[actix_rt::test]
async fn test_pathologist_is_read_only() {
    let (pool, mock, app) = setup().await;
    let (tech_id, tech_token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let (_, path_token) = seed_user(&pool, "path@lab.test", UserRole::Pathologist).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;
    let created = submit_blood_count(&app, &tech_token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();
    let calls_before = mock.request_count();

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/test-results/{}", id),
        Some(&path_token),
        None,
    )
    .await;
    assert_eq!(status, 200);

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/test-results",
        Some(&path_token),
        Some(json!({"sample_id": sample_id, "test_type": "BLOOD_COUNT", "raw_data": {}})),
    )
    .await;
    assert_eq!(status, 403);
    assert_eq!(body["error"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/test-results/{}", id),
        Some(&path_token),
        Some(json!({"raw_data": {"wbc": 1.0}})),
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/test-results/{}/analyze", id),
        Some(&path_token),
        None,
    )
    .await;
    assert_eq!(status, 403);

    assert_eq!(mock.request_count(), calls_before);
}

/// Only admins delete.
#[actix_rt::test]
async fn test_only_admin_deletes() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, tech_token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;
    let created = submit_blood_count(&app, &tech_token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/test-results/{}", id),
        Some(&tech_token),
        None,
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/v1/samples/{}", sample_id),
        Some(&tech_token),
        None,
    )
    .await;
    assert_eq!(status, 403);
}
