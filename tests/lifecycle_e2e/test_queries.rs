//! E2E tests: reading and deleting test results.

use labtrack_lib::models::UserRole;
use serde_json::json;
use uuid::Uuid;

use super::test_helpers::*;

/// Both list routes return only the sample's results, newest first.
#[actix_rt::test]
async fn test_list_by_sample_is_filtered_and_newest_first() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_a = seed_sample(&pool, tech_id, "BC-A").await;
    let sample_b = seed_sample(&pool, tech_id, "BC-B").await;

    let first = submit_blood_count(&app, &token, sample_a, json!({"n": 1})).await;
    submit_blood_count(&app, &token, sample_b, json!({"n": 2})).await;
    let third = submit_blood_count(&app, &token, sample_a, json!({"n": 3})).await;

    let expected = vec![
        third["test_result"]["id"].clone(),
        first["test_result"]["id"].clone(),
    ];

    for uri in [
        format!("/api/v1/test-results/sample/{}", sample_a),
        format!("/api/v1/test-results?sample_id={}", sample_a),
    ] {
        let (status, body) = send(&app, "GET", &uri, Some(&token), None).await;
        assert_eq!(status, 200, "{}", uri);
        let ids: Vec<_> = body.as_array().unwrap().iter().map(|r| r["id"].clone()).collect();
        assert_eq!(ids, expected, "{}", uri);
    }

    let (status, body) = send(&app, "GET", "/api/v1/test-results", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 3);
}

/// A single result embeds its sample and creator.
#[actix_rt::test]
async fn test_get_embeds_sample() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;
    let created = submit_blood_count(&app, &token, sample_id, json!({"wbc": 5.2})).await;
    let id = created["test_result"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/test-results/{}", id),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["sample"]["barcode"], "BC-0001");
    assert_eq!(body["sample"]["created_by"]["email"], "tech@lab.test");
}

/// Missing ids are 404 NOT_FOUND, distinct from validation errors.
#[actix_rt::test]
async fn test_get_missing_is_not_found() {
    let (pool, _mock, app) = setup().await;
    let (_, token) = seed_user(&pool, "path@lab.test", UserRole::Pathologist).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/v1/test-results/{}", Uuid::now_v7()),
        Some(&token),
        None,
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().ends_with("not found"));
}

/// Deleting a result leaves its sample; a second delete is 404.
#[actix_rt::test]
async fn test_delete_then_get_is_not_found() {
    let (pool, _mock, app) = setup().await;
    let (tech_id, tech_token) = seed_user(&pool, "tech@lab.test", UserRole::Technician).await;
    let (_, admin_token) = seed_user(&pool, "admin@lab.test", UserRole::Admin).await;
    let sample_id = seed_sample(&pool, tech_id, "BC-0001").await;
    let created = submit_blood_count(&app, &tech_token, sample_id, json!({"wbc": 5.2})).await;
    let uri = format!(
        "/api/v1/test-results/{}",
        created["test_result"]["id"].as_str().unwrap()
    );

    let (status, body) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Test result deleted successfully");

    let (status, _) = send(&app, "GET", &uri, Some(&admin_token), None).await;
    assert_eq!(status, 404);

    let (status, _) = send(&app, "DELETE", &uri, Some(&admin_token), None).await;
    assert_eq!(status, 404);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/v1/samples/{}", sample_id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, 200);
}

/// A malformed id or filter is a validation error, not a not-found.
#[actix_rt::test]
async fn test_malformed_ids_are_invalid_input() {
    let (pool, _mock, app) = setup().await;
    let (_, token) = seed_user(&pool, "admin@lab.test", UserRole::Admin).await;

    let cases = [
        ("GET", "/api/v1/test-results/not-a-uuid", None),
        (
            "PUT",
            "/api/v1/test-results/not-a-uuid",
            Some(json!({"raw_data": {"wbc": 5.2}})),
        ),
        ("POST", "/api/v1/test-results/not-a-uuid/analyze", None),
        ("DELETE", "/api/v1/test-results/not-a-uuid", None),
        ("GET", "/api/v1/test-results/sample/not-a-uuid", None),
        ("GET", "/api/v1/samples/not-a-uuid", None),
        ("GET", "/api/v1/test-results?sample_id=zzz", None),
    ];

    for (method, uri, body) in cases {
        let (status, body) = send(&app, method, uri, Some(&token), body).await;
        assert_eq!(status, 400, "{} {}", method, uri);
        assert_eq!(body["error"], "INVALID_INPUT", "{} {}", method, uri);
    }
}
