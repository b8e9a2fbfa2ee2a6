//! HTTP routing integration tests

mod helpers;

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use accessflow_hub::analysis::{ANALYSIS_NOT_CONFIGURED, POLICY_NOT_CONFIGURED};
use accessflow_hub::build_router;
use helpers::test_app_state;

async fn send(app: axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

async fn post(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    send(app, "POST", uri, None).await
}

#[tokio::test]
async fn test_health() {
    let app = build_router(test_app_state());
    let (status, body) = get(app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "accessflow-hub");
    assert_eq!(body["analysis_configured"], false);
}

#[tokio::test]
async fn test_branch_lookup() {
    let app = build_router(test_app_state());

    let (status, body) = get(app.clone(), "/branches").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 5);

    let (status, body) = get(app.clone(), "/branches/b4").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Harbor Warehouse");
    assert_eq!(body["status"], "Maintenance");
    assert_eq!(body["tenantCount"], 2);

    let (status, body) = get(app, "/branches/b9").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_devices_filtered_by_branch() {
    let app = build_router(test_app_state());

    let (_, all) = get(app.clone(), "/devices").await;
    assert_eq!(all.as_array().unwrap().len(), 5);

    let (status, b1) = get(app.clone(), "/devices?branch_id=b1").await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = b1.as_array().unwrap().iter().map(|d| d["id"].clone()).collect();
    assert_eq!(ids, vec![json!("d1"), json!("d3"), json!("d5")]);

    let (status, _) = get(app, "/devices?branch_id=nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_device_type_labels() {
    let app = build_router(test_app_state());
    let (_, devices) = get(app, "/devices").await;
    assert_eq!(devices[0]["type"], "ZKTeco FaceDepot");
    assert_eq!(devices[2]["type"], "TTLock Smart Lock");
}

#[tokio::test]
async fn test_tenants_and_users() {
    let app = build_router(test_app_state());

    let (_, tenants) = get(app.clone(), "/tenants").await;
    assert_eq!(tenants.as_array().unwrap().len(), 3);
    assert_eq!(tenants[0]["companyName"], "TechCorp Solutions");

    let (_, users) = get(app, "/users").await;
    assert_eq!(users.as_array().unwrap().len(), 3);
    assert_eq!(users[1]["name"], "Sarah Connor");
}

#[tokio::test]
async fn test_dashboard_stats_from_fixtures() {
    let app = build_router(test_app_state());
    let (status, stats) = get(app, "/dashboard/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_tenants"], 51);
    assert_eq!(stats["registered_tenants"], 3);
    assert_eq!(stats["total_devices"], 165);
    assert_eq!(stats["online_devices"], 4);
    assert_eq!(stats["buffered_events"], 5);
    assert_eq!(stats["security_alerts"], 1);
    assert_eq!(stats["branches_in_maintenance"], 1);
}

#[tokio::test]
async fn test_logs_newest_first_with_limit() {
    let app = build_router(test_app_state());

    let (_, logs) = get(app.clone(), "/logs").await;
    let ids: Vec<_> = logs.as_array().unwrap().iter().map(|e| e["id"].clone()).collect();
    assert_eq!(ids, vec![json!("l5"), json!("l4"), json!("l3"), json!("l2"), json!("l1")]);

    let (_, limited) = get(app, "/logs?limit=2").await;
    let limited = limited.as_array().unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[1]["event"], "Denied");
    assert_eq!(limited[1]["deviceName"], "Warehouse Gate A");
}

#[tokio::test]
async fn test_analysis_without_key() {
    let app = build_router(test_app_state());

    let (_, before) = get(app.clone(), "/analysis").await;
    assert_eq!(before["busy"], false);
    assert!(before["report"].is_null());

    let (status, run) = post(app.clone(), "/analysis").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(run["report"]["status"], "not_configured");
    assert_eq!(run["report"]["text"], ANALYSIS_NOT_CONFIGURED);

    let (_, after) = get(app, "/analysis").await;
    assert_eq!(after["busy"], false);
    assert_eq!(after["report"]["text"], ANALYSIS_NOT_CONFIGURED);
}

#[tokio::test]
async fn test_policy_validation_and_fallback() {
    let app = build_router(test_app_state());

    let (status, body) = send(
        app.clone(),
        "POST",
        "/policy",
        Some(json!({"tenant_name": "TechCorp Solutions", "resource": "Office 302"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["policy"], POLICY_NOT_CONFIGURED);

    let (status, body) = send(
        app,
        "POST",
        "/policy",
        Some(json!({"tenant_name": " ", "resource": "Office 302"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test(start_paused = true)]
async fn test_enrollment_routes() {
    let state = test_app_state();
    let app = build_router(state.clone());

    let (_, snapshot) = get(app.clone(), "/enrollment").await;
    assert_eq!(snapshot["stage"], "capture");
    assert_eq!(snapshot["open"], false);

    let (_, opened) = post(app.clone(), "/enrollment/open").await;
    assert_eq!(opened["applied"], true);
    assert_eq!(opened["snapshot"]["open"], true);

    let (_, retake) = post(app.clone(), "/enrollment/retake").await;
    assert_eq!(retake["applied"], false);

    let (_, captured) = post(app.clone(), "/enrollment/capture").await;
    assert_eq!(captured["applied"], true);
    assert_eq!(captured["snapshot"]["stage"], "preview");
    assert_eq!(captured["snapshot"]["has_sample"], true);

    let (_, accepted) = post(app.clone(), "/enrollment/accept").await;
    assert_eq!(accepted["snapshot"]["stage"], "processing");
    assert_eq!(accepted["snapshot"]["progress_percent"], 0);

    tokio::time::sleep(Duration::from_millis(650)).await;
    let (_, mid) = get(app.clone(), "/enrollment").await;
    assert_eq!(mid["progress_percent"], 20);

    let (_, closed) = post(app.clone(), "/enrollment/close").await;
    assert_eq!(closed["snapshot"]["stage"], "capture");
    assert_eq!(closed["snapshot"]["progress_percent"], 0);
    assert_eq!(closed["snapshot"]["open"], false);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(state.enrollment.snapshot().await.progress_percent, 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let app = build_router(test_app_state());
    let (status, _) = get(app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
