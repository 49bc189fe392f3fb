mod common;

use adlab::config::ReconcilerKind;
use axum::http::StatusCode;
use common::{
    CrawlScript, MockUpstream, app_with, delete_req, get_req, json_body, patch_json, post_json,
    send,
};
use serde_json::json;
use std::sync::atomic::Ordering;

#[tokio::test]
async fn crawled_material_is_analyzed_and_stored() {
    let mock = MockUpstream::with_headlines(&[]);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/materials",
            json!({ "url": "https://acme.test", "material_type": "branding", "user_id": "u-1" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 2);

    let stored = mock.stored("brand_materials");
    assert_eq!(stored.len(), 1);
    let row = &stored[0];
    assert_eq!(row["crawled_urls"].as_array().map(Vec::len), Some(3));
    assert!(
        !row["content_rules"]
            .as_array()
            .expect("content_rules array")
            .is_empty()
    );
    assert_eq!(row["material_type"], "branding");
    assert_eq!(row["user_id"], "u-1");

    let material = json_body(&body);
    assert_eq!(material["id"], "row-1");
    assert_eq!(material["summary"], "Acme sells anvils to cartoon coyotes.");
    assert_eq!(material["content_rules"][0]["type"], "tone");

    let (status, body) = send(&app, get_req("/api/materials?user_id=u-1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body).as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn material_requires_a_valid_url() {
    let mock = MockUpstream::with_headlines(&[]);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    for url in ["", "not a url"] {
        let (status, _) = send(&app, post_json("/api/materials", json!({ "url": url }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn rules_are_created_and_listed() {
    let mock = MockUpstream::with_headlines(&[]);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/rules",
            json!({ "type": "length", "name": "Short", "description": "Under 40 chars", "value": "40" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json_body(&body)["id"], "row-1");

    let (status, _) = send(&app, post_json("/api/rules", json!({ "type": "", "name": "x" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, get_req("/api/rules")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_body(&body)[0]["name"], "Short");
}

async fn create_material(app: &axum::Router) -> (StatusCode, serde_json::Value) {
    let req = post_json("/api/materials", json!({ "url": "https://acme.test" }));
    let (status, body) = send(app, req).await;
    (status, json_body(&body))
}

#[tokio::test]
async fn failed_or_cancelled_crawl_is_a_server_error() {
    for terminal in ["failed", "cancelled"] {
        let mock = MockUpstream::with_crawl(CrawlScript::Ends(terminal));
        let app = app_with(mock.clone(), ReconcilerKind::Model).await;

        let (status, body) = create_material(&app).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{terminal}");
        assert_eq!(body, json!({ "error": "Internal server error" }));
        assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 1);
        assert_eq!(mock.chat_calls("material_analysis"), 0);
        assert!(mock.stored("brand_materials").is_empty());
    }
}

#[tokio::test]
async fn crawl_that_never_finishes_gives_up_after_max_polls() {
    let mock = MockUpstream::with_crawl(CrawlScript::NeverFinishes);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, _) = create_material(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // test_config allows five polls.
    assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 5);
    assert!(mock.stored("brand_materials").is_empty());
}

#[tokio::test]
async fn empty_result_page_stops_pagination() {
    let mock = MockUpstream::with_crawl(CrawlScript::EmptyPagesForever);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, _) = create_material(&app).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 2);

    let stored = mock.stored("brand_materials");
    assert_eq!(stored[0]["crawled_urls"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn endless_pagination_is_capped() {
    let mock = MockUpstream::with_crawl(CrawlScript::OnePagePerLinkForever);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, _) = create_material(&app).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // The completed poll plus five followed links, below the ten page limit.
    assert_eq!(mock.crawl_polls.load(Ordering::SeqCst), 6);
    assert!(mock.stored("brand_materials").is_empty());
}

#[tokio::test]
async fn materials_are_deleted_once() {
    let mock = MockUpstream::with_headlines(&[]);
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, material) = create_material(&app).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/materials/{}", material["id"].as_str().expect("id"));

    let (status, body) = send(&app, delete_req(&uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
    assert!(mock.stored("brand_materials").is_empty());

    let (status, body) = send(&app, delete_req(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({ "error": "Material not found" }));
}

#[tokio::test]
async fn rules_are_patched_and_deleted() {
    let mock = MockUpstream::with_headlines(&[]);
    mock.seed(
        "custom_rules",
        json!({
            "id": "rule-1",
            "type": "tone",
            "name": "Warm",
            "description": "Friendly",
            "value": "casual"
        }),
    );
    let app = app_with(mock.clone(), ReconcilerKind::Model).await;

    let (status, body) = send(
        &app,
        patch_json("/api/rules/rule-1", json!({ "value": "playful" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = json_body(&body);
    assert_eq!(updated["value"], "playful");
    assert_eq!(updated["name"], "Warm");
    assert_eq!(mock.stored("custom_rules")[0]["value"], "playful");

    let (status, body) = send(&app, patch_json("/api/rules/rule-1", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json_body(&body), json!({ "error": "no fields to update" }));

    let (status, body) = send(
        &app,
        patch_json("/api/rules/rule-9", json!({ "name": "Cold" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json_body(&body), json!({ "error": "Rule not found" }));

    let (status, _) = send(&app, delete_req("/api/rules/rule-1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, delete_req("/api/rules/rule-1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
