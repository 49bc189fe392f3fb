#![allow(dead_code)]

use adlab::config::{Config, ReconcilerKind};
use adlab::server::{AdlabState, adlab_router, cors_layer};
use axum::{
    Json, Router,
    body::{Body, to_bytes},
    extract::{Path, Query, State},
    http::{
        HeaderMap, Request, StatusCode,
        header::{CONTENT_TYPE, HOST},
    },
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

pub const API_KEY: &str = "test-key";

pub const KNOWLEDGE_SSE: &str = concat!(
    "data: {\"response\":\"<think>Compare\",\"citations\":[],\"sources\":[]}\n\n",
    "data: {\"response\":\"<think>Compare channels</think>Search\",\"citations\":[],\"sources\":[]}\n\n",
    "data: {\"response\":\"<think>Compare channels</think>Search leads.\",\"citations\":[{\"id\":\"c1\"}],\"sources\":[\"ads_2024\"]}\n\n",
    "data: [DONE]\n\n",
);

/// How the fake crawler moves a job along.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CrawlScript {
    /// One `scraping` poll, then three completed pages.
    #[default]
    Completes,
    /// The job ends with this terminal status.
    Ends(&'static str),
    /// Always `scraping`.
    NeverFinishes,
    /// Three pages, then empty result pages that keep linking to more.
    EmptyPagesForever,
    /// One page per result page, always with another `next` link.
    OnePagePerLinkForever,
}

/// What the fake hosted services answer and how often they were hit.
#[derive(Default)]
pub struct MockUpstream {
    pub headlines: Mutex<Vec<String>>,
    pub chat_calls: Mutex<Vec<String>>,
    pub ads_calls: AtomicUsize,
    pub crawl_polls: AtomicUsize,
    pub crawl_script: Mutex<CrawlScript>,
    pub stored: Mutex<HashMap<String, Vec<Value>>>,
}

impl MockUpstream {
    pub fn with_headlines(headlines: &[&str]) -> Arc<Self> {
        let mock = Self::default();
        *mock.headlines.lock().expect("lock") =
            headlines.iter().map(|h| (*h).to_string()).collect();
        Arc::new(mock)
    }

    pub fn with_crawl(script: CrawlScript) -> Arc<Self> {
        let mock = Self::default();
        *mock.crawl_script.lock().expect("lock") = script;
        Arc::new(mock)
    }

    pub fn seed(&self, table: &str, row: Value) {
        self.stored
            .lock()
            .expect("lock")
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn stored(&self, table: &str) -> Vec<Value> {
        self.stored
            .lock()
            .expect("lock")
            .get(table)
            .cloned()
            .unwrap_or_default()
    }

    pub fn chat_calls(&self, schema: &str) -> usize {
        self.chat_calls
            .lock()
            .expect("lock")
            .iter()
            .filter(|name| name.as_str() == schema)
            .count()
    }
}

fn ocr_region(text: &str, left: f64, top: f64, right: f64, bottom: f64) -> Value {
    json!({
        "text": text,
        "bounding_box": {
            "top_left": [left, top],
            "top_right": [right, top],
            "bottom_right": [right, bottom],
            "bottom_left": [left, bottom],
            "center": [(left + right) / 2.0, (top + bottom) / 2.0],
            "width": right - left,
            "height": bottom - top
        },
        "area": (right - left) * (bottom - top),
        "aspect_ratio": (right - left) / (bottom - top)
    })
}

fn structured_reply(mock: &MockUpstream, schema: &str) -> Value {
    match schema {
        "headline_list" => {
            let headlines = mock.headlines.lock().expect("lock").clone();
            json!({ "headlines": headlines })
        }
        "reconciled_regions" => json!({
            "regions": [
                ocr_region("Big Summer Sale", 10.0, 10.0, 190.0, 42.0),
                ocr_region("Free Gift Inside", 0.0, 0.0, 400.0, 400.0),
                ocr_region("Shop Now", 600.0, 600.0, 700.0, 650.0)
            ]
        }),
        "headline_variants" => json!({
            "variants": [
                {"new_headline": "Summer Savings Start Now", "rationale": "Adds urgency."},
                {"new_headline": "Save Big All Summer", "rationale": "Leads with the benefit."}
            ]
        }),
        "variant_metrics" => json!({
            "impressions": 10000,
            "clicks": 420,
            "ctr": 0.5,
            "conversions": 21,
            "conversion_rate": 0.05,
            "confidence": 0.7
        }),
        "material_analysis" => json!({
            "summary": "Acme sells anvils to cartoon coyotes.",
            "content_rules": [
                {"type": "tone", "name": "Bold", "description": "Confident voice", "value": "bold"},
                {"type": "keyword", "name": "Brand", "description": "Always say Acme", "value": "Acme"}
            ]
        }),
        other => json!({ "unexpected_schema": other }),
    }
}

async fn chat_completions(
    State(mock): State<Arc<MockUpstream>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    let schema = body["response_format"]["json_schema"]["name"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    mock.chat_calls.lock().expect("lock").push(schema.clone());
    let content = structured_reply(&mock, &schema).to_string();
    Json(json!({
        "id": "chatcmpl-test",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
    }))
}

async fn ocr_detect(Json(_body): Json<Value>) -> Json<Value> {
    Json(json!([
        ocr_region("BIG SUMMER", 10.0, 10.0, 120.0, 40.0),
        ocr_region("SALE", 130.0, 12.0, 190.0, 42.0),
        ocr_region("Shop now", 20.0, 200.0, 100.0, 220.0),
    ]))
}

async fn crawl_submit(Json(body): Json<Value>) -> Json<Value> {
    assert_eq!(body["scrapeOptions"]["formats"], json!(["markdown"]));
    Json(json!({ "success": true, "id": "crawl-1", "url": "ignored" }))
}

fn acme_page(slug: &str) -> Value {
    json!({
        "markdown": format!("# Acme {slug}\nAnvils for every occasion."),
        "metadata": {
            "sourceURL": format!("https://acme.test/{slug}"),
            "title": format!("Acme {slug}")
        }
    })
}

fn acme_pages() -> Vec<Value> {
    ["", "about", "brand"].iter().map(|slug| acme_page(slug)).collect()
}

async fn crawl_status(
    State(mock): State<Arc<MockUpstream>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    assert_eq!(id, "crawl-1");
    let poll = mock.crawl_polls.fetch_add(1, Ordering::SeqCst);
    let script = *mock.crawl_script.lock().expect("lock");
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let next = format!("http://{host}/v1/crawl/crawl-1?skip={}", poll + 1);
    let scraping = json!({ "status": "scraping", "total": 3, "completed": 1, "data": [] });

    Json(match script {
        CrawlScript::Completes if poll == 0 => scraping,
        CrawlScript::Completes => {
            json!({ "status": "completed", "total": 3, "completed": 3, "data": acme_pages() })
        }
        CrawlScript::Ends(status) => {
            json!({ "status": status, "total": 3, "completed": 1, "data": [] })
        }
        CrawlScript::NeverFinishes => scraping,
        CrawlScript::EmptyPagesForever if params.contains_key("skip") => {
            json!({ "status": "completed", "data": [], "next": next })
        }
        CrawlScript::EmptyPagesForever => {
            json!({ "status": "completed", "data": acme_pages(), "next": next })
        }
        CrawlScript::OnePagePerLinkForever => json!({
            "status": "completed",
            "data": [acme_page(&format!("page-{poll}"))],
            "next": next
        }),
    })
}

async fn rest_select(
    State(mock): State<Arc<MockUpstream>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    if table == "ads" {
        mock.ads_calls.fetch_add(1, Ordering::SeqCst);
        let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
        let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(0);
        let rows: Vec<Value> = (offset..offset + limit)
            .map(|i| {
                json!({
                    "id": i + 1,
                    "image_url": format!("https://cdn.test/ad-{}.png", i + 1),
                    "advertiser_name": "Acme",
                    "last_shown": "2024-06-01",
                    "platform": "display"
                })
            })
            .collect();
        return Json(Value::Array(rows));
    }
    Json(Value::Array(mock.stored(&table)))
}

async fn rest_insert(
    State(mock): State<Arc<MockUpstream>>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let rows = match body {
        Value::Array(rows) => rows,
        row => vec![row],
    };
    let mut stored = mock.stored.lock().expect("lock");
    let entries = stored.entry(table).or_default();
    let inserted: Vec<Value> = rows
        .into_iter()
        .map(|mut row| {
            row["id"] = json!(format!("row-{}", entries.len() + 1));
            row["created_at"] = json!("2024-06-01T12:00:00Z");
            entries.push(row.clone());
            row
        })
        .collect();
    (StatusCode::CREATED, Json(Value::Array(inserted))).into_response()
}

fn id_filter(params: &HashMap<String, String>) -> String {
    params
        .get("id")
        .and_then(|v| v.strip_prefix("eq."))
        .unwrap_or_default()
        .to_string()
}

async fn rest_update(
    State(mock): State<Arc<MockUpstream>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Json<Value> {
    let id = id_filter(&params);
    let mut stored = mock.stored.lock().expect("lock");
    let updated: Vec<Value> = stored
        .entry(table)
        .or_default()
        .iter_mut()
        .filter(|row| row["id"] == id.as_str())
        .map(|row| {
            if let (Some(row), Some(patch)) = (row.as_object_mut(), patch.as_object()) {
                row.extend(patch.clone());
            }
            row.clone()
        })
        .collect();
    Json(Value::Array(updated))
}

async fn rest_delete(
    State(mock): State<Arc<MockUpstream>>,
    Path(table): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let id = id_filter(&params);
    let mut stored = mock.stored.lock().expect("lock");
    let rows = stored.entry(table).or_default();
    let (deleted, kept): (Vec<Value>, Vec<Value>) =
        rows.drain(..).partition(|row| row["id"] == id.as_str());
    *rows = kept;
    Json(Value::Array(deleted))
}

async fn rest_rpc(Path(function): Path<String>, Json(args): Json<Value>) -> Json<Value> {
    assert_eq!(function, "get_ad_with_variants");
    if args["ad_id"] == "missing" {
        return Json(json!([]));
    }
    Json(json!([{
        "id": args["ad_id"],
        "image_url": "https://cdn.test/ad.png",
        "variants": [{"original_headline": "Big Summer Sale", "new_headline": "Save Big"}]
    }]))
}

async fn knowledge_query(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "response": format!("echo: {}", body["query"].as_str().unwrap_or_default()) }))
}

async fn market_insight(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "executive_summary": {"user_id": body["user_id"]},
        "market_summary": {},
        "market_analysis": {},
        "keyword_insights": {},
        "metadata": {"filters": body["filters"]}
    }))
}

async fn variants_generate(Json(body): Json<Value>) -> Json<Value> {
    let keywords = body["keywords"].as_array().cloned().unwrap_or_default();
    let markets = body["target_markets"].as_array().cloned().unwrap_or_default();
    let variants: Vec<Value> = keywords
        .iter()
        .flat_map(|keyword| {
            markets.iter().map(move |market| {
                let term = keyword["term"].as_str().unwrap_or_default();
                let geo = market.as_str().unwrap_or_default();
                json!({
                    "variant_id": format!("{term}-{geo}"),
                    "geo_target": market,
                    "keyword": keyword["term"],
                    "element_updates": {"headline": "Anvils, delivered"},
                    "audience_segment": "coyotes",
                    "predicted_performance": 0.8,
                    "rationale": "Matches search intent."
                })
            })
        })
        .collect();
    Json(Value::Array(variants))
}

async fn knowledge_health() -> Json<Value> {
    Json(json!({
        "status": "degraded",
        "services": {"knowledge_base": true, "market_analyzer": false}
    }))
}

async fn knowledge_stream() -> Response {
    ([(CONTENT_TYPE, "text/event-stream")], KNOWLEDGE_SSE).into_response()
}

/// Serve every fake upstream from one local listener.
pub async fn spawn_upstream(mock: Arc<MockUpstream>) -> Url {
    let app = Router::new()
        .route("/v1/chat/completions", post(chat_completions))
        .route("/ocr/detect", post(ocr_detect))
        .route("/v1/crawl", post(crawl_submit))
        .route("/v1/crawl/{id}", get(crawl_status))
        .route("/rest/v1/rpc/{function}", post(rest_rpc))
        .route(
            "/rest/v1/{table}",
            get(rest_select)
                .post(rest_insert)
                .patch(rest_update)
                .delete(rest_delete),
        )
        .route("/knowledge/query", post(knowledge_query))
        .route("/market/insight", post(market_insight))
        .route("/variants/generate", post(variants_generate))
        .route("/health", get(knowledge_health))
        .route("/knowledge/query/stream", post(knowledge_stream))
        .with_state(mock);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind mock upstream");
    let addr = listener.local_addr().expect("mock upstream has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream failed");
    });
    Url::parse(&format!("http://{addr}/")).expect("invalid mock url")
}

pub fn test_config(base: &Url, reconciler: ReconcilerKind) -> Config {
    let mut cfg = Config::default();
    cfg.basic.api_key = API_KEY.to_string();
    cfg.openai.base_url = base.join("v1").expect("openai url");
    cfg.openai.api_key = "sk-test".to_string();
    cfg.ocr.base_url = base.clone();
    cfg.firecrawl.base_url = base.clone();
    cfg.firecrawl.api_key = "fc-test".to_string();
    cfg.firecrawl.poll_interval_ms = 10;
    cfg.firecrawl.max_poll_attempts = 5;
    cfg.supabase.url = base.clone();
    cfg.supabase.service_key = "service-test".to_string();
    cfg.knowledge.base_url = base.clone();
    cfg.automation.reconciler = reconciler;
    cfg
}

pub async fn app_with(mock: Arc<MockUpstream>, reconciler: ReconcilerKind) -> Router {
    let base = spawn_upstream(mock).await;
    let cfg = test_config(&base, reconciler);
    let state = AdlabState::new(&cfg).expect("failed to build state");
    adlab_router(state, cors_layer(&cfg.basic.allowed_origins))
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let resp = app.clone().oneshot(req).await.expect("request failed");
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    (status, body.to_vec())
}

pub fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {API_KEY}"))
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn patch_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PATCH")
        .uri(uri)
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

pub fn delete_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("x-api-key", API_KEY)
        .body(Body::empty())
        .expect("failed to build request")
}

pub fn json_body(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).expect("response body was not json")
}
