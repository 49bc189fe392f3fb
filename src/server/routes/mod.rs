use crate::server::router::AdlabState;
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

pub mod automations;
pub mod extract;
pub mod knowledge;
pub mod library;
pub mod materials;
pub mod rules;

pub fn router() -> Router<AdlabState> {
    Router::new()
        .route("/api/library", get(library::list_ads))
        .route("/api/library/{id}", get(library::get_ad))
        .route(
            "/api/automations",
            get(automations::list_automations).post(automations::create_automation),
        )
        .route(
            "/api/automations/headlines",
            post(automations::run_headlines),
        )
        .route(
            "/api/automations/{id}",
            delete(automations::delete_automation),
        )
        .route("/api/rules", get(rules::list_rules).post(rules::create_rule))
        .route(
            "/api/rules/{id}",
            patch(rules::update_rule).delete(rules::delete_rule),
        )
        .route(
            "/api/materials",
            get(materials::list_materials).post(materials::create_material),
        )
        .route("/api/materials/{id}", delete(materials::delete_material))
        .route("/api/knowledge/query", post(knowledge::query))
        .route("/api/knowledge/stream", post(knowledge::stream))
        .route("/api/knowledge/answer", post(knowledge::answer))
        .route(
            "/api/knowledge/market-insight",
            post(knowledge::market_insight),
        )
        .route("/api/knowledge/variants", post(knowledge::generate_variants))
        .route("/api/knowledge/health", get(knowledge::health))
}
