use crate::infra::AppState;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::Utc;
use nouvelle_maison::catalog::{
    price_ranges, rental_categories, subscription_tiers, Catalog, Fcfa, Notary, PriceRange,
    SubscriptionTier, Zone,
};
use nouvelle_maison::i18n::{table, Language};
use nouvelle_maison::workflows::interaction::{front_desk_router, FrontDesk};
use nouvelle_maison::workflows::listing::SellSubmission;
use nouvelle_maison::workflows::rent::select_category;
use nouvelle_maison::workflows::search::{cities, suggest_zones};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ZoneParams {
    #[serde(default)]
    pub(crate) term: String,
    #[serde(default)]
    pub(crate) city: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubscriptionParams {
    pub(crate) price: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ZoneView {
    #[serde(flatten)]
    pub(crate) zone: Zone,
    pub(crate) label: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct PriceRangeView {
    #[serde(flatten)]
    pub(crate) range: PriceRange,
    pub(crate) label: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NotaryCard<'a> {
    #[serde(flatten)]
    pub(crate) notary: &'a Notary,
    pub(crate) availability: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TranslationTable {
    pub(crate) language: Language,
    pub(crate) entries: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubscriptionQuote {
    pub(crate) base: Fcfa,
    pub(crate) tiers: Vec<SubscriptionTier>,
}

/// Visitor routes plus the read-only catalog and operational endpoints.
pub(crate) fn with_catalog_routes(desk: Arc<FrontDesk>) -> Router {
    let catalog = Arc::clone(desk.catalog());
    let catalog_routes = Router::new()
        .route("/api/v1/notaries", get(notaries_endpoint))
        .route(
            "/api/v1/notaries/:notary_id/properties",
            get(notary_properties_endpoint),
        )
        .with_state(catalog);

    front_desk_router(desk)
        .merge(catalog_routes)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/i18n/:lang", get(translations_endpoint))
        .route("/api/v1/zones", get(zones_endpoint))
        .route("/api/v1/cities", get(cities_endpoint))
        .route("/api/v1/price-ranges", get(price_ranges_endpoint))
        .route("/api/v1/rent/categories", get(rental_categories_endpoint))
        .route(
            "/api/v1/rent/categories/:category_id/select",
            post(select_category_endpoint),
        )
        .route("/api/v1/sell", post(sell_endpoint))
        .route("/api/v1/subscriptions", get(subscriptions_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn translations_endpoint(Path(lang): Path<String>) -> Response {
    match Language::from_code(&lang) {
        Some(language) => Json(TranslationTable {
            language,
            entries: table(language),
        })
        .into_response(),
        None => not_found(format!("unsupported language '{lang}'")),
    }
}

pub(crate) async fn zones_endpoint(Query(params): Query<ZoneParams>) -> Json<Vec<ZoneView>> {
    let zones = suggest_zones(&params.term, params.city.as_deref())
        .into_iter()
        .map(|zone| ZoneView {
            label: zone.label(),
            zone,
        })
        .collect();
    Json(zones)
}

pub(crate) async fn cities_endpoint() -> Json<Vec<&'static str>> {
    Json(cities())
}

pub(crate) async fn price_ranges_endpoint() -> Json<Vec<PriceRangeView>> {
    let ranges = price_ranges()
        .iter()
        .map(|range| PriceRangeView {
            range: *range,
            label: range.label(),
        })
        .collect();
    Json(ranges)
}

pub(crate) async fn notaries_endpoint(State(catalog): State<Arc<Catalog>>) -> Response {
    let cards: Vec<NotaryCard<'_>> = catalog
        .notaries()
        .iter()
        .map(|notary| NotaryCard {
            notary,
            availability: notary.availability_label(),
        })
        .collect();
    Json(cards).into_response()
}

pub(crate) async fn notary_properties_endpoint(
    State(catalog): State<Arc<Catalog>>,
    Path(notary_id): Path<u32>,
) -> Response {
    match catalog.notary(notary_id) {
        Some(notary) => Json(&notary.properties).into_response(),
        None => not_found(format!("unknown notary {notary_id}")),
    }
}

pub(crate) async fn rental_categories_endpoint() -> impl IntoResponse {
    Json(rental_categories())
}

pub(crate) async fn select_category_endpoint(Path(category_id): Path<String>) -> Response {
    match select_category(&category_id) {
        Some(category) => Json(category).into_response(),
        None => not_found(format!("unknown rental category '{category_id}'")),
    }
}

pub(crate) async fn sell_endpoint(Json(submission): Json<SellSubmission>) -> Response {
    match submission.submit(Utc::now()) {
        Ok(receipt) => (StatusCode::ACCEPTED, Json(receipt)).into_response(),
        Err(error) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

pub(crate) async fn subscriptions_endpoint(
    Query(params): Query<SubscriptionParams>,
) -> Json<SubscriptionQuote> {
    let base = Fcfa::parse(&params.price);
    Json(SubscriptionQuote {
        base,
        tiers: subscription_tiers(base),
    })
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
}
