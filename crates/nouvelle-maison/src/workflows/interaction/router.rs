use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::FlowEvent;
use super::runtime::{DeskError, FlowId, FlowTarget, FrontDesk, VisitorId};
use crate::i18n::Language;
use crate::workflows::navigation::View;
use crate::workflows::search::{SearchQuery, SortOrder};
use crate::workflows::session::AuthForm;

/// Visitor-scoped endpoints: session, navigation, search, and card flows.
pub fn front_desk_router(desk: Arc<FrontDesk>) -> Router {
    Router::new()
        .route("/api/v1/visitors", post(open_visitor_handler))
        .route(
            "/api/v1/visitors/:visitor_id",
            get(visitor_handler).delete(close_visitor_handler),
        )
        .route(
            "/api/v1/visitors/:visitor_id/language",
            put(language_handler),
        )
        .route(
            "/api/v1/visitors/:visitor_id/navigate",
            post(navigate_handler),
        )
        .route("/api/v1/visitors/:visitor_id/search", post(search_handler))
        .route("/api/v1/visitors/:visitor_id/results", get(results_handler))
        .route("/api/v1/visitors/:visitor_id/login", post(login_handler))
        .route("/api/v1/visitors/:visitor_id/logout", post(logout_handler))
        .route(
            "/api/v1/visitors/:visitor_id/notaries/:notary_id/toggle",
            post(toggle_notary_handler),
        )
        .route(
            "/api/v1/visitors/:visitor_id/flows",
            post(open_flow_handler),
        )
        .route(
            "/api/v1/visitors/:visitor_id/flows/:flow_id",
            get(flow_handler).delete(remove_flow_handler),
        )
        .route(
            "/api/v1/visitors/:visitor_id/flows/:flow_id/events",
            post(event_handler),
        )
        .with_state(desk)
}

#[derive(Debug, Deserialize)]
pub(crate) struct LanguageRequest {
    language: Language,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SortParams {
    #[serde(default)]
    sort: SortOrder,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    form: AuthForm,
    #[serde(default)]
    resume_flow: Option<FlowId>,
}

pub(crate) async fn open_visitor_handler(State(desk): State<Arc<FrontDesk>>) -> Response {
    let id = desk.open_visitor();
    match desk.visitor_view(id) {
        Ok(view) => (StatusCode::CREATED, Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn visitor_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
) -> Response {
    respond(desk.visitor_view(VisitorId(visitor_id)))
}

pub(crate) async fn close_visitor_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
) -> Response {
    match desk.close_visitor(VisitorId(visitor_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn language_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Json(request): Json<LanguageRequest>,
) -> Response {
    respond(desk.set_language(VisitorId(visitor_id), request.language))
}

pub(crate) async fn navigate_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Json(view): Json<View>,
) -> Response {
    respond(desk.navigate(VisitorId(visitor_id), view))
}

pub(crate) async fn search_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Json(query): Json<SearchQuery>,
) -> Response {
    match desk.search(VisitorId(visitor_id), query).await {
        Ok(Some(results)) => (StatusCode::OK, Json(results)).into_response(),
        Ok(None) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Query(params): Query<SortParams>,
) -> Response {
    respond(desk.sort_results(VisitorId(visitor_id), params.sort))
}

pub(crate) async fn login_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Json(request): Json<LoginRequest>,
) -> Response {
    respond(
        desk.login(VisitorId(visitor_id), request.form, request.resume_flow)
            .await,
    )
}

pub(crate) async fn logout_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
) -> Response {
    respond(desk.logout(VisitorId(visitor_id)))
}

pub(crate) async fn toggle_notary_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path((visitor_id, notary_id)): Path<(u64, u32)>,
) -> Response {
    respond(desk.toggle_notary(VisitorId(visitor_id), notary_id))
}

pub(crate) async fn open_flow_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path(visitor_id): Path<u64>,
    Json(target): Json<FlowTarget>,
) -> Response {
    match desk.open_flow(VisitorId(visitor_id), target) {
        Ok((flow_id, flow)) => {
            let payload = json!({ "flow_id": flow_id, "flow": flow });
            (StatusCode::CREATED, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn flow_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path((visitor_id, flow_id)): Path<(u64, u64)>,
) -> Response {
    respond(desk.flow_view(VisitorId(visitor_id), FlowId(flow_id)))
}

pub(crate) async fn remove_flow_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path((visitor_id, flow_id)): Path<(u64, u64)>,
) -> Response {
    match desk.remove_flow(VisitorId(visitor_id), FlowId(flow_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn event_handler(
    State(desk): State<Arc<FrontDesk>>,
    Path((visitor_id, flow_id)): Path<(u64, u64)>,
    Json(event): Json<FlowEvent>,
) -> Response {
    respond(desk.apply(VisitorId(visitor_id), FlowId(flow_id), event))
}

fn respond<T: serde::Serialize>(result: Result<T, DeskError>) -> Response {
    match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_status(error: &DeskError) -> StatusCode {
    match error {
        DeskError::UnknownVisitor(_)
        | DeskError::UnknownFlow(_)
        | DeskError::UnknownNotary(_)
        | DeskError::UnknownProperty(_) => StatusCode::NOT_FOUND,
        DeskError::Auth(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DeskError::Flow(flow) if flow.is_validation() => StatusCode::UNPROCESSABLE_ENTITY,
        DeskError::Flow(_) | DeskError::NoSearchResults => StatusCode::CONFLICT,
    }
}

fn error_response(error: DeskError) -> Response {
    let payload = json!({
        "error": error.to_string(),
    });
    (error_status(&error), Json(payload)).into_response()
}
