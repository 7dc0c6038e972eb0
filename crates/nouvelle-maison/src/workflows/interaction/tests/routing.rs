use super::common::*;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::interaction::front_desk_router;

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

async fn send(router: &axum::Router, request: Request<Body>) -> axum::response::Response {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("route executes")
}

async fn new_visitor(router: &axum::Router) -> u64 {
    let response = send(router, empty_request(Method::POST, "/api/v1/visitors")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    payload["id"].as_u64().expect("visitor id")
}

#[tokio::test(start_paused = true)]
async fn search_route_returns_results_or_no_content() {
    let router = front_desk_router(desk());
    let visitor = new_visitor(&router).await;
    let uri = format!("/api/v1/visitors/{visitor}/search");

    let response = send(&router, json_request(Method::POST, &uri, json!({ "term": "" }))).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &router,
        json_request(
            Method::POST,
            &uri,
            json!({ "term": "Cocody", "sort": "price_high_to_low" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let properties = payload["properties"].as_array().expect("properties");
    assert_eq!(properties.len(), 8);
    assert_eq!(properties[0]["title"], "Villa avec Piscine");
    assert!(properties.iter().all(|p| p["location"] == "Cocody"));

    let response = send(
        &router,
        empty_request(
            Method::GET,
            &format!("/api/v1/visitors/{visitor}/results?sort=newest"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["properties"][0]["title"], "Villa Moderne");
}

#[tokio::test(start_paused = true)]
async fn flow_events_map_errors_to_statuses() {
    let router = front_desk_router(desk());
    let visitor = new_visitor(&router).await;

    let response = send(
        &router,
        json_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/flows"),
            json!({ "target": "search_result", "index": 0 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &router,
        json_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/flows"),
            json!({ "target": "notary", "notary_id": 3 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    let flow = payload["flow_id"].as_u64().expect("flow id");
    assert_eq!(payload["flow"]["action_label"], "Prendre rendez-vous avec le notaire");

    let events = format!("/api/v1/visitors/{visitor}/flows/{flow}/events");
    let response = send(
        &router,
        json_request(Method::POST, &events, json!({ "type": "confirm_payment" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = send(
        &router,
        json_request(Method::POST, &events, json!({ "type": "express_interest" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["step"], "auth_required");

    let response = send(
        &router,
        json_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/login"),
            json!({ "form": { "email": "awa@example.ci" }, "resume_flow": flow }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["user"]["name"], "User");
    assert_eq!(payload["flow"]["step"], "details");

    let response = send(
        &router,
        json_request(Method::POST, &events, json!({ "type": "continue" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "le champ 'date' est requis");
}

#[tokio::test(start_paused = true)]
async fn sign_up_mismatch_is_unprocessable() {
    let router = front_desk_router(desk());
    let visitor = new_visitor(&router).await;

    let response = send(
        &router,
        json_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/login"),
            json!({
                "form": {
                    "mode": "sign_up",
                    "email": "awa@example.ci",
                    "password": "motdepasse",
                    "confirm_password": "autre"
                }
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "Les mots de passe ne correspondent pas");
}

#[tokio::test(start_paused = true)]
async fn unknown_visitor_and_flow_are_not_found() {
    let router = front_desk_router(desk());
    let response = send(&router, empty_request(Method::GET, "/api/v1/visitors/999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let visitor = new_visitor(&router).await;
    let response = send(
        &router,
        empty_request(
            Method::DELETE,
            &format!("/api/v1/visitors/{visitor}/flows/12"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn leaving_visitor_is_forgotten() {
    let desk = desk();
    let router = front_desk_router(Arc::clone(&desk));
    let visitor = new_visitor(&router).await;
    let uri = format!("/api/v1/visitors/{visitor}");
    assert_eq!(desk.visitor_count(), 1);

    let response = send(&router, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(desk.visitor_count(), 0);

    let response = send(&router, empty_request(Method::GET, &uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = send(&router, empty_request(Method::DELETE, &uri)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test(start_paused = true)]
async fn visitor_preferences_round_trip() {
    let router = front_desk_router(desk());
    let visitor = new_visitor(&router).await;

    let response = send(
        &router,
        json_request(
            Method::PUT,
            &format!("/api/v1/visitors/{visitor}/language"),
            json!({ "language": "en" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["language"], "en");

    let response = send(
        &router,
        json_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/navigate"),
            json!({ "view": "sell" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["view"]["view"], "sell");

    let response = send(
        &router,
        empty_request(
            Method::POST,
            &format!("/api/v1/visitors/{visitor}/notaries/4/toggle"),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["selected_notary"], 4);

    let response = send(
        &router,
        empty_request(Method::POST, &format!("/api/v1/visitors/{visitor}/logout")),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json_body(response).await["user"], Value::Null);
}
