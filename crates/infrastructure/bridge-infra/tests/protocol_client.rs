use std::collections::HashMap;

use axum::extract::Form;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use bridge_core::{FormData, ProtocolRequest, ProtocolResponse};
use bridge_infra::{HttpProtocolClient, ProtocolClient, ProtocolConfig, ProtocolError};
use serde_json::json;

const STATUS_HEADER: &str = "X-DjangoBridge-Status";

async fn start_server(app: Router) -> (std::net::SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, handle)
}

fn client_for(addr: std::net::SocketAddr) -> HttpProtocolClient {
    let base = reqwest::Url::parse(&format!("http://{addr}/")).unwrap();
    HttpProtocolClient::new(reqwest::Client::new(), ProtocolConfig::new(base))
}

fn render(view: &str, props: serde_json::Value) -> impl IntoResponse {
    (
        [(STATUS_HEADER, "render")],
        Json(json!({
            "status": "render",
            "title": view,
            "view": view,
            "props": props,
            "context": {},
            "messages": []
        })),
    )
}

fn app() -> Router {
    Router::new()
        .route(
            "/about",
            get(|headers: HeaderMap| async move {
                let marker = headers
                    .get("x-requested-with")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                render("About", json!({ "marker": marker }))
            }),
        )
        .route(
            "/boom",
            get(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    [(STATUS_HEADER, "render")],
                    Json(json!({"status": "render", "title": "", "view": "Oops"})),
                )
            }),
        )
        .route(
            "/plain",
            get(|| async { "<html><body>not an app page</body></html>" }),
        )
        .route(
            "/old",
            get(|| async {
                (
                    [(STATUS_HEADER, "redirect")],
                    Json(json!({"status": "redirect", "path": "/new"})),
                )
            }),
        )
        .route(
            "/broken",
            get(|| async { ([(STATUS_HEADER, "render")], "{ not json") }),
        )
        .route(
            "/edit",
            post(|Form(fields): Form<HashMap<String, String>>| async move {
                render("Edited", json!({ "title": fields.get("title") }))
            }),
        )
}

#[tokio::test]
async fn render_response_carries_marker_header() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let res = client.send(ProtocolRequest::get("/about")).await.unwrap();
    let ProtocolResponse::Render(payload) = res else {
        panic!("expected render, got {res:?}");
    };
    assert_eq!(payload.view, "About");
    assert_eq!(payload.props["marker"], "DjangoBridge");
}

#[tokio::test]
async fn status_500_is_server_error_regardless_of_body() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let res = client.send(ProtocolRequest::get("/boom")).await.unwrap();
    assert_eq!(res, ProtocolResponse::ServerError);
}

#[tokio::test]
async fn missing_status_header_means_reload() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let res = client.send(ProtocolRequest::get("/plain")).await.unwrap();
    assert_eq!(res, ProtocolResponse::Reload);

    // Unknown routes answer 404 without the header.
    let res = client.send(ProtocolRequest::get("/nope")).await.unwrap();
    assert_eq!(res, ProtocolResponse::Reload);
}

#[tokio::test]
async fn redirect_payload_is_passed_through() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let res = client.send(ProtocolRequest::get("/old")).await.unwrap();
    assert_eq!(res, ProtocolResponse::Redirect { path: "/new".into() });
}

#[tokio::test]
async fn malformed_body_is_an_error() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let err = client.send(ProtocolRequest::get("/broken")).await.unwrap_err();
    assert!(matches!(err, ProtocolError::Malformed { .. }), "{err:?}");
}

#[tokio::test]
async fn post_submits_form_fields() {
    let (addr, _server) = start_server(app()).await;
    let client = client_for(addr);

    let data = FormData::new().with("title", "Hello");
    let res = client
        .send(ProtocolRequest::post("/edit", data))
        .await
        .unwrap();
    let ProtocolResponse::Render(payload) = res else {
        panic!("expected render, got {res:?}");
    };
    assert_eq!(payload.props["title"], "Hello");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client_for(addr);
    let res = client.send(ProtocolRequest::get("/about")).await.unwrap();
    assert_eq!(res, ProtocolResponse::NetworkError);
}
