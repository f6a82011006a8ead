//! End-to-end tests of the bootstrap and content endpoints.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use sw_config::IndexPage;
use sw_server::{SiteMetadata, SiteServer, StartInstruction};
use sw_templates::TemplateEnv;
use tower::ServiceExt;

fn templates() -> TemplateEnv {
    TemplateEnv::from_sources([
        ("index.html", "<h1>{{ args.greeting }}</h1>"),
        (
            "nav.html",
            r#"<a onclick="{{ 'page'|load(template='index.html', title='Home') }}">Home</a>"#,
        ),
        ("error.html", "<p>{{ args.error }}</p>"),
    ])
    .unwrap()
}

fn configured_router() -> Router {
    let mut server = SiteServer::new(templates());
    server.site_mut().set_index(IndexPage::new("index.html").title("SparkleWeb"));
    server
        .site_mut()
        .set_styles([("bootstrap", "https://cdn.example.com/bootstrap.min.css")]);
    server.router().unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn post(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::post("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = body_string(response).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn extract<T: serde::de::DeserializeOwned>(html: &str, name: &str) -> T {
    let prefix = format!("var {name} = ");
    let start = html.find(&prefix).unwrap() + prefix.len();
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<T>()
        .next()
        .unwrap()
        .unwrap()
}

#[tokio::test]
async fn get_serves_bootstrap_document() {
    let response = configured_router()
        .oneshot(
            Request::get("/?utm=1")
                .header(header::HOST, "example.com")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");

    let html = body_string(response).await;
    let site: SiteMetadata = extract(&html, "siteData");
    let start: StartInstruction = extract(&html, "startData");

    assert_eq!(site.route, "http://example.com/");
    assert_eq!(
        site.css_stylesheets["bootstrap"],
        "https://cdn.example.com/bootstrap.min.css"
    );
    assert_eq!(start.template.as_deref(), Some("index.html"));
    assert_eq!(start.title.as_deref(), Some("SparkleWeb"));
}

#[tokio::test]
async fn get_without_start_page_is_diagnostic() {
    let router = SiteServer::new(templates()).router().unwrap();

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("No Starting page set."));
}

#[tokio::test]
async fn post_page_renders_fragment() {
    let (status, body) = post(
        configured_router(),
        json!({
            "request": "page",
            "template": "index.html",
            "title": "Hello",
            "args": {"greeting": "Hi there"},
            "reloadRequired": ["customJS"],
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "success",
            "template": "<h1>Hi there</h1>",
            "title": "Hello",
            "reloadRequired": ["customJS"],
        })
    );
}

#[tokio::test]
async fn post_section_matches_page_shape() {
    let (status, body) = post(
        configured_router(),
        json!({
            "request": "section",
            "template": "nav.html",
            "title": "Nav",
            "args": {},
            "reloadRequired": [],
            "target_id": "sidebar",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["title"], "Nav");
    assert_eq!(body["reloadRequired"], json!([]));
    assert!(body["template"].as_str().unwrap().contains("loadPage("));
}

#[tokio::test]
async fn post_unknown_kind_is_structured_error() {
    let (status, body) = post(
        configured_router(),
        json!({"request": "bogus", "template": "index.html"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "error", "message": "Invalid Request"}));
}

#[tokio::test]
async fn post_unknown_template_is_server_error() {
    let (status, body) = post(
        configured_router(),
        json!({"request": "page", "template": "missing.html", "title": "X"}),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "render_failed");
    assert!(body.get("status").is_none());
}

#[tokio::test]
async fn post_mistyped_page_is_bad_request() {
    let (status, body) = post(
        configured_router(),
        json!({"request": "page", "template": "index.html", "reloadRequired": "customJS"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    let response = configured_router()
        .oneshot(
            Request::get("/")
                .header(header::ORIGIN, "http://other.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}
