use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, StatusBody, WIDGET_XML};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_path_and_query() {
    let resp = app()
        .oneshot(empty_request("DELETE", "/echo/items/7?tag=a&tag=b&flag="))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "DELETE");
    assert_eq!(echo.path, "/echo/items/7");
    assert_eq!(echo.query["tag"], vec!["a".to_string(), "b".to_string()]);
    assert_eq!(echo.query["flag"], vec![String::new()]);
}

#[tokio::test]
async fn echo_reflects_headers_cookies_and_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(http::header::COOKIE, "session=abc; theme=dark")
        .header("x-trace", "t-1")
        .body("name=gear&qty=2".to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.body, "name=gear&qty=2");
    assert_eq!(echo.headers["content-type"], "application/x-www-form-urlencoded");
    assert_eq!(echo.headers["x-trace"], "t-1");
    assert_eq!(echo.cookies["session"], "abc");
    assert_eq!(echo.cookies["theme"], "dark");
}

// --- status ---

#[tokio::test]
async fn status_returns_requested_code() {
    let resp = app().oneshot(empty_request("GET", "/status/418")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::IM_A_TEAPOT);
    let body: StatusBody = body_json(resp).await;
    assert_eq!(body.code, 418);
    assert_eq!(body.message, "I'm a teapot");
}

#[tokio::test]
async fn status_rejects_non_numeric_code() {
    let resp = app().oneshot(empty_request("GET", "/status/teapot")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- slow ---

#[tokio::test]
async fn slow_waits_then_answers() {
    let started = std::time::Instant::now();
    let resp = app().oneshot(empty_request("GET", "/slow/20")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= std::time::Duration::from_millis(20));
    assert_eq!(body_bytes(resp).await, "slept 20ms");
}

// --- xml ---

#[tokio::test]
async fn xml_serves_widget_document() {
    let resp = app().oneshot(empty_request("GET", "/xml")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[http::header::CONTENT_TYPE], "application/xml");
    assert_eq!(body_bytes(resp).await, WIDGET_XML);
}

#[tokio::test]
async fn xml_post_echoes_document() {
    let request = Request::builder()
        .method("POST")
        .uri("/xml")
        .body("<Ping><seq>1</seq></Ping>".to_string())
        .unwrap();
    let resp = app().oneshot(request).await.unwrap();

    assert_eq!(body_bytes(resp).await, "<Ping><seq>1</seq></Ping>");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(empty_request("GET", "/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
