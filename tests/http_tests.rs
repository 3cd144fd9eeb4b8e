mod common;
use common::test_app;

use absensi::http::router;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

fn request(method: Method, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        b = b.header(header::COOKIE, c);
    }
    match body {
        Some(v) => b
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => b.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> Response {
    app.clone().oneshot(req).await.unwrap()
}

async fn json_of(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// `name=value` of the first Set-Cookie header for `name`.
fn cookie_pair(res: &Response, name: &str) -> Option<String> {
    res.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(&format!("{}=", name)))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

async fn login(app: &Router) -> String {
    let reg = send(
        app,
        request(
            Method::POST,
            "/register",
            None,
            Some(json!({"name": "Tono", "password": "pw12345", "email": "tono@example.com"})),
        ),
    )
    .await;
    assert_eq!(reg.status(), StatusCode::CREATED);

    let res = send(
        app,
        request(
            Method::POST,
            "/login",
            None,
            Some(json!({"email": "tono@example.com", "password": "pw12345"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    cookie_pair(&res, "token").expect("session cookie")
}

#[tokio::test]
async fn health_reports_up() {
    let app = router(test_app().state);
    let res = send(&app, request(Method::GET, "/health", None, None)).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_of(res).await, json!({"status": "OK", "data": "up"}));
}

#[tokio::test]
async fn register_envelope_hides_the_password() {
    let app = router(test_app().state);
    let res = send(
        &app,
        request(
            Method::POST,
            "/register",
            None,
            Some(json!({"name": "Ani", "password": "pw", "email": "ani@example.com"})),
        ),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body = json_of(res).await;
    assert_eq!(body["status"], "CREATED");
    assert_eq!(body["data"]["email"], "ani@example.com");
    assert_eq!(body["data"]["password"], "");
}

#[tokio::test]
async fn malformed_body_is_unprocessable() {
    let app = router(test_app().state);
    let mut req = request(Method::POST, "/register", None, None);
    *req.body_mut() = Body::from("{not json");

    let res = send(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_of(res).await;
    assert_eq!(body["status"], "UNPROCESSABLE_ENTITY");
    assert!(body["data"].is_null());
}

#[tokio::test]
async fn invalid_email_is_bad_request() {
    let app = router(test_app().state);
    let res = send(
        &app,
        request(
            Method::POST,
            "/register",
            None,
            Some(json!({"name": "Ani", "password": "pw", "email": "not-an-email"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_cookie() {
    let app = router(test_app().state);

    for (method, uri) in [
        (Method::GET, "/logout"),
        (Method::POST, "/account/checkin"),
        (Method::GET, "/account/checkout"),
        (Method::POST, "/account/activity"),
    ] {
        let res = send(&app, request(method, uri, None, None)).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let res = send(
        &app,
        request(Method::POST, "/account/checkin", Some("token=garbage"), None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_token_is_not_a_checkin_token() {
    let app = router(test_app().state);
    let session = login(&app).await;
    let forged = session.replacen("token=", "checkin-token=", 1);

    let res = send(
        &app,
        request(
            Method::POST,
            "/account/activity",
            Some(&forged),
            Some(json!({"deskripsi": "x"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_day_through_the_router() {
    let app = router(test_app().state);
    let session = login(&app).await;

    // check in
    let res = send(&app, request(Method::POST, "/account/checkin", Some(&session), None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let checkin = cookie_pair(&res, "checkin-token").expect("checkin cookie");
    let both = format!("{}; {}", session, checkin);

    // log an activity, then fix it
    let res = send(
        &app,
        request(
            Method::POST,
            "/account/activity",
            Some(&both),
            Some(json!({"deskripsi": "stand-up"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let id = json_of(res).await["data"]["id"].as_i64().unwrap();

    let res = send(
        &app,
        request(
            Method::PATCH,
            &format!("/account/activity/{}", id),
            Some(&both),
            Some(json!({"deskripsi": "stand-up + review"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_of(res).await["data"]["deskripsi"], "stand-up + review");

    let res = send(
        &app,
        request(Method::DELETE, "/account/activity/abc", Some(&both), None),
    )
    .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // check out clears the checkin cookie
    let res = send(&app, request(Method::GET, "/account/checkout", Some(&both), None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(cookie_pair(&res, "checkin-token").as_deref(), Some("checkin-token="));
    assert!(!json_of(res).await["data"]["checkout"].is_null());

    // second checkout with the stale cookie
    let res = send(&app, request(Method::GET, "/account/checkout", Some(&both), None)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // attendance history
    let res = send(
        &app,
        request(
            Method::GET,
            "/account/riwayat",
            Some(&session),
            Some(json!({"name": "Tono"})),
        ),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(json_of(res).await["data"].as_array().unwrap().len(), 1);

    // logout drops both cookies
    let res = send(&app, request(Method::GET, "/logout", Some(&session), None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(cookie_pair(&res, "token").as_deref(), Some("token="));
    assert_eq!(cookie_pair(&res, "checkin-token").as_deref(), Some("checkin-token="));
}

#[tokio::test]
async fn unknown_route_uses_the_envelope() {
    let app = router(test_app().state);
    let res = send(&app, request(Method::GET, "/nope", None, None)).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_of(res).await, json!({"status": "NOT_FOUND", "data": null}));
}
