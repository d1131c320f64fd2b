use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Echo, User};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(String::new())
        .unwrap()
}

// --- list ---

#[tokio::test]
async fn list_users_empty() {
    let resp = app().oneshot(empty_request("GET", "/users")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users: Vec<User> = body_json(resp).await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn list_users_rejects_bad_filter() {
    let resp = app()
        .oneshot(empty_request("GET", "/users?active=maybe"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- create ---

#[tokio::test]
async fn create_user_returns_201() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/users",
            r#"{"name":"Jane","email":"jane@example.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let user: User = body_json(resp).await;
    assert_eq!(user.name, "Jane");
    assert!(!user.active);
}

#[tokio::test]
async fn create_user_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/users", r#"{"nickname":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete ---

#[tokio::test]
async fn get_user_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "GET",
            "/users/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn get_user_bad_uuid_returns_400() {
    let resp = app()
        .oneshot(empty_request("GET", "/users/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn patch_user_not_found() {
    let resp = app()
        .oneshot(json_request(
            "PATCH",
            "/users/00000000-0000-0000-0000-000000000000",
            r#"{"active":true}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_user_not_found() {
    let resp = app()
        .oneshot(empty_request(
            "DELETE",
            "/users/00000000-0000-0000-0000-000000000000",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- echo / greeting ---

#[tokio::test]
async fn echo_reports_request() {
    let resp = app()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/echo/a/b?x=1&y=two")
                .header("x-trace", "abc")
                .body("payload".to_string())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.path, "/echo/a/b");
    assert_eq!(echo.query.as_deref(), Some("x=1&y=two"));
    assert_eq!(echo.headers.get("x-trace").map(String::as_str), Some("abc"));
    assert_eq!(echo.body, "payload");
}

#[tokio::test]
async fn greeting_is_plain_text() {
    let resp = app().oneshot(empty_request("GET", "/greeting")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_bytes(resp).await, "hello");
}

// --- full lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create two users
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/users",
            r#"{"name":"Ann","email":"ann@example.com","active":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let ann: User = body_json(resp).await;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/users",
            r#"{"name":"Bob","email":"bob@example.com"}"#,
        ))
        .await
        .unwrap();
    let bob: User = body_json(resp).await;

    // filter by active
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/users?active=true"))
        .await
        .unwrap();
    let active: Vec<User> = body_json(resp).await;
    assert_eq!(active, vec![ann.clone()]);

    // filter by email, percent-encoded
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/users?email=bob%40example.com"))
        .await
        .unwrap();
    let found: Vec<User> = body_json(resp).await;
    assert_eq!(found, vec![bob.clone()]);

    // patch keeps untouched fields
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            &format!("/users/{}", bob.id),
            r#"{"active":true}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let patched: User = body_json(resp).await;
    assert_eq!(patched.name, "Bob");
    assert!(patched.active);

    // put replaces every field
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/users/{}", bob.id),
            r#"{"name":"Robert","email":"robert@example.com"}"#,
        ))
        .await
        .unwrap();
    let replaced: User = body_json(resp).await;
    assert_eq!(replaced.name, "Robert");
    assert!(!replaced.active);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/users/{}", ann.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/users"))
        .await
        .unwrap();
    let users: Vec<User> = body_json(resp).await;
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].id, bob.id);
}
