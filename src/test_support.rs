//! Router-level helpers for handler tests

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request},
    response::Response,
};
use tower::ServiceExt;

use crate::{api, config::AppConfig, repository::Repository, AppState};

pub fn state_with(repository: Repository) -> AppState {
    AppState::new(AppConfig::default(), repository)
}

/// Send one request through the router, with an optional urlencoded form body
pub async fn send(state: AppState, method: &str, uri: &str, form: Option<&str>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match form {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    api::create_router(state).oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
