//! HTML forms can only submit GET and POST. A POST carrying
//! `?_method=PUT|PATCH|DELETE` is rewritten to that method before routing,
//! so this must wrap the whole router rather than sit inside it.

use axum::{extract::Request, http::Method};

pub async fn method_override(mut request: Request) -> Request {
    if request.method() == Method::POST {
        if let Some(method) = request.uri().query().and_then(requested_method) {
            tracing::trace!(%method, uri = %request.uri(), "Overriding request method");
            *request.method_mut() = method;
        }
    }
    request
}

fn requested_method(query: &str) -> Option<Method> {
    let (_, value) = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "_method")?;

    match value.to_ascii_uppercase().as_str() {
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        "DELETE" => Some(Method::DELETE),
        _ => None,
    }
}
