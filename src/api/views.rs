//! View responses.
//!
//! Handlers answer with either a rendered view or a redirect. A view is a
//! template name plus its locals; the locals go out as JSON and the template
//! name travels in the `x-view-template` header for the presentation layer.

use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;

pub const TEMPLATE_HEADER: HeaderName = HeaderName::from_static("x-view-template");

/// Render `template` with `locals`
pub fn render<T: Serialize>(template: &'static str, locals: T) -> Response {
    render_with_status(StatusCode::OK, template, locals)
}

/// Render a form again after a failed submission
pub fn render_error<T: Serialize>(template: &'static str, locals: T) -> Response {
    render_with_status(StatusCode::UNPROCESSABLE_ENTITY, template, locals)
}

fn render_with_status<T: Serialize>(status: StatusCode, template: &'static str, locals: T) -> Response {
    (
        status,
        [(TEMPLATE_HEADER, HeaderValue::from_static(template))],
        Json(locals),
    )
        .into_response()
}

/// 303 redirect, so the browser follows up with a GET whatever the original method
pub fn redirect(to: &str) -> Response {
    Redirect::to(to).into_response()
}
