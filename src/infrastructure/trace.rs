use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use log::info;
use std::time::Instant;

use crate::domain::value_objects::TraceId;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Per-request context visible to problem bodies and the access log.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub trace_id: TraceId,
    pub path: String,
}

tokio::task_local! {
    static REQUEST_CONTEXT: RequestContext;
}

/// Trace id and path of the request currently being handled, if any.
pub fn current_context() -> Option<RequestContext> {
    REQUEST_CONTEXT.try_with(|ctx| ctx.clone()).ok()
}

/// Middleware that assigns each request a trace id (inbound `X-Trace-Id` or a
/// fresh UUID), scopes it for the duration of the request, echoes it on the
/// response, and writes one access-log line.
pub async fn trace_requests(request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| TraceId::from(value.to_string()))
        .unwrap_or_default();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let context = RequestContext {
        trace_id: trace_id.clone(),
        path: path.clone(),
    };

    let started = Instant::now();
    let mut response = REQUEST_CONTEXT.scope(context, next.run(request)).await;

    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }

    info!(
        "{} {} -> {} in {}ms [trace {}]",
        method,
        path,
        response.status().as_u16(),
        started.elapsed().as_millis(),
        trace_id
    );
    response
}
