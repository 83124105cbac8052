//! Per-request tracing.
//!
//! Every request runs inside an `http_request` span carrying a trace id that
//! is taken from `x-trace-id` (when it is a UUID) or generated, and echoed on
//! the response. Bodies are logged at `debug` only. Chat traffic carries user
//! text, so for `/api/chat` only the byte size is logged.

use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use http_body_util::BodyExt;
use std::time::Instant;
use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

pub static X_TRACE_ID: &str = "x-trace-id";

/// JSON bodies below this size are logged verbatim outside the chat routes.
const MAX_LOGGED_BODY: usize = 1024;

const CHAT_PREFIX: &str = "/api/chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyLog {
    Text,
    Size,
    Nothing,
}

fn body_log(path: &str, content_type: &str, len: usize) -> BodyLog {
    if len == 0 {
        BodyLog::Nothing
    } else if path.starts_with(CHAT_PREFIX)
        || !content_type.contains("application/json")
        || len >= MAX_LOGGED_BODY
    {
        BodyLog::Size
    } else {
        BodyLog::Text
    }
}

pub async fn trace_middleware(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();

    let trace_id = req
        .headers()
        .get(X_TRACE_ID)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let path = req.uri().path().to_owned();
    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %path,
    );

    async move {
        info!("request started");
        let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

        let (parts, body) = req.into_parts();
        let bytes = collect_and_log("request", &path, &parts.headers, body).await;
        let mut req = Request::from_parts(parts, Body::from(bytes));
        if let Some(value) = trace_header.clone() {
            req.headers_mut().insert(X_TRACE_ID, value);
        }

        let (parts, body) = next.run(req).await.into_parts();
        let bytes = collect_and_log("response", &path, &parts.headers, body).await;
        let mut response = Response::from_parts(parts, Body::from(bytes));
        if let Some(value) = trace_header {
            response.headers_mut().insert(X_TRACE_ID, value);
        }

        info!(
            status = response.status().as_u16(),
            latency_ms = started.elapsed().as_millis(),
            "request finished"
        );
        response
    }
    .instrument(span)
    .await
}

async fn collect_and_log(direction: &str, path: &str, headers: &HeaderMap, body: Body) -> Bytes {
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(_) => return Bytes::new(),
    };
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match body_log(path, content_type, bytes.len()) {
        BodyLog::Text => match std::str::from_utf8(&bytes) {
            Ok(text) => debug!(direction, body = text, "body"),
            Err(_) => debug!(direction, size = bytes.len(), "body"),
        },
        BodyLog::Size => debug!(direction, content_type, size = bytes.len(), "body"),
        BodyLog::Nothing => {}
    }
    bytes
}
