use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::Value;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};

use crate::niche::{ErrorBody, GenerateReply, NichePipeline};

pub struct AppState {
    pub pipeline: NichePipeline,
}

impl IntoResponse for GenerateReply {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

/// Reads `prompt` from a parsed body. Missing, null, false, 0 and non-object
/// bodies yield an empty term; other scalars are stringified.
fn prompt_term(body: &Value) -> String {
    match body.get("prompt") {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(other) => other.to_string(),
    }
}

// Content-Type is not checked; only syntactically bad JSON is an internal error.
pub async fn api_generate(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            error!(error = %e, "Failed to read generate request");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::internal(e.to_string())),
            )
                .into_response();
        }
    };

    let term = prompt_term(&body);
    state.pipeline.generate(&term).await.into_response()
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .route("/api/generate", post(api_generate))
        .with_state(state)
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Prompts and results are never cached
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        // method + path only, no body
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

pub async fn serve(pipeline: NichePipeline, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(AppState { pipeline }));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Niche finder API listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn falsy_prompts_are_empty() {
        for body in [
            json!({}),
            json!({ "prompt": null }),
            json!({ "prompt": "" }),
            json!({ "prompt": 0 }),
            json!({ "prompt": false }),
            json!("not an object"),
        ] {
            assert_eq!(prompt_term(&body), "", "body {body}");
        }
    }

    #[test]
    fn scalar_prompts_are_stringified() {
        assert_eq!(prompt_term(&json!({ "prompt": "chess" })), "chess");
        assert_eq!(prompt_term(&json!({ "prompt": 42 })), "42");
        assert_eq!(prompt_term(&json!({ "prompt": true })), "true");
    }
}
