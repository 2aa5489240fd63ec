// HTTP surface: `GET /?url=...` plus the CORS preflight

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
        },
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::info;

use crate::resolver::{InputError, Resolver, VideoId};
use crate::response::{render_input_error, render_resolution};

#[derive(Clone)]
pub struct AppState {
    resolver: Arc<Resolver>,
    channel: Arc<str>,
}

impl AppState {
    pub fn new(resolver: Resolver, channel: &str) -> Self {
        Self {
            resolver: Arc::new(resolver),
            channel: Arc::from(channel),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(resolve).options(preflight))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .with_state(state)
}

async fn resolve(State(state): State<AppState>, Query(query): Query<ResolveQuery>) -> Response {
    let video_id = match query
        .url
        .as_deref()
        .ok_or(InputError::MissingUrl)
        .and_then(VideoId::from_url)
    {
        Ok(id) => id,
        Err(e) => {
            info!(error = %e, "Rejected request");
            return render_input_error(&e, &state.channel);
        }
    };

    let resolution = state.resolver.resolve(&video_id).await;
    render_resolution(&resolution, &state.channel)
}

async fn preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
