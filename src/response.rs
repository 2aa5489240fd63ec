// JSON response envelope
//
// Every payload goes out as `{ "status": ..., <body fields>, "channel": ... }`.
// The attribution is stamped here when the envelope is built; the resolver
// results themselves are never modified.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::resolver::{InputError, ManualFallback, Resolution};

const MANUAL_USAGE: &str =
    "Automatic extraction failed. Open one of the tools and paste the video link to download it manually.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
    Info,
}

#[derive(Debug, Serialize)]
pub struct Envelope<'a, T: Serialize> {
    status: Status,
    #[serde(flatten)]
    body: &'a T,
    channel: &'a str,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    pub fn new(status: Status, body: &'a T, channel: &'a str) -> Self {
        Self {
            status,
            body,
            channel,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct InfoBody<'a> {
    #[serde(flatten)]
    fallback: &'a ManualFallback,
    usage: &'static str,
}

/// Success → 200 "success", exhausted → 200 "info"
pub fn render_resolution(resolution: &Resolution, channel: &str) -> Response {
    match resolution {
        Resolution::Success(video) => {
            json_response(StatusCode::OK, &Envelope::new(Status::Success, video, channel))
        }
        Resolution::ManualFallback(fallback) => {
            let body = InfoBody {
                fallback,
                usage: MANUAL_USAGE,
            };
            json_response(StatusCode::OK, &Envelope::new(Status::Info, &body, channel))
        }
    }
}

/// Input problems → 400 "error"
pub fn render_input_error(input_error: &InputError, channel: &str) -> Response {
    let body = ErrorBody {
        message: input_error.to_string(),
    };
    json_response(
        StatusCode::BAD_REQUEST,
        &Envelope::new(Status::Error, &body, channel),
    )
}

fn json_response<T: Serialize>(status: StatusCode, envelope: &Envelope<'_, T>) -> Response {
    match serde_json::to_string_pretty(envelope) {
        Ok(json) => (status, [(header::CONTENT_TYPE, "application/json")], json).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::orchestrator::manual_fallback;
    use crate::resolver::{ResolvedVideo, StreamFormat, VideoId};
    use serde_json::{json, Value};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn resolved(duration: &str, formats: Vec<StreamFormat>) -> ResolvedVideo {
        ResolvedVideo {
            video_id: "abc123".to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            duration: duration.to_string(),
            thumbnail: None,
            formats,
            source: "oembed",
        }
    }

    #[tokio::test]
    async fn test_success_envelope() {
        let video = resolved(
            "2:05",
            vec![StreamFormat {
                quality: "720p".to_string(),
                mime_type: "video/mp4".to_string(),
                url: "https://example.com/720.mp4".to_string(),
            }],
        );
        let response = render_resolution(&Resolution::Success(video), "@chan");
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(
            json,
            json!({
                "status": "success",
                "videoId": "abc123",
                "title": "Title",
                "author": "Author",
                "duration": "2:05",
                "formats": [ { "quality": "720p", "type": "video/mp4", "url": "https://example.com/720.mp4" } ],
                "source": "oembed",
                "channel": "@chan"
            })
        );
    }

    #[tokio::test]
    async fn test_optional_fields_are_omitted() {
        let response = render_resolution(&Resolution::Success(resolved("", Vec::new())), "@chan");
        let json = body_json(response).await;
        assert!(json.get("duration").is_none());
        assert!(json.get("thumbnail").is_none());
        assert!(json.get("formats").is_none());
    }

    #[tokio::test]
    async fn test_info_envelope() {
        let fallback = manual_fallback(&VideoId::from("xyz789"));
        let response = render_resolution(&Resolution::ManualFallback(fallback), "@chan");
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "info");
        assert_eq!(json["videoId"], "xyz789");
        assert_eq!(json["usage"], MANUAL_USAGE);
        assert_eq!(json["channel"], "@chan");
        let tools = json["tools"].as_array().unwrap();
        assert!(!tools.is_empty());
        for tool in tools {
            assert!(tool["name"].is_string());
            assert!(tool["url"].as_str().unwrap().contains("xyz789"));
        }
    }

    #[tokio::test]
    async fn test_error_envelope() {
        let response = render_input_error(&InputError::MissingUrl, "@chan");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );

        let json = body_json(response).await;
        assert_eq!(
            json,
            json!({ "status": "error", "message": "Missing url parameter", "channel": "@chan" })
        );
    }
}
