// Common data models for the resolver

use serde::Serialize;

/// A single playable stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamFormat {
    /// Quality label (e.g. "720p", "medium", "AUDIO_QUALITY_LOW")
    pub quality: String,
    /// MIME type string, codecs included
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Direct media URL
    pub url: String,
}

/// Metadata produced by one strategy
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoDetails {
    pub title: String,
    pub author: String,
    pub duration_seconds: Option<u64>,
    pub thumbnail: Option<String>,
    pub formats: Vec<StreamFormat>,
}

/// Successful resolution, ready to be rendered
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedVideo {
    pub video_id: String,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<StreamFormat>,
    /// Name of the strategy that produced the data
    pub source: &'static str,
}

/// External tool the caller can use by hand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolLink {
    pub name: &'static str,
    pub url: String,
}

/// Terminal outcome when every strategy came back empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualFallback {
    pub video_id: String,
    pub tools: Vec<ToolLink>,
}

/// Outcome of one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Success(ResolvedVideo),
    ManualFallback(ManualFallback),
}

impl Resolution {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn video_id(&self) -> &str {
        match self {
            Self::Success(video) => &video.video_id,
            Self::ManualFallback(fallback) => &fallback.video_id,
        }
    }
}
