// oEmbed strategy - public metadata endpoint, no playable formats

use async_trait::async_trait;
use serde_json::Value;

use crate::resolver::errors::StrategyFault;
use crate::resolver::models::VideoDetails;
use crate::resolver::traits::ResolveStrategy;
use crate::resolver::utils::{get_json, non_empty_str};
use crate::resolver::video_id::VideoId;

pub struct OEmbedStrategy {
    client: reqwest::Client,
    endpoint: String,
}

impl OEmbedStrategy {
    pub fn new(client: reqwest::Client, endpoint: &str) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
        }
    }

    fn request_url(&self, video_id: &VideoId) -> String {
        format!(
            "{}?url={}&format=json",
            self.endpoint,
            urlencoding::encode(&video_id.watch_url())
        )
    }
}

#[async_trait]
impl ResolveStrategy for OEmbedStrategy {
    fn name(&self) -> &'static str {
        "oembed"
    }

    async fn resolve(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault> {
        let json = get_json(&self.client, &self.request_url(video_id)).await?;
        Ok(parse_oembed(&json))
    }
}

/// A body without a title counts as no data
pub fn parse_oembed(json: &Value) -> Option<VideoDetails> {
    let title = non_empty_str(&json["title"])?;

    Some(VideoDetails {
        title,
        author: non_empty_str(&json["author_name"]).unwrap_or_else(|| "Unknown".to_string()),
        duration_seconds: None,
        thumbnail: non_empty_str(&json["thumbnail_url"]),
        formats: Vec::new(),
    })
}
