// Mirror strategy - last resort, walks the configured API mirrors in order
//
// Each mirror gets its own time slice, so a few hung instances cannot starve
// the ones after them. The strategy's deadline grows with the mirror count.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::resolver::errors::StrategyFault;
use crate::resolver::models::VideoDetails;
use crate::resolver::traits::ResolveStrategy;
use crate::resolver::utils::{get_json, non_empty_str, parse_seconds};
use crate::resolver::video_id::VideoId;

pub struct MirrorStrategy {
    client: reqwest::Client,
    mirrors: Vec<String>,
    per_mirror: Duration,
}

impl MirrorStrategy {
    pub fn new(client: reqwest::Client, mirrors: &[String], per_mirror: Duration) -> Self {
        Self {
            client,
            mirrors: mirrors
                .iter()
                .map(|m| m.trim_end_matches('/').to_string())
                .collect(),
            per_mirror,
        }
    }

    fn video_url(mirror: &str, video_id: &VideoId) -> String {
        format!("{}/api/v1/videos/{}", mirror, video_id.url_encoded())
    }

    async fn query_mirror(
        &self,
        mirror: &str,
        video_id: &VideoId,
    ) -> Result<Option<VideoDetails>, StrategyFault> {
        let url = Self::video_url(mirror, video_id);
        let json = match timeout(self.per_mirror, get_json(&self.client, &url)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(StrategyFault::Timeout(format!(
                    "{} did not answer within {:?}",
                    mirror, self.per_mirror
                )))
            }
        };
        Ok(parse_mirror_video(&json, mirror))
    }
}

#[async_trait]
impl ResolveStrategy for MirrorStrategy {
    fn name(&self) -> &'static str {
        "mirror"
    }

    fn deadline(&self, base: Duration) -> Duration {
        base + self.per_mirror * self.mirrors.len() as u32
    }

    async fn resolve(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault> {
        if self.mirrors.is_empty() {
            debug!("No mirrors configured");
            return Ok(None);
        }

        for mirror in &self.mirrors {
            debug!(mirror = mirror.as_str(), %video_id, "Trying mirror");

            match self.query_mirror(mirror, video_id).await {
                Ok(Some(details)) => {
                    debug!(mirror = mirror.as_str(), "Mirror answered");
                    return Ok(Some(details));
                }
                Ok(None) => {
                    debug!(mirror = mirror.as_str(), "Mirror returned no title");
                }
                Err(e) => {
                    warn!(mirror = mirror.as_str(), error = %e, "Mirror failed");
                }
            }
        }

        Err(StrategyFault::MirrorsExhausted(self.mirrors.len()))
    }
}

/// Parse a mirror `/api/v1/videos/{id}` body. No title means no data.
pub fn parse_mirror_video(json: &Value, mirror: &str) -> Option<VideoDetails> {
    let title = non_empty_str(&json["title"])?;

    // Mirrors sometimes hand out thumbnails relative to themselves
    let thumbnail = json["videoThumbnails"]
        .as_array()
        .and_then(|thumbs| thumbs.first())
        .and_then(|thumb| non_empty_str(&thumb["url"]))
        .map(|url| {
            if url.starts_with('/') {
                format!("{}{}", mirror, url)
            } else {
                url
            }
        });

    Some(VideoDetails {
        title,
        author: non_empty_str(&json["author"]).unwrap_or_else(|| "Unknown".to_string()),
        duration_seconds: parse_seconds(&json["lengthSeconds"]),
        thumbnail,
        formats: Vec::new(),
    })
}
