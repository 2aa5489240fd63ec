// Watch page strategy - scrapes the player configuration embedded in the HTML
//
// The page carries `ytInitialPlayerResponse = {...};` inside a script tag.
// The object is located with a regex and parsed with a streaming
// deserializer, which stops at the end of the first complete JSON value.

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;
use tracing::{debug, info};

use crate::resolver::diagnostics::diagnose_player_response;
use crate::resolver::errors::StrategyFault;
use crate::resolver::models::{StreamFormat, VideoDetails};
use crate::resolver::traits::ResolveStrategy;
use crate::resolver::utils::{get_text, non_empty_str, parse_seconds};
use crate::resolver::video_id::VideoId;

lazy_static::lazy_static! {
    static ref PLAYER_RESPONSE_RE: Regex =
        Regex::new(r"ytInitialPlayerResponse\s*=\s*").unwrap();
}

pub struct WatchPageStrategy {
    client: reqwest::Client,
    base_url: String,
}

impl WatchPageStrategy {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn page_url(&self, video_id: &VideoId) -> String {
        format!("{}/watch?v={}&hl=en", self.base_url, video_id.url_encoded())
    }
}

#[async_trait]
impl ResolveStrategy for WatchPageStrategy {
    fn name(&self) -> &'static str {
        "watch-page"
    }

    async fn resolve(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault> {
        let html = get_text(&self.client, &self.page_url(video_id)).await?;

        let player = match extract_player_response(&html)? {
            Some(player) => player,
            None => {
                debug!(%video_id, "No player response in watch page");
                return Ok(None);
            }
        };

        parse_player_response(&player)
    }
}

/// Locate and parse the embedded player configuration.
/// `Ok(None)` when the marker is absent, `Err` when it is present but broken.
pub fn extract_player_response(html: &str) -> Result<Option<Value>, StrategyFault> {
    let start = match PLAYER_RESPONSE_RE.find(html) {
        Some(m) => m.end(),
        None => return Ok(None),
    };

    let rest = &html[start..];
    if !rest.starts_with('{') {
        return Ok(None);
    }

    let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    match values.next() {
        Some(Ok(value)) => Ok(Some(value)),
        Some(Err(e)) => Err(e.into()),
        None => Ok(None),
    }
}

/// Turn a player response into details. Requires at least one usable format.
pub fn parse_player_response(player: &Value) -> Result<Option<VideoDetails>, StrategyFault> {
    let streaming = &player["streamingData"];
    let formats: Vec<StreamFormat> = ["formats", "adaptiveFormats"]
        .iter()
        .filter_map(|key| streaming[*key].as_array())
        .flatten()
        .filter_map(derive_format)
        .collect();

    if formats.is_empty() {
        if let Some((reason, message)) = diagnose_player_response(player) {
            info!(
                reason = reason.description(),
                permanent = reason.is_permanent(),
                other_sources_might_help = reason.other_sources_might_help(),
                "Watch page reports video as unplayable"
            );
            return Err(StrategyFault::Unplayable { reason, message });
        }
        return Ok(None);
    }

    let details = &player["videoDetails"];
    let thumbnail = details["thumbnail"]["thumbnails"]
        .as_array()
        .and_then(|thumbs| thumbs.last())
        .and_then(|thumb| non_empty_str(&thumb["url"]));

    Ok(Some(VideoDetails {
        title: non_empty_str(&details["title"]).unwrap_or_else(|| "Unknown".to_string()),
        author: non_empty_str(&details["author"]).unwrap_or_else(|| "Unknown".to_string()),
        duration_seconds: parse_seconds(&details["lengthSeconds"]),
        thumbnail,
        formats,
    }))
}

/// Build a format from one record: literal `url` first, then the cipher blob
fn derive_format(record: &Value) -> Option<StreamFormat> {
    let url = non_empty_str(&record["url"]).or_else(|| {
        record["signatureCipher"]
            .as_str()
            .or_else(|| record["cipher"].as_str())
            .and_then(decode_cipher_url)
    })?;

    let quality = non_empty_str(&record["qualityLabel"])
        .or_else(|| non_empty_str(&record["quality"]))
        .unwrap_or_else(|| "unknown".to_string());

    Some(StreamFormat {
        quality,
        mime_type: record["mimeType"].as_str().unwrap_or("").to_string(),
        url,
    })
}

/// Decode a query-string shaped cipher blob and return its `url` parameter
pub fn decode_cipher_url(blob: &str) -> Option<String> {
    url::form_urlencoded::parse(blob.as_bytes())
        .find(|(key, _)| key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
