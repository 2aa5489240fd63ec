// Helper functions shared by the strategies

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use serde_json::Value;
use tracing::{debug, warn};

use super::errors::StrategyFault;
use crate::config::ResolverConfig;

/// Build the outbound HTTP client (timeout, user agent, optional proxy)
pub fn build_client(config: &ResolverConfig) -> Result<reqwest::Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

    let mut builder = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .default_headers(headers);

    if let Some(proxy_url) = config.proxy.as_deref() {
        debug!(proxy = proxy_url, "Routing outbound requests through proxy");
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

/// GET a URL and return the body, treating non-2xx as a fault
pub async fn get_text(client: &reqwest::Client, url: &str) -> Result<String, StrategyFault> {
    let response = client.get(url).send().await?;
    let status = response.status();

    if !status.is_success() {
        warn!(url, status = status.as_u16(), "Non-success response");
        return Err(StrategyFault::HttpStatus {
            status: status.as_u16(),
            endpoint: url.to_string(),
        });
    }

    Ok(response.text().await?)
}

/// GET a URL and parse the body as JSON
pub async fn get_json(client: &reqwest::Client, url: &str) -> Result<Value, StrategyFault> {
    let body = get_text(client, url).await?;
    Ok(serde_json::from_str(&body)?)
}

/// Read a seconds count that may be a JSON number or a numeric string
pub fn parse_seconds(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64))
        }
        _ => None,
    }
}

/// Render seconds as `m:ss`. Absent or zero gives an empty label.
pub fn format_duration(seconds: Option<u64>) -> String {
    match seconds {
        Some(secs) if secs > 0 => format!("{}:{:02}", secs / 60, secs % 60),
        _ => String::new(),
    }
}

/// Pull a non-empty string field out of a JSON object
pub fn non_empty_str(value: &Value) -> Option<String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
