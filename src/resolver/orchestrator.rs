// Orchestrator with fallback logic
//
// Strategies run one after another in registration order. The first one
// that returns data wins; empty results and faults both move on to the next.
// When nothing is left the caller gets a manual-download fallback.

use std::fmt;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::errors::StrategyFault;
use super::models::{ManualFallback, Resolution, ResolvedVideo, ToolLink, VideoDetails};
use super::strategies::{EmbedStrategy, MirrorStrategy, OEmbedStrategy, WatchPageStrategy};
use super::traits::ResolveStrategy;
use super::utils::{build_client, format_duration};
use super::video_id::VideoId;
use crate::config::ResolverConfig;

/// External tools offered when every strategy comes back empty. `{id}` is replaced.
const MANUAL_TOOLS: &[(&str, &str)] = &[
    ("SaveFrom", "https://en.savefrom.net/#url=https://www.youtube.com/watch?v={id}"),
    ("Y2Mate", "https://www.y2mate.com/youtube/{id}"),
    ("SSYouTube", "https://ssyoutube.com/watch?v={id}"),
];

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    TryingStrategy(usize),
    Succeeded,
    AllExhausted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => write!(f, "not-started"),
            Self::TryingStrategy(i) => write!(f, "trying-strategy-{}", i + 1),
            Self::Succeeded => write!(f, "succeeded"),
            Self::AllExhausted => write!(f, "all-exhausted"),
        }
    }
}

pub struct Resolver {
    strategies: Vec<Box<dyn ResolveStrategy>>,
    strategy_timeout: Duration,
}

impl Resolver {
    pub fn new(strategy_timeout: Duration) -> Self {
        Self {
            strategies: Vec::new(),
            strategy_timeout,
        }
    }

    /// Standard chain: watch page, oEmbed, embed, mirrors
    pub fn from_config(config: &ResolverConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(config)?;

        let mut resolver = Self::new(Duration::from_secs(config.strategy_timeout_secs));
        resolver.add_strategy(Box::new(WatchPageStrategy::new(
            client.clone(),
            &config.youtube_base_url,
        )));
        resolver.add_strategy(Box::new(OEmbedStrategy::new(
            client.clone(),
            &config.oembed_url,
        )));
        resolver.add_strategy(Box::new(EmbedStrategy::new()));
        resolver.add_strategy(Box::new(MirrorStrategy::new(
            client,
            &config.mirrors,
            Duration::from_secs(config.request_timeout_secs),
        )));

        Ok(resolver)
    }

    pub fn add_strategy(&mut self, strategy: Box<dyn ResolveStrategy>) {
        self.strategies.push(strategy);
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Run the chain for one identifier. Never fails.
    pub async fn resolve(&self, video_id: &VideoId) -> Resolution {
        let mut state = PipelineState::NotStarted;
        debug!(%video_id, %state, strategies = self.strategies.len(), "Starting resolution");

        for (index, strategy) in self.strategies.iter().enumerate() {
            state = PipelineState::TryingStrategy(index);
            debug!(%video_id, %state, strategy = strategy.name(), "Trying strategy");

            match self.run_strategy(strategy.as_ref(), video_id).await {
                Ok(Some(details)) => {
                    state = PipelineState::Succeeded;
                    info!(%video_id, %state, strategy = strategy.name(), "✓ Resolved");
                    return Resolution::Success(into_resolved(video_id, details, strategy.name()));
                }
                Ok(None) => {
                    info!(%video_id, strategy = strategy.name(), "✗ No data");
                }
                Err(fault) => {
                    warn!(%video_id, strategy = strategy.name(), error = %fault, "✗ Fault");
                }
            }
        }

        state = PipelineState::AllExhausted;
        info!(%video_id, %state, "Every strategy failed, offering manual tools");
        Resolution::ManualFallback(manual_fallback(video_id))
    }

    async fn run_strategy(
        &self,
        strategy: &dyn ResolveStrategy,
        video_id: &VideoId,
    ) -> Result<Option<VideoDetails>, StrategyFault> {
        let deadline = strategy.deadline(self.strategy_timeout);
        match timeout(deadline, strategy.resolve(video_id)).await {
            Ok(result) => result,
            Err(_) => Err(StrategyFault::Deadline(deadline.as_secs())),
        }
    }
}

fn into_resolved(video_id: &VideoId, details: VideoDetails, source: &'static str) -> ResolvedVideo {
    ResolvedVideo {
        video_id: video_id.to_string(),
        title: details.title,
        author: details.author,
        duration: format_duration(details.duration_seconds),
        thumbnail: details.thumbnail,
        formats: details.formats,
        source,
    }
}

/// Terminal fallback, every tool link carries the identifier
pub fn manual_fallback(video_id: &VideoId) -> ManualFallback {
    ManualFallback {
        video_id: video_id.to_string(),
        tools: MANUAL_TOOLS
            .iter()
            .map(|&(name, template)| ToolLink {
                name,
                url: template.replace("{id}", &video_id.url_encoded()),
            })
            .collect(),
    }
}
