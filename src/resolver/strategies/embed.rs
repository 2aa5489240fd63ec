// Embed strategy - reserved slot in the chain, never produces data

use async_trait::async_trait;
use tracing::debug;

use crate::resolver::errors::StrategyFault;
use crate::resolver::models::VideoDetails;
use crate::resolver::traits::ResolveStrategy;
use crate::resolver::video_id::VideoId;

#[derive(Debug, Default)]
pub struct EmbedStrategy;

impl EmbedStrategy {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResolveStrategy for EmbedStrategy {
    fn name(&self) -> &'static str {
        "embed"
    }

    async fn resolve(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault> {
        debug!(%video_id, "Embed strategy is reserved, skipping");
        Ok(None)
    }
}
