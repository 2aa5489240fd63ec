// Resolution strategy trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::errors::StrategyFault;
use super::models::VideoDetails;
use super::video_id::VideoId;

/// One independent way of turning a video identifier into metadata.
///
/// `Ok(None)` means the source had nothing usable; `Err` means the attempt
/// itself broke. The orchestrator treats both as "try the next one".
#[async_trait]
pub trait ResolveStrategy: Send + Sync {
    /// Name of the strategy (for logging and the `source` field)
    fn name(&self) -> &'static str;

    /// Time budget for one `resolve` call, given the configured per-strategy budget
    fn deadline(&self, base: Duration) -> Duration {
        base
    }

    /// Try to resolve the identifier
    async fn resolve(&self, video_id: &VideoId) -> Result<Option<VideoDetails>, StrategyFault>;
}
