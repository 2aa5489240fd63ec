// Resolver module - video identifier to stream metadata
//
// Strategies (tried in this order):
// - Watch page scrape: embedded player response, full format list
// - oEmbed: title/author/thumbnail only
// - Embed: reserved, always empty
// - Mirrors: alternate public API instances, first good answer wins
//
// If all of them come back empty the caller gets a list of manual tools.

pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod orchestrator;
pub mod strategies;
pub mod traits;
pub mod utils;
pub mod video_id;

pub use errors::{InputError, StrategyFault};
pub use models::{ManualFallback, Resolution, ResolvedVideo, StreamFormat, ToolLink, VideoDetails};
pub use orchestrator::{PipelineState, Resolver};
pub use traits::ResolveStrategy;
pub use video_id::VideoId;
