// Strategy implementations, one adapter per upstream source

mod embed;
mod mirror;
mod oembed;
mod watch_page;

pub use embed::EmbedStrategy;
pub use mirror::MirrorStrategy;
pub use oembed::OEmbedStrategy;
pub use watch_page::WatchPageStrategy;
