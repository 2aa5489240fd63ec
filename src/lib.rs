pub mod config;
mod logging;
pub mod resolver;
pub mod response;
pub mod server;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

pub use config::{Cli, Config, ResolverConfig, ServerConfig};
pub use resolver::{
    InputError, ManualFallback, Resolution, ResolvedVideo, ResolveStrategy, Resolver,
    StrategyFault, StreamFormat, ToolLink, VideoDetails, VideoId,
};
pub use server::{router, AppState};

/// Parse arguments, load config and serve until Ctrl-C
pub async fn run() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(&cli)?;

    let resolver = Resolver::from_config(&config.resolver)
        .context("failed to build HTTP client")?;
    info!(strategies = ?resolver.strategy_names(), mirrors = config.resolver.mirrors.len(), "Resolver ready");

    let app = router(AppState::new(resolver, &config.resolver.channel));

    let addr = (config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}:{}", addr.0, addr.1))?;
    info!("YouTube resolver API running on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
