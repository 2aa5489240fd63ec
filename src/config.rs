// Configuration: built-in defaults < JSON file < command line / environment

use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use url::Url;

const APP_DIR: &str = "youtube-resolver";
const CONFIG_FILE: &str = "config.json";

/// Command line arguments. Every flag can also come from the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "youtube-resolver", version, about = "Resolve YouTube links to stream metadata over HTTP")]
pub struct Cli {
    /// Path to a JSON config file
    #[arg(long, env = "RESOLVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "HOST")]
    pub host: Option<IpAddr>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// HTTP or SOCKS5 proxy for outbound requests
    #[arg(long, env = "RESOLVER_PROXY")]
    pub proxy: Option<String>,

    /// Mirror instance base URL (repeat or comma separate)
    #[arg(long = "mirror", env = "RESOLVER_MIRRORS", value_delimiter = ',')]
    pub mirrors: Vec<String>,

    /// Per-request timeout in seconds
    #[arg(long, env = "RESOLVER_REQUEST_TIMEOUT")]
    pub request_timeout: Option<u64>,

    /// Per-strategy timeout in seconds
    #[arg(long, env = "RESOLVER_STRATEGY_TIMEOUT")]
    pub strategy_timeout: Option<u64>,

    /// Attribution stamped on every response
    #[arg(long, env = "RESOLVER_CHANNEL")]
    pub channel: Option<String>,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

/// Settings for the resolution pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Where watch pages are fetched from
    pub youtube_base_url: String,
    /// oEmbed metadata endpoint
    pub oembed_url: String,
    /// Mirror API instances, queried in order
    pub mirrors: Vec<String>,
    /// HTTP client timeout per request
    pub request_timeout_secs: u64,
    /// Upper bound for one strategy, all its requests included
    pub strategy_timeout_secs: u64,
    /// User-Agent sent upstream
    pub user_agent: String,
    /// SOCKS5/HTTP proxy URL
    pub proxy: Option<String>,
    /// Attribution stamped on every response
    pub channel: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            youtube_base_url: "https://www.youtube.com".to_string(),
            oembed_url: "https://www.youtube.com/oembed".to_string(),
            mirrors: vec![
                "https://inv.nadeko.net".to_string(),
                "https://invidious.nerdvpn.de".to_string(),
                "https://yewtu.be".to_string(),
            ],
            request_timeout_secs: 10,
            strategy_timeout_secs: 20,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36".to_string(),
            proxy: None,
            channel: "@mrshaban282".to_string(),
        }
    }
}

impl ResolverConfig {
    pub fn with_proxy(mut self, proxy: Option<String>) -> Self {
        self.proxy = proxy;
        self
    }

    pub fn with_youtube_base_url(mut self, url: impl Into<String>) -> Self {
        self.youtube_base_url = url.into();
        self
    }

    pub fn with_oembed_url(mut self, url: impl Into<String>) -> Self {
        self.oembed_url = url.into();
        self
    }

    pub fn with_mirrors(mut self, mirrors: Vec<String>) -> Self {
        self.mirrors = mirrors;
        self
    }

    pub fn with_timeouts(mut self, request_secs: u64, strategy_secs: u64) -> Self {
        self.request_timeout_secs = request_secs;
        self.strategy_timeout_secs = strategy_secs;
        self
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 || self.strategy_timeout_secs == 0 {
            bail!("timeouts must be at least one second");
        }

        for endpoint in [&self.youtube_base_url, &self.oembed_url]
            .into_iter()
            .chain(self.mirrors.iter())
        {
            Url::parse(endpoint).with_context(|| format!("invalid endpoint URL: {}", endpoint))?;
        }

        Ok(())
    }
}

/// Full service configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub resolver: ResolverConfig,
}

impl Config {
    /// Resolve the final configuration for this process
    pub fn load(cli: &Cli) -> Result<Self> {
        let base = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        let config = base.with_overrides(cli);
        config.resolver.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Apply command line / environment values on top
    pub fn with_overrides(mut self, cli: &Cli) -> Self {
        if let Some(host) = cli.host {
            self.server.host = host;
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if cli.proxy.is_some() {
            self.resolver.proxy = cli.proxy.clone();
        }
        if !cli.mirrors.is_empty() {
            self.resolver.mirrors = cli
                .mirrors
                .iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }
        if let Some(secs) = cli.request_timeout {
            self.resolver.request_timeout_secs = secs;
        }
        if let Some(secs) = cli.strategy_timeout {
            self.resolver.strategy_timeout_secs = secs;
        }
        if let Some(channel) = &cli.channel {
            self.resolver.channel = channel.clone();
        }
        self
    }
}

/// `<config dir>/youtube-resolver/config.json`
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.resolver.mirrors.len(), 3);
        assert!(config.resolver.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let path = std::env::temp_dir().join(format!("youtube-resolver-test-{}.json", std::process::id()));
        fs::write(
            &path,
            r#"{ "server": { "port": 8081 }, "resolver": { "mirrors": ["https://mirror.example"] } }"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, ServerConfig::default().host);
        assert_eq!(config.resolver.mirrors, vec!["https://mirror.example".to_string()]);
        assert_eq!(config.resolver.request_timeout_secs, 10);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(Config::from_file(Path::new("/nonexistent/youtube-resolver.json")).is_err());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "youtube-resolver",
            "--port",
            "8080",
            "--mirror",
            "https://a.example,https://b.example",
            "--strategy-timeout",
            "5",
            "--channel",
            "@someone",
        ])
        .unwrap();

        let config = Config::default().with_overrides(&cli);
        assert_eq!(config.server.port, 8080);
        assert_eq!(
            config.resolver.mirrors,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert_eq!(config.resolver.strategy_timeout_secs, 5);
        assert_eq!(config.resolver.channel, "@someone");
    }

    #[test]
    fn test_environment_names() {
        use clap::CommandFactory;

        let cmd = Cli::command();
        let env_of = |id: &str| {
            cmd.get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .and_then(|env| env.to_str())
                .map(str::to_string)
        };

        assert_eq!(env_of("host").as_deref(), Some("HOST"));
        assert_eq!(env_of("port").as_deref(), Some("PORT"));
        assert_eq!(env_of("mirrors").as_deref(), Some("RESOLVER_MIRRORS"));
    }

    #[test]
    fn test_validation() {
        let zero = ResolverConfig::default().with_timeouts(0, 5);
        assert!(zero.validate().is_err());

        let bad_mirror = ResolverConfig::default().with_mirrors(vec!["not a url".to_string()]);
        assert!(bad_mirror.validate().is_err());

        let custom = ResolverConfig::default()
            .with_youtube_base_url("http://127.0.0.1:9000")
            .with_channel("@me");
        assert!(custom.validate().is_ok());
        assert_eq!(custom.channel, "@me");
    }
}
