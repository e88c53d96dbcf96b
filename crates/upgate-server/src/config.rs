//! Startup configuration.
//!
//! Command-line flags fall back to environment variables (a `.env` file is
//! loaded by `main` first). [`ServerConfig::from_args`] validates everything
//! once; the result is immutable for the life of the process.

use std::net::SocketAddr;

use clap::Parser;
use upgate_core::config::{
    ANDROID_STORE_URL_TEMPLATE, DEFAULT_MIN_VERSION, DEFAULT_RELEASE_NOTES,
    IOS_STORE_URL_TEMPLATE,
};
use upgate_core::{EngineConfig, Error, PlatformPolicy, Result, VersionParsing};
use upgate_crypto::SigningKey;

#[derive(Parser, Debug, Clone)]
#[command(name = "upgate-server")]
#[command(version, about = "Upgate server - signed minimum-version checks for mobile apps")]
pub struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:3000", env = "LISTEN_ADDR")]
    pub addr: SocketAddr,

    /// Port override for the listen address.
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Shared secret used to sign responses. Required.
    #[arg(long, env = "API_SECRET", hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Minimum version for Android clients.
    #[arg(long, default_value = DEFAULT_MIN_VERSION, env = "MIN_VERSION_ANDROID")]
    pub min_version_android: String,

    /// Minimum version for iOS clients.
    #[arg(long, default_value = DEFAULT_MIN_VERSION, env = "MIN_VERSION_IOS")]
    pub min_version_ios: String,

    /// Android store URL template; `{id}` is replaced with the app id.
    #[arg(long, default_value = ANDROID_STORE_URL_TEMPLATE, env = "ANDROID_STORE_URL")]
    pub android_store_url: String,

    /// iOS store URL template; `{id}` is replaced with the app id.
    #[arg(long, default_value = IOS_STORE_URL_TEMPLATE, env = "IOS_STORE_URL")]
    pub ios_store_url: String,

    /// Release note sent with every response.
    #[arg(long, default_value = DEFAULT_RELEASE_NOTES, env = "RELEASE_NOTES")]
    pub release_notes: String,

    /// Reject malformed version strings instead of comparing them leniently.
    #[arg(long, env = "STRICT_VERSIONS")]
    pub strict_versions: bool,

    /// Per-IP request rate on the check routes. 0 disables rate limiting.
    #[arg(long, default_value_t = 0, env = "RATE_LIMIT_PER_SECOND")]
    pub rate_limit_per_second: u64,

    /// Requests a single IP may burst above the steady rate.
    #[arg(long, default_value_t = 10, env = "RATE_LIMIT_BURST")]
    pub rate_limit_burst: u32,

    /// Key the rate limit on `X-Forwarded-For` / `X-Real-IP` / `Forwarded`
    /// instead of the peer address. Only safe behind a proxy that sets them.
    #[arg(long, env = "TRUST_PROXY_HEADERS")]
    pub trust_proxy_headers: bool,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

/// Highest steady rate the limiter can express (one token per millisecond).
pub const MAX_RATE_LIMIT_PER_SECOND: u64 = 1000;

/// Per-IP rate limit on the check routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub per_second: u64,
    pub burst: u32,
    /// Take the client IP from proxy headers rather than the socket peer.
    pub trust_proxy_headers: bool,
}

impl RateLimit {
    /// Milliseconds between quota replenishments.
    pub fn replenish_interval_ms(&self) -> u64 {
        (1000 / self.per_second.max(1)).max(1)
    }
}

/// Validated server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub engine: EngineConfig,
    pub signing_key: SigningKey,
    pub rate_limit: Option<RateLimit>,
    pub log_json: bool,
}

impl ServerConfig {
    /// Validate `args`. Fails when the signing secret is missing or empty,
    /// when a store URL template lacks `{id}`, or (strict mode) when a
    /// minimum version is malformed.
    pub fn from_args(args: Args) -> Result<Self> {
        let secret = args
            .api_secret
            .filter(|s| !s.is_empty())
            .ok_or_else(|| Error::Config("API_SECRET must be set to a non-empty value".into()))?;
        let signing_key = SigningKey::from_secret_str(&secret)
            .map_err(|e| Error::Config(e.to_string()))?;

        let engine = EngineConfig {
            android: PlatformPolicy::new(args.min_version_android, args.android_store_url),
            ios: PlatformPolicy::new(args.min_version_ios, args.ios_store_url),
            release_notes: args.release_notes,
            version_parsing: if args.strict_versions {
                VersionParsing::Strict
            } else {
                VersionParsing::Lenient
            },
        };
        engine.validate()?;

        let rate_limit = match (args.rate_limit_per_second, args.rate_limit_burst) {
            (0, _) => None,
            (per_second, _) if per_second > MAX_RATE_LIMIT_PER_SECOND => {
                return Err(Error::Config(format!(
                    "RATE_LIMIT_PER_SECOND must be at most {MAX_RATE_LIMIT_PER_SECOND}, got {per_second}"
                )));
            }
            (_, 0) => {
                return Err(Error::Config(
                    "RATE_LIMIT_BURST must be positive when rate limiting is enabled".into(),
                ));
            }
            (per_second, burst) => Some(RateLimit {
                per_second,
                burst,
                trust_proxy_headers: args.trust_proxy_headers,
            }),
        };

        let mut addr = args.addr;
        if let Some(port) = args.port {
            addr.set_port(port);
        }

        Ok(Self {
            addr,
            engine,
            signing_key,
            rate_limit,
            log_json: args.log_json,
        })
    }
}
