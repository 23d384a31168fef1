use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

const NANOS_PER_SECOND: u64 = 1_000_000_000;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub scoring_service_url: String,
    pub scoring_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        // Log successful configuration load
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Scoring service URL: {}", config.scoring_service_url);
        tracing::debug!("CORS origins: {:?}", config.cors_allowed_origins);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            port: match var("PORT") {
                Some(p) => match p.trim().parse::<u16>() {
                    Ok(port) if port > 0 => port,
                    _ => anyhow::bail!("PORT must be a valid number between 1-65535"),
                },
                None => DEFAULT_PORT,
            },
            cors_allowed_origins: parse_origins(
                &var("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            )?,
            scoring_service_url: var("SCORING_SERVICE_URL")
                .ok_or_else(|| anyhow::anyhow!("SCORING_SERVICE_URL environment variable required"))
                .and_then(|url| {
                    let url = url.trim().to_string();
                    if !url.starts_with("http://") && !url.starts_with("https://") {
                        anyhow::bail!("SCORING_SERVICE_URL must start with http:// or https://");
                    }
                    url::Url::parse(&url).map_err(|e| {
                        anyhow::anyhow!("SCORING_SERVICE_URL is not a valid URL: {}", e)
                    })?;
                    Ok(url)
                })?,
            scoring_timeout_secs: positive(var("SCORING_TIMEOUT_SECS"), "SCORING_TIMEOUT_SECS", 30)?,
            max_body_bytes: positive(var("MAX_BODY_BYTES"), "MAX_BODY_BYTES", 1024 * 1024)?,
            rate_limit_per_second: positive(
                var("RATE_LIMIT_PER_SECOND"),
                "RATE_LIMIT_PER_SECOND",
                10,
            )
            .and_then(|rate| {
                if rate > NANOS_PER_SECOND {
                    anyhow::bail!("RATE_LIMIT_PER_SECOND must not exceed {}", NANOS_PER_SECOND);
                }
                Ok(rate)
            })?,
            rate_limit_burst: positive(var("RATE_LIMIT_BURST"), "RATE_LIMIT_BURST", 20)?,
        })
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_secs(self.scoring_timeout_secs)
    }

    /// Interval after which the limiter hands a client one more request.
    pub fn rate_limit_replenish_ns(&self) -> u64 {
        NANOS_PER_SECOND / self.rate_limit_per_second
    }
}

fn positive<T>(raw: Option<String>, name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value > T::default() => Ok(value),
        _ => anyhow::bail!("{} must be a positive integer, got '{}'", name, raw),
    }
}

/// Parses a comma separated list of browser origins (`scheme://host[:port]`).
fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect();

    if origins.is_empty() {
        anyhow::bail!("CORS_ALLOWED_ORIGINS must list at least one origin");
    }

    for origin in &origins {
        let parsed = url::Url::parse(origin)
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", origin, e))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            anyhow::bail!("CORS origin '{}' must be an http(s) origin", origin);
        }
        if parsed.path() != "/" || parsed.query().is_some() {
            anyhow::bail!("CORS origin '{}' must not contain a path", origin);
        }
    }

    Ok(origins)
}
