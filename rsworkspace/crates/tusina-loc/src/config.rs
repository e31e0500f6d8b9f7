use std::time::Duration;

use crate::env::ReadEnv;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["https://ollijuutilainen.github.io", "http://localhost:8080"];
const DEFAULT_CORS_MAX_AGE_SECS: u64 = 24 * 60 * 60;

/// Prefix of the env vars that seed the in-memory store:
/// `LOC_RECORD_<token>=<raw json>`.
pub const RECORD_SEED_PREFIX: &str = "LOC_RECORD_";

/// Configuration for the location lookup server.
///
/// Resolved from environment variables:
/// - `LOC_PORT`: HTTP listening port (default: 8080)
/// - `LOC_ALLOWED_ORIGINS`: comma-separated exact origins that get their
///   `Origin` reflected (default: the GitHub Pages site and localhost:8080).
///   Set but empty means no origin is reflected.
/// - `LOC_CORS_MAX_AGE_SECS`: `Access-Control-Max-Age` value (default: 86400)
/// - `LOC_REDIS_URL`: use the Redis store at this URL (requires the `redis` feature)
/// - `LOC_REDIS_KEY_PREFIX`: prefix prepended to tokens to form Redis keys (default: empty)
#[derive(Debug, Clone)]
pub struct LocConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub cors_max_age: Duration,
    pub redis_url: Option<String>,
    pub redis_key_prefix: String,
}

impl LocConfig {
    pub fn from_env<E: ReadEnv>(env: &E) -> Self {
        Self {
            port: env
                .var("LOC_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            allowed_origins: env
                .var("LOC_ALLOWED_ORIGINS")
                .map(|v| parse_origin_list(&v))
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.iter().map(|s| s.to_string()).collect()),
            cors_max_age: Duration::from_secs(
                env.var("LOC_CORS_MAX_AGE_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CORS_MAX_AGE_SECS),
            ),
            redis_url: env.var("LOC_REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            redis_key_prefix: env.var("LOC_REDIS_KEY_PREFIX").unwrap_or_default(),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks and later duplicates.
fn parse_origin_list(raw: &str) -> Vec<String> {
    let mut origins: Vec<String> = Vec::new();
    for origin in raw.split(',').map(str::trim).filter(|o| !o.is_empty()) {
        if !origins.iter().any(|o| o == origin) {
            origins.push(origin.to_string());
        }
    }
    origins
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::InMemoryEnv;

    #[test]
    fn defaults_when_no_env_vars() {
        let env = InMemoryEnv::new();
        let config = LocConfig::from_env(&env);

        assert_eq!(config.port, 8080);
        assert_eq!(
            config.allowed_origins,
            vec!["https://ollijuutilainen.github.io", "http://localhost:8080"]
        );
        assert_eq!(config.cors_max_age, Duration::from_secs(86400));
        assert!(config.redis_url.is_none());
        assert_eq!(config.redis_key_prefix, "");
    }

    #[test]
    fn reads_all_env_vars() {
        let env = InMemoryEnv::new();
        env.set("LOC_PORT", "9090");
        env.set("LOC_ALLOWED_ORIGINS", "https://a.example, https://b.example");
        env.set("LOC_CORS_MAX_AGE_SECS", "600");
        env.set("LOC_REDIS_URL", "redis://cache:6379");
        env.set("LOC_REDIS_KEY_PREFIX", "loc:");

        let config = LocConfig::from_env(&env);

        assert_eq!(config.port, 9090);
        assert_eq!(config.allowed_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.cors_max_age, Duration::from_secs(600));
        assert_eq!(config.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.redis_key_prefix, "loc:");
    }

    #[test]
    fn invalid_port_falls_back_to_default() {
        let env = InMemoryEnv::new();
        env.set("LOC_PORT", "not-a-number");

        assert_eq!(LocConfig::from_env(&env).port, 8080);
    }

    #[test]
    fn empty_origin_list_denies_everything() {
        let env = InMemoryEnv::new();
        env.set("LOC_ALLOWED_ORIGINS", " , ");

        assert!(LocConfig::from_env(&env).allowed_origins.is_empty());
    }

    #[test]
    fn origin_list_keeps_order_and_drops_duplicates() {
        assert_eq!(
            parse_origin_list("https://b.example,https://a.example,https://b.example"),
            vec!["https://b.example", "https://a.example"]
        );
    }

    #[test]
    fn blank_redis_url_is_ignored() {
        let env = InMemoryEnv::new();
        env.set("LOC_REDIS_URL", "  ");

        assert!(LocConfig::from_env(&env).redis_url.is_none());
    }
}
