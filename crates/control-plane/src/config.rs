// Server configuration loaded from environment variables.
// Decision: Unset APP_ENV means production, so error details stay hidden by default
// Decision: API routes live under a prefix (default "/api"); only those are rate limited

use std::time::Duration;

/// Deployment mode. Controls how much detail internal errors expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentMode {
    Development,
    #[default]
    Production,
}

impl DeploymentMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => DeploymentMode::Development,
            _ => DeploymentMode::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        *self == DeploymentMode::Development
    }
}

impl std::fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeploymentMode::Development => write!(f, "development"),
            DeploymentMode::Production => write!(f, "production"),
        }
    }
}

/// Rate limit configuration for the API routes
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per client within one window
    pub max_requests: u32,
    /// Window length
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60), // 15 minutes
        }
    }
}

/// Simulated inference delay bounds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceDelayConfig {
    pub min_ms: u64,
    pub max_ms: u64,
}

impl Default for InferenceDelayConfig {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            max_ms: 3000,
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Deployment mode
    pub mode: DeploymentMode,
    /// Prefix for all API routes (empty for none)
    pub api_prefix: String,
    /// Rate limiting for API routes
    pub rate_limit: RateLimitConfig,
    /// Simulated inference delay
    pub inference_delay: InferenceDelayConfig,
    /// Maximum accepted request body size in bytes
    pub body_limit_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            mode: DeploymentMode::default(),
            api_prefix: "/api".to_string(),
            rate_limit: RateLimitConfig::default(),
            inference_delay: InferenceDelayConfig::default(),
            body_limit_bytes: 10 * 1024 * 1024, // 10 MB
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PORT`: Listening port (default: 8000)
    /// - `APP_ENV`: "development" or "production" (default: production)
    /// - `API_PREFIX`: Prefix for API routes (default: "/api")
    /// - `RATE_LIMIT_MAX`: Requests per client per window (default: 100)
    /// - `RATE_LIMIT_WINDOW_SECS`: Window length in seconds (default: 900)
    /// - `INFERENCE_MIN_DELAY_MS` / `INFERENCE_MAX_DELAY_MS`: Simulated latency (default: 1000-3000)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let parse_or = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        let port = lookup("PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let mode = lookup("APP_ENV")
            .map(|s| DeploymentMode::from_str(&s))
            .unwrap_or_default();

        let api_prefix = lookup("API_PREFIX")
            .map(|p| normalize_prefix(&p))
            .unwrap_or(defaults.api_prefix);

        let rate_limit = RateLimitConfig {
            max_requests: parse_or("RATE_LIMIT_MAX")
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(defaults.rate_limit.max_requests),
            window: parse_or("RATE_LIMIT_WINDOW_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_limit.window),
        };

        let inference_delay = InferenceDelayConfig {
            min_ms: parse_or("INFERENCE_MIN_DELAY_MS").unwrap_or(defaults.inference_delay.min_ms),
            max_ms: parse_or("INFERENCE_MAX_DELAY_MS").unwrap_or(defaults.inference_delay.max_ms),
        };

        Self {
            port,
            mode,
            api_prefix,
            rate_limit,
            inference_delay,
            body_limit_bytes: defaults.body_limit_bytes,
        }
    }
}

/// "/api/" -> "/api", "api" -> "/api", "" or "/" -> ""
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.mode, DeploymentMode::Production);
        assert_eq!(config.api_prefix, "/api");
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
        assert_eq!(config.inference_delay, InferenceDelayConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "9100"),
            ("APP_ENV", "Development"),
            ("API_PREFIX", "v1/"),
            ("RATE_LIMIT_MAX", "5"),
            ("RATE_LIMIT_WINDOW_SECS", "60"),
        ]);
        assert_eq!(config.port, 9100);
        assert!(config.mode.is_development());
        assert_eq!(config.api_prefix, "/v1");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.rate_limit.window, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("APP_ENV", "staging"),
            ("RATE_LIMIT_WINDOW_SECS", "0"),
        ]);
        assert_eq!(config.port, 8000);
        assert_eq!(config.mode, DeploymentMode::Production);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
    }

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix("/api/"), "/api");
        assert_eq!(normalize_prefix("api"), "/api");
        assert_eq!(normalize_prefix("/"), "");
        assert_eq!(normalize_prefix(""), "");
    }
}
