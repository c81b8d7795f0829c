//! Application configuration loaded from environment variables.

use std::env;

use quill_infra::{DatabaseConfig, JwtConfig};

const DEFAULT_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    /// Prefix of every API route, without a trailing slash. Empty for `/`.
    pub api_base_path: String,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub cache_control: String,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// Create the demo account at startup when it does not exist yet.
    pub seed_demo_user: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string()),
            api_base_path: normalize_base_path(
                &env::var("API_BASE_PATH").unwrap_or_else(|_| "/".to_string()),
            ),
            cors_origins: parse_origins(&env::var("CORS_WHITELIST_ORIGINS").unwrap_or_default()),
            cache_control: env::var("HTTP_DEFAULT_CACHE_CONTROL")
                .unwrap_or_else(|_| DEFAULT_CACHE_CONTROL.to_string()),
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            seed_demo_user: env::var("SEED_DEMO_USER")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

/// `"/"` and `""` mean no prefix; otherwise ensure one leading slash and no
/// trailing slash.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("/"), "");
        assert_eq!(normalize_base_path(""), "");
        assert_eq!(normalize_base_path("api/v1/"), "/api/v1");
        assert_eq!(normalize_base_path("/api"), "/api");
    }

    #[test]
    fn test_parse_origins() {
        assert!(parse_origins("").is_empty());
        assert_eq!(
            parse_origins("https://a.dev, https://b.dev,"),
            vec!["https://a.dev", "https://b.dev"]
        );
    }
}
