use serde::Deserialize;
use std::env;

use ceylon_catalog::PricingConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// Postgres connection string, or `memory` for the in-process store.
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

impl DatabaseConfig {
    pub fn is_memory(&self) -> bool {
        self.url.eq_ignore_ascii_case("memory")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Developer overrides, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `CEYLON__DATABASE__URL=memory`
            .add_source(config::Environment::with_prefix("CEYLON").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{File, FileFormat};

    const MINIMAL: &str = r#"
        [server]
        port = 8080

        [database]
        url = "memory"

        [auth]
        jwt_secret = "test-secret"
        jwt_expiration_seconds = 3600
    "#;

    fn parse(toml: &str) -> Config {
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults_fill_optional_sections() {
        let config = parse(MINIMAL);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.server.allowed_origins.is_empty());
        assert_eq!(config.database.max_connections, 5);
        assert!(config.database.is_memory());
        assert_eq!(config.pricing, PricingConfig::default());
    }

    #[test]
    fn test_pricing_override() {
        let toml = format!("{MINIMAL}\n[pricing]\nstay_nights = 5\n");
        let config = parse(&toml);
        assert_eq!(config.pricing.stay_nights, 5);
        assert_eq!(config.pricing.transport_days, 3);
    }
}
