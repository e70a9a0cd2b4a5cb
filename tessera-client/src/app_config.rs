use serde::Deserialize;
use std::env;
use std::time::Duration;

use tessera_booking::ResolverConfig;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub resolver: ResolverSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL of the ticketing backend, e.g. `https://api.example.com/api/v1`.
    pub base_url: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverSettings {
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Unset means poll indefinitely while the payment stays pending.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

fn default_poll_interval() -> u64 {
    6
}

impl ResolverSettings {
    pub fn to_resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            poll_interval: Duration::from_secs(self.poll_interval_seconds),
            max_attempts: self.max_attempts,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        // Layered sources, later ones override earlier ones: defaults,
        // then the RUN_MODE file, then an untracked local file, then
        // TESSERA__-prefixed env vars (e.g. TESSERA__API__BASE_URL).
        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("TESSERA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
