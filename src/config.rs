//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// Built once at startup and shared read-only with every handler.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP listen port, bound on all interfaces.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Deployment environment name.
    #[serde(rename = "node_env", default = "default_environment")]
    pub environment: String,

    /// Application name reported by `/` and `/api/info`.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Secret value reported by `/secret`.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Serve the `/secret` route at all.
    #[serde(default = "default_true")]
    pub secret_endpoint: bool,

    // === Observability ===
    /// Install the Prometheus recorder and serve `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,
}

/// Filter used with `--verbose`.
pub const VERBOSE_LOG_FILTER: &str = "ecs_health_server=debug,info";

fn default_port() -> u16 {
    3000
}

fn default_environment() -> String {
    "development".to_string()
}

fn default_app_name() -> String {
    "nodejs-ecs-test".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            environment: default_environment(),
            app_name: default_app_name(),
            app_secret: None,
            secret_endpoint: true,
            metrics_enabled: true,
            rust_log: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Build configuration from an explicit set of variables.
    ///
    /// Variables holding an empty string count as unset, so their defaults apply.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars.into_iter().filter(|(_, value)| !value.is_empty()))
    }

    /// Tracing filter directives; `verbose` forces debug output for this crate.
    pub fn log_filter(&self, verbose: bool) -> &str {
        if verbose {
            VERBOSE_LOG_FILTER
        } else {
            &self.rust_log
        }
    }

    /// Whether a non-empty secret is configured.
    pub fn has_secret(&self) -> bool {
        self.app_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}
