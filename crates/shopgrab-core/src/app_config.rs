use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Remote-debugging HTTP endpoint of the Chrome instance that renders pages.
    ///
    /// Hosted browsers often carry an access token in the query string, so the
    /// `Debug` impl redacts everything after `?`.
    pub cdp_endpoint: String,
    pub navigation_timeout_secs: u64,
    pub cdp_command_timeout_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    #[must_use]
    pub fn cdp_command_timeout(&self) -> Duration {
        Duration::from_secs(self.cdp_command_timeout_secs)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("cdp_endpoint", &redact_query(&self.cdp_endpoint))
            .field("navigation_timeout_secs", &self.navigation_timeout_secs)
            .field("cdp_command_timeout_secs", &self.cdp_command_timeout_secs)
            .finish()
    }
}

fn redact_query(endpoint: &str) -> String {
    match endpoint.split_once('?') {
        Some((base, _)) => format!("{base}?[redacted]"),
        None => endpoint.to_string(),
    }
}
