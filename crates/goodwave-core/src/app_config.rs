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

/// Runtime settings for the spots backend, the geocoding provider, and logging.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Root of the spots backend, without a trailing slash.
    pub api_base_url: String,
    /// Fixed user whose favorites are read and written. There is no login.
    pub user_id: u64,
    pub page_size: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub geocoder_base_url: String,
    /// Capacity of the geocoding admission gate.
    pub geocode_max_concurrent: usize,
    pub log_level: String,
}
