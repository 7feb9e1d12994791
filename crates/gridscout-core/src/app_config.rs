use std::net::SocketAddr;

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
    /// Key for the places/geocoding/static-imagery provider. Required.
    pub maps_api_key: String,
    /// Key for the vision model provider. Absent → satellite scan skipped.
    pub vision_api_key: Option<String>,
    pub vision_model: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
    /// Delay between keyword phrase iterations.
    pub phrase_delay_ms: u64,
    /// Delay before fetching a pagination continuation page.
    pub page_delay_ms: u64,
    /// Delay between satellite grid cell analyses.
    pub cell_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("maps_api_key", &"[redacted]")
            .field(
                "vision_api_key",
                &self.vision_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("vision_model", &self.vision_model)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_ms", &self.retry_backoff_base_ms)
            .field("phrase_delay_ms", &self.phrase_delay_ms)
            .field("page_delay_ms", &self.page_delay_ms)
            .field("cell_delay_ms", &self.cell_delay_ms)
            .finish()
    }
}
