use std::net::SocketAddr;
use std::path::PathBuf;

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

/// Runtime settings for the CLI and HTTP front-ends.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub dataset_path: PathBuf,
    pub log_level: String,
    pub bind_addr: SocketAddr,
    /// Maximum number of institutions held in a side-by-side comparison.
    pub compare_capacity: usize,
}
