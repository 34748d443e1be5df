use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty allows any origin.
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetentionConfig {
    /// Maximum number of upload batches kept at any time.
    pub max_batches: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Request body limit for CSV uploads, in bytes.
    pub max_bytes: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    /// Maximum number of records listed in the PDF table.
    pub max_rows: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub retention: RetentionConfig,
    pub upload: UploadConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("database.url", "sqlite://chemviz.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("retention.max_batches", common::DEFAULT_MAX_BATCHES)?
            .set_default("upload.max_bytes", 16 * 1024 * 1024)?
            .set_default("report.max_rows", 20)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., CHEMVIZ__DATABASE__URL)
            .add_source(
                Environment::with_prefix("CHEMVIZ")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("server.cors.allow_origins")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = s.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the retention or upload invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention.max_batches == 0 {
            return Err(ConfigError::Message(
                "retention.max_batches must be at least 1".into(),
            ));
        }
        if self.upload.max_bytes == 0 {
            return Err(ConfigError::Message(
                "upload.max_bytes must be greater than 0".into(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 3000,
                cors: CorsConfig {
                    allow_origins: vec![],
                    max_age: 3600,
                },
            },
            database: DatabaseConfig {
                url: "sqlite://chemviz.db?mode=rwc".into(),
                max_connections: 10,
            },
            retention: RetentionConfig {
                max_batches: common::DEFAULT_MAX_BATCHES,
            },
            upload: UploadConfig {
                max_bytes: 16 * 1024 * 1024,
            },
            report: ReportConfig { max_rows: 20 },
        }
    }
}
