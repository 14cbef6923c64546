use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    /// JSON file holding the photo records
    pub data_file: String,
    /// Directory uploaded image files are written to
    pub upload_dir: String,
    /// Maximum upload size in bytes
    pub max_upload_size: u64,
    /// Enables dangerous operations like purge. Must never be true in production.
    pub test_mode: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let bind_address =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let data_file = std::env::var("DATA_FILE").unwrap_or_else(|_| "./data.json".to_string());

        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads".to_string());

        let test_mode = std::env::var("TEST_MODE")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let max_upload_size = std::env::var("MAX_UPLOAD_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(50 * 1024 * 1024); // 50MB

        let config = Config {
            bind_address,
            data_file,
            upload_dir,
            max_upload_size,
            test_mode,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::ValidationError(
                "BIND_ADDRESS cannot be empty".to_string(),
            ));
        }

        if self.data_file.is_empty() {
            return Err(ConfigError::ValidationError(
                "DATA_FILE cannot be empty".to_string(),
            ));
        }

        if self.upload_dir.is_empty() {
            return Err(ConfigError::ValidationError(
                "UPLOAD_DIR cannot be empty".to_string(),
            ));
        }

        if self.max_upload_size == 0 {
            return Err(ConfigError::ValidationError(
                "MAX_UPLOAD_SIZE must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
