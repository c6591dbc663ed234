use crate::error::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:5000/upload";

/// Runtime settings, read from an optional `intake.toml` and `INTAKE_*`
/// environment variables. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    pub endpoint: String,
    pub request_timeout_secs: u64,
    pub accepted_extensions: Vec<String>,
    pub log_filter: String,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 120,
            accepted_extensions: ["pdf", "jpg", "jpeg", "png", "tiff", "txt"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            log_filter: "info".to_string(),
        }
    }
}

impl IntakeConfig {
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("intake.toml"))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix("INTAKE").try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Case-insensitive extension check against `accepted_extensions`.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_lowercase();
                self.accepted_extensions
                    .iter()
                    .any(|accepted| accepted.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}
