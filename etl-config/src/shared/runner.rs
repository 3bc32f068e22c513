use serde::{Deserialize, Serialize};

use crate::Config;
use crate::shared::{PipelineConfig, SecretsConfig, StorageConfig, ValidationError};

/// Complete configuration of the `etl-runner` binary.
///
/// Contains no secrets: database credentials are fetched from the secret store at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerConfig {
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
}

impl RunnerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.pipeline.validate()?;
        self.storage.validate()?;
        self.secrets.validate()
    }
}

impl Config for RunnerConfig {
    const LIST_PARSE_KEYS: &'static [&'static str] = &["pipeline.tables"];
}
