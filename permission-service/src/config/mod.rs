use access_core::config as core_config;
use access_core::error::AppError;
use config::{Config as Cfg, File};
use serde::Deserialize;
use std::path::Path;

use crate::models::AssignmentGlobalPolicy;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AccessConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    #[serde(default)]
    pub assignment: AssignmentGlobalPolicy,
}

impl AccessConfig {
    /// Load from an optional `configuration` file and `APP__` environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::build(File::with_name("configuration").required(false))
    }

    /// Load from an explicit file; environment variables still take precedence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AppError> {
        Self::build(File::from(path.as_ref()))
    }

    fn build<S>(file: S) -> Result<Self, AppError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let config = Cfg::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;

        let loaded: AccessConfig = config.try_deserialize()?;
        tracing::debug!(
            service_name = %loaded.common.service_name,
            allow_multiple_assignees_per_role = loaded.assignment.allow_multiple_assignees_per_role,
            enforce_unique_signers = loaded.assignment.enforce_unique_signers,
            "Access configuration loaded"
        );
        Ok(loaded)
    }
}
