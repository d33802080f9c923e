//! Configuration management module for the whatif backend.
//!
//! Combines CLI argument parsing, environment-derived settings and validation.

pub mod app_config;
pub mod cli;

pub use app_config::{AppConfig, AppConfigBuilder, LogLevel, ModelChoice};
pub use cli::{CliAction, CliConfig};

use anyhow::Result;

/// Main configuration manager that combines all configuration sources
#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub app: AppConfig,
    pub action: CliAction,
}

impl ConfigManager {
    /// Creates a new configuration manager from CLI arguments and environment
    pub fn from_cli_and_env() -> Result<Self> {
        let cli_config = CliConfig::from_args()?;
        Self::from_cli(&cli_config)
    }

    pub fn from_cli(cli_config: &CliConfig) -> Result<Self> {
        cli_config.validate()?;
        Ok(Self {
            app: AppConfig::from_cli(cli_config)?,
            action: cli_config.action.clone(),
        })
    }

    /// Validates the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.app.validate()
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> Result<()> {
        self.app.init_logging()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use whatif_shared::FieldMap;

    #[test]
    fn test_config_manager_validation() {
        let cli_config = CliConfig {
            verbose: false,
            model: "demo".to_string(),
            scenario_dirs: vec![],
            no_default_scenarios: false,
            action: CliAction::Serve,
        };

        let config_manager = ConfigManager::from_cli(&cli_config).unwrap();

        assert!(config_manager.validate().is_ok());
        assert_eq!(config_manager.app.model, ModelChoice::Demo);
        assert_eq!(config_manager.action, CliAction::Serve);
    }

    #[test]
    fn test_config_manager_rejects_invalid_action() {
        let cli_config = CliConfig {
            verbose: false,
            model: "demo".to_string(),
            scenario_dirs: vec![],
            no_default_scenarios: false,
            action: CliAction::Run {
                name: String::new(),
                overrides: FieldMap::new(),
            },
        };

        assert!(ConfigManager::from_cli(&cli_config).is_err());
    }
}
