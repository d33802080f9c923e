//! Application configuration for the whatif backend.
//!
//! Covers logging, model selection and where extra scenario files are read from.

use anyhow::Result;
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;

use super::cli::CliConfig;
use crate::scenario::ScenarioLoader;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Level {
        match self {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Which model the binary wires into the orchestrator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChoice {
    /// Illustrative bond portfolio risk model
    Demo,
    /// Placeholder that answers every scenario with a fixed message
    Stub,
}

impl FromStr for ModelChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "demo" => Ok(ModelChoice::Demo),
            "stub" => Ok(ModelChoice::Stub),
            _ => Err(anyhow::anyhow!(
                "Invalid model '{}'. Must be 'demo' or 'stub'",
                s
            )),
        }
    }
}

impl fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelChoice::Demo => write!(f, "demo"),
            ModelChoice::Stub => write!(f, "stub"),
        }
    }
}

/// Application configuration structure
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: LogLevel,
    pub model: ModelChoice,
    pub scenario_dirs: Vec<String>,
    pub no_default_scenarios: bool,
}

impl AppConfig {
    /// Create application configuration from CLI config
    pub fn from_cli(cli_config: &CliConfig) -> Result<Self> {
        let log_level = if cli_config.verbose {
            LogLevel::Debug
        } else {
            match env::var("RUST_LOG") {
                Ok(level_str) => Self::parse_log_level(&level_str),
                Err(_) => LogLevel::Info,
            }
        };

        Ok(Self {
            log_level,
            model: cli_config.model.parse()?,
            scenario_dirs: cli_config.scenario_dirs.clone(),
            no_default_scenarios: cli_config.no_default_scenarios,
        })
    }

    /// Main level of a RUST_LOG value such as `info,some_crate=warn`
    fn parse_log_level(level_str: &str) -> LogLevel {
        let main_level = level_str
            .split(',')
            .next()
            .unwrap_or(level_str)
            .split('=')
            .next()
            .unwrap_or(level_str)
            .to_lowercase();

        match main_level.as_str() {
            "error" => LogLevel::Error,
            "warn" => LogLevel::Warn,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Info,
        }
    }

    /// Initialize logging. Output goes to stderr so stdout stays machine-readable.
    pub fn init_logging(&self) -> Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level.to_tracing_level())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .with_ansi(false)
            .event_format(
                tracing_subscriber::fmt::format()
                    .with_target(false)
                    .compact(),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

        tracing::debug!("Logging initialized with level: {:?}", self.log_level);
        Ok(())
    }

    /// Scenario loader for the configured directories
    pub fn scenario_loader(&self) -> ScenarioLoader {
        let extra = self.scenario_dirs.iter().map(PathBuf::from);

        if self.no_default_scenarios {
            ScenarioLoader::with_directories(extra.collect())
        } else {
            let mut loader = ScenarioLoader::new();
            loader.add_directories(extra);
            loader
        }
    }

    /// Validate application configuration
    pub fn validate(&self) -> Result<()> {
        if self.scenario_dirs.iter().any(|d| d.trim().is_empty()) {
            return Err(anyhow::anyhow!("Scenario directory cannot be empty"));
        }

        Ok(())
    }
}

/// Builder pattern for AppConfig
pub struct AppConfigBuilder {
    log_level: Option<LogLevel>,
    model: Option<ModelChoice>,
    scenario_dirs: Option<Vec<String>>,
    no_default_scenarios: Option<bool>,
}

impl AppConfigBuilder {
    pub fn new() -> Self {
        Self {
            log_level: None,
            model: None,
            scenario_dirs: None,
            no_default_scenarios: None,
        }
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    pub fn model(mut self, model: ModelChoice) -> Self {
        self.model = Some(model);
        self
    }

    pub fn scenario_dirs(mut self, dirs: Vec<String>) -> Self {
        self.scenario_dirs = Some(dirs);
        self
    }

    pub fn no_default_scenarios(mut self, no_defaults: bool) -> Self {
        self.no_default_scenarios = Some(no_defaults);
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<AppConfig> {
        let config = AppConfig {
            log_level: self.log_level.unwrap_or(LogLevel::Info),
            model: self.model.unwrap_or(ModelChoice::Demo),
            scenario_dirs: self.scenario_dirs.unwrap_or_default(),
            no_default_scenarios: self.no_default_scenarios.unwrap_or(false),
        };

        config.validate()?;
        Ok(config)
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
