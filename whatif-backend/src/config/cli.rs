//! CLI argument parsing for the whatif backend.
//!
//! Global flags select the model and where extra scenario files come from; the
//! subcommand selects a one-shot command or the long-running session server.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};

use whatif_shared::{Command as EngineCommand, FieldMap};

/// What the binary was asked to do
#[derive(Debug, Clone, PartialEq)]
pub enum CliAction {
    Scenarios,
    Schema,
    Inputs,
    Run {
        name: String,
        overrides: FieldMap,
    },
    Compare {
        scenario_a: String,
        scenario_b: String,
        metrics: Vec<String>,
    },
    Override {
        source: String,
        field: String,
        value: f64,
    },
    Reset,
    Serve,
}

impl CliAction {
    /// The engine command a one-shot action runs; `None` for `serve`
    pub fn to_command(&self) -> Option<EngineCommand> {
        let command = match self {
            CliAction::Scenarios => EngineCommand::GetAvailableScenarios,
            CliAction::Schema => EngineCommand::GetModelSchema,
            CliAction::Inputs => EngineCommand::GetModelInputs,
            CliAction::Run { name, overrides } => EngineCommand::RunScenario {
                name: name.clone(),
                overrides: (!overrides.is_empty()).then(|| overrides.clone()),
            },
            CliAction::Compare {
                scenario_a,
                scenario_b,
                metrics,
            } => EngineCommand::CompareScenarios {
                scenario_a: scenario_a.clone(),
                scenario_b: scenario_b.clone(),
                metrics: (!metrics.is_empty()).then(|| metrics.clone()),
            },
            CliAction::Override {
                source,
                field,
                value,
            } => EngineCommand::OverrideInput {
                source: source.clone(),
                field: field.clone(),
                value: *value,
            },
            CliAction::Reset => EngineCommand::ResetOverrides,
            CliAction::Serve => return None,
        };
        Some(command)
    }
}

/// CLI configuration structure containing all parsed command line arguments
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub verbose: bool,
    pub model: String,
    pub scenario_dirs: Vec<String>,
    pub no_default_scenarios: bool,
    pub action: CliAction,
}

impl CliConfig {
    /// Parse CLI arguments and create CliConfig
    pub fn from_args() -> Result<Self> {
        let matches = Self::build_cli().get_matches();
        Self::from_matches(&matches)
    }

    /// Create CliConfig from pre-parsed ArgMatches (useful for testing)
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let verbose = matches.get_flag("verbose");
        let no_default_scenarios = matches.get_flag("no-default-scenarios");

        let model = matches
            .get_one::<String>("model")
            .ok_or_else(|| anyhow::anyhow!("Model is required"))?
            .clone();

        let scenario_dirs: Vec<String> = matches
            .get_many::<String>("scenario-dir")
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();

        let action = match matches.subcommand() {
            Some(("scenarios", _)) => CliAction::Scenarios,
            Some(("schema", _)) => CliAction::Schema,
            Some(("inputs", _)) => CliAction::Inputs,
            Some(("run", sub)) => CliAction::Run {
                name: required(sub, "name")?,
                overrides: sub
                    .get_many::<(String, f64)>("override")
                    .map(|vals| vals.cloned().collect())
                    .unwrap_or_default(),
            },
            Some(("compare", sub)) => CliAction::Compare {
                scenario_a: required(sub, "scenario_a")?,
                scenario_b: required(sub, "scenario_b")?,
                metrics: sub
                    .get_many::<String>("metric")
                    .map(|vals| vals.cloned().collect())
                    .unwrap_or_default(),
            },
            Some(("override", sub)) => CliAction::Override {
                source: required(sub, "source")?,
                field: required(sub, "field")?,
                value: *sub
                    .get_one::<f64>("value")
                    .ok_or_else(|| anyhow::anyhow!("Override value is required"))?,
            },
            Some(("reset", _)) => CliAction::Reset,
            Some(("serve", _)) => CliAction::Serve,
            Some((other, _)) => return Err(anyhow::anyhow!("Unknown subcommand '{}'", other)),
            None => return Err(anyhow::anyhow!("A subcommand is required")),
        };

        Ok(Self {
            verbose,
            model,
            scenario_dirs,
            no_default_scenarios,
            action,
        })
    }

    /// Build the clap Command structure
    pub fn build_cli() -> Command {
        Command::new("whatif-backend")
            .version(env!("CARGO_PKG_VERSION"))
            .about("What-if scenario engine for quantitative models")
            .long_about("Runs named stress scenarios against a wired quantitative model, \
                       applies input overrides and compares results. Use 'serve' to answer \
                       newline-delimited JSON tool calls on stdin for a whole session.")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                Arg::new("verbose")
                    .short('v')
                    .long("verbose")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose logging")
                    .long_help("Enable debug logging on stderr, including override resolution \
                              and per-scenario timing."),
            )
            .arg(
                Arg::new("model")
                    .long("model")
                    .value_name("MODEL")
                    .global(true)
                    .help("Model to wire: demo or stub")
                    .value_parser(["demo", "stub"])
                    .default_value("demo"),
            )
            .arg(
                Arg::new("scenario-dir")
                    .long("scenario-dir")
                    .value_name("DIRECTORY")
                    .global(true)
                    .action(ArgAction::Append)
                    .help("Additional directory to load scenario files from")
                    .long_help("Additional directory to scan for .json5 scenario files. \
                              Can be specified multiple times. Directories are scanned in order \
                              with later ones taking priority (can override scenarios with the same name). \
                              Default directories: /usr/share/whatif/scenarios, ~/.config/whatif/scenarios, ./scenarios"),
            )
            .arg(
                Arg::new("no-default-scenarios")
                    .long("no-default-scenarios")
                    .global(true)
                    .action(ArgAction::SetTrue)
                    .help("Disable loading scenarios from default directories")
                    .long_help("Disable automatic loading of scenarios from default directories \
                              (/usr/share/whatif/scenarios, ~/.config/whatif/scenarios, ./scenarios). \
                              Only scenarios from explicitly specified --scenario-dir will be loaded."),
            )
            .subcommand(Command::new("scenarios").about("List available scenarios"))
            .subcommand(Command::new("schema").about("Print the model schema"))
            .subcommand(Command::new("inputs").about("List the model's input fields"))
            .subcommand(
                Command::new("run")
                    .about("Run a named scenario")
                    .arg(Arg::new("name").value_name("SCENARIO").required(true))
                    .arg(
                        Arg::new("override")
                            .short('o')
                            .long("override")
                            .value_name("FIELD=VALUE")
                            .action(ArgAction::Append)
                            .value_parser(parse_assignment)
                            .help("Override an input for this run only"),
                    ),
            )
            .subcommand(
                Command::new("compare")
                    .about("Run two scenarios and compare their outputs")
                    .arg(Arg::new("scenario_a").value_name("BASELINE").required(true))
                    .arg(Arg::new("scenario_b").value_name("SCENARIO").required(true))
                    .arg(
                        Arg::new("metric")
                            .short('m')
                            .long("metric")
                            .value_name("METRIC")
                            .action(ArgAction::Append)
                            .help("Restrict the comparison to this output (repeatable)"),
                    ),
            )
            .subcommand(
                Command::new("override")
                    .about("Apply a session override and print the confirmation")
                    .arg(Arg::new("source").value_name("SOURCE").required(true))
                    .arg(Arg::new("field").value_name("FIELD").required(true))
                    .arg(
                        Arg::new("value")
                            .value_name("VALUE")
                            .required(true)
                            .allow_negative_numbers(true)
                            .value_parser(clap::value_parser!(f64)),
                    ),
            )
            .subcommand(Command::new("reset").about("Clear all session overrides"))
            .subcommand(
                Command::new("serve")
                    .about("Answer newline-delimited JSON tool calls on stdin"),
            )
    }

    /// Validate CLI configuration
    pub fn validate(&self) -> Result<()> {
        match self.model.as_str() {
            "demo" | "stub" => {}
            _ => {
                return Err(anyhow::anyhow!(
                    "Invalid model '{}'. Must be 'demo' or 'stub'",
                    self.model
                ));
            }
        }

        if self.scenario_dirs.iter().any(|d| d.trim().is_empty()) {
            return Err(anyhow::anyhow!("Scenario directory cannot be empty"));
        }

        match &self.action {
            CliAction::Run { name, overrides } => {
                ensure_named("Scenario name", name)?;
                if let Some((field, value)) = overrides.iter().find(|(_, v)| !v.is_finite()) {
                    return Err(anyhow::anyhow!(
                        "Override '{}' must be a finite number, got {}",
                        field,
                        value
                    ));
                }
            }
            CliAction::Compare {
                scenario_a,
                scenario_b,
                ..
            } => {
                ensure_named("Scenario name", scenario_a)?;
                ensure_named("Scenario name", scenario_b)?;
            }
            CliAction::Override {
                source,
                field,
                value,
            } => {
                ensure_named("Override source", source)?;
                ensure_named("Override field", field)?;
                if !value.is_finite() {
                    return Err(anyhow::anyhow!("Override value must be a finite number"));
                }
            }
            _ => {}
        }

        Ok(())
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Argument '{}' is required", id))
}

fn ensure_named(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(anyhow::anyhow!("{} cannot be empty", what));
    }
    Ok(())
}

/// Parse a `FIELD=VALUE` override
fn parse_assignment(raw: &str) -> Result<(String, f64), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{}'", raw))?;

    let field = field.trim();
    if field.is_empty() {
        return Err("field name cannot be empty".to_string());
    }

    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value.trim()))?;

    Ok((field.to_string(), value))
}
