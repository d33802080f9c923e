use anyhow::{Context, Result};
use tracing::info;

use whatif_backend::adapters::build_orchestrator;
use whatif_backend::config::ConfigManager;
use whatif_backend::services::{CommandDispatcher, SessionServer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from CLI and environment
    let config_manager = ConfigManager::from_cli_and_env()?;
    config_manager.validate()?;
    config_manager.init_logging()?;

    let extra_scenarios = config_manager.app.scenario_loader().load_all();
    let orchestrator = build_orchestrator(config_manager.app.model, extra_scenarios);
    info!(
        "Starting whatif-backend with model '{}' ({} scenario(s))",
        config_manager.app.model,
        orchestrator.available_scenarios().len()
    );

    let mut dispatcher = CommandDispatcher::new(orchestrator);

    let Some(command) = config_manager.action.to_command() else {
        let handled = SessionServer::new(dispatcher).serve_stdio().await?;
        info!("Served {} request(s)", handled);
        return Ok(());
    };

    let value = dispatcher.dispatch(command)?.to_json()?;

    println!(
        "{}",
        serde_json::to_string_pretty(&value).context("Failed to encode output")?
    );
    Ok(())
}
