//! CLI subcommand handlers.

use crate::render;
use crate::{Commands, ConfigAction};
use bagging_core::config::{self, ExplorerConfig};
use bagging_core::proxy::{ProxyState, run_proxy};
use bagging_core::sidebar::SidebarAction;
use bagging_core::wizard::{Action, Step};
use bagging_core::{
    BackendClient, BaseModel, ComparisonModel, Dataset, DatasetOption, Explorer, TrainingBackend,
    TrainingResult,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Handle a CLI subcommand.
pub async fn handle_command(
    command: Commands,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            backend_url,
        } => {
            let mut config = load(workspace, config_file)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(url) = backend_url {
                config.backend.base_url = url;
            }
            config.validate()?;
            handle_serve(config).await
        }
        Commands::Walkthrough {
            dataset,
            csv,
            base_model,
            estimators,
            compare,
            seed,
            output,
        } => {
            let mut config = load(workspace, config_file)?;
            if seed.is_some() {
                config.demo.seed = seed;
            }
            let client = BackendClient::new(&config.backend)?;
            let explorer = Explorer::new(client, &config.demo);
            let plan = WalkthroughPlan {
                dataset,
                csv,
                base_model,
                estimators,
                compare,
            };
            let result = run_walkthrough(explorer, plan).await?;
            if let Some(path) = output {
                save_result(&result, &path)?;
                println!("Saved results to {}", path.display());
            }
            Ok(())
        }
        Commands::Inspect { path } => {
            let result = read_result(&path)?;
            print!("{}", render::render_results(&result));
            Ok(())
        }
        Commands::Dataset { path, rows } => {
            let dataset = Dataset::from_csv_path(&path)?;
            print!("{}", render::render_dataset(&dataset, rows));
            Ok(())
        }
        Commands::Config { action } => handle_config(action, workspace, config_file),
    }
}

fn load(workspace: &Path, config_file: Option<&Path>) -> anyhow::Result<ExplorerConfig> {
    config::load_config(Some(workspace), config_file)
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))
}

async fn handle_serve(config: ExplorerConfig) -> anyhow::Result<()> {
    println!(
        "Proxy on http://{}:{} -> {}",
        config.server.host, config.server.port, config.backend.base_url
    );
    println!("{}", backend_status(&BackendClient::new(&config.backend)?).await);
    let state = Arc::new(ProxyState::new(config)?);
    run_proxy(state).await?;
    Ok(())
}

/// One-line report on whether the training backend answers.
///
/// An unreachable backend is not fatal: training falls back to demo data.
async fn backend_status(client: &BackendClient) -> String {
    match client.health().await {
        Ok(_) => format!("Backend at {} is reachable", client.base_url()),
        Err(e) => {
            warn!(error = %e, "Backend health check failed");
            format!(
                "Backend at {} is not reachable ({e}); training will use demo data",
                client.base_url()
            )
        }
    }
}

/// User choices for a non-interactive walkthrough.
#[derive(Debug, Clone)]
pub struct WalkthroughPlan {
    pub dataset: DatasetOption,
    pub csv: Option<PathBuf>,
    pub base_model: BaseModel,
    pub estimators: i64,
    /// `None` keeps the default comparison methods.
    pub compare: Option<Vec<ComparisonModel>>,
}

fn step_header(step: Step) -> String {
    let marker = if step.is_first() {
        " (start)"
    } else if step.is_last() {
        " (done)"
    } else {
        ""
    };
    format!(
        "\n[{}/{}] {}{} ({:.0}% complete)",
        step.index() + 1,
        Step::COUNT,
        step.title(),
        marker,
        step.progress() * 100.0
    )
}

/// Drive every step of the explorer and return the training result.
pub async fn run_walkthrough<B: TrainingBackend>(
    mut explorer: Explorer<B>,
    plan: WalkthroughPlan,
) -> anyhow::Result<TrainingResult> {
    println!("{}", step_header(explorer.state().step));
    println!("  Bagging trains many models on bootstrap samples and lets them vote.");
    explorer.dispatch(Action::Next).await?;

    println!("{}", step_header(explorer.state().step));
    match &plan.csv {
        Some(path) => explorer.upload_csv(path).await?,
        None => explorer.dispatch(Action::SelectDataset(plan.dataset)).await?,
    }
    let dataset = explorer
        .state()
        .dataset
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("No dataset loaded for option '{}'", plan.dataset))?;
    print!("{}", render::render_dataset(dataset, 0));

    println!("{}", step_header(explorer.state().step));
    explorer
        .dispatch(Action::Sidebar(SidebarAction::SetBaseModel(plan.base_model)))
        .await?;
    let variance = plan.base_model.variance();
    println!(
        "  {} has {:?} variance; expected benefit from bagging: {}",
        plan.base_model,
        variance,
        variance.bagging_benefit()
    );
    explorer.dispatch(Action::Next).await?;

    println!("{}", step_header(explorer.state().step));
    explorer
        .dispatch(Action::Sidebar(SidebarAction::SetEnsembleSize(plan.estimators)))
        .await?;
    println!("  Ensemble size: {}", explorer.state().sidebar.ensemble_size);
    explorer.dispatch(Action::Next).await?;

    println!("{}", step_header(explorer.state().step));
    if let Some(selected) = &plan.compare {
        for model in ComparisonModel::ALL {
            explorer
                .dispatch(Action::Sidebar(SidebarAction::ToggleComparison {
                    model,
                    enabled: false,
                }))
                .await?;
        }
        for &model in selected {
            explorer
                .dispatch(Action::Sidebar(SidebarAction::ToggleComparison {
                    model,
                    enabled: true,
                }))
                .await?;
        }
    }
    let names: Vec<String> = explorer
        .state()
        .sidebar
        .compare_with
        .iter()
        .map(|m| format!("{} ({})", m.name(), m.style()))
        .collect();
    println!("  Comparing against: {}", names.join(", "));

    explorer.dispatch(Action::Train).await?;
    println!("{}", step_header(explorer.state().step));
    let result = explorer
        .results()
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("Training produced no result"))?;
    info!(source = %result.source, "Walkthrough finished");
    print!("{}", render::render_results(&result));
    Ok(result)
}

fn read_result(path: &Path) -> anyhow::Result<TrainingResult> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let result = serde_json::from_str(&text)?;
    Ok(result)
}

fn save_result(result: &TrainingResult, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = config::workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            if let Some(dir) = config_path.parent() {
                std::fs::create_dir_all(dir)?;
            }

            let toml_str = ExplorerConfig::default().to_toml()?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            let config = load(workspace, config_file)?;
            println!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
