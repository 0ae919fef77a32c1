use anyhow::{Context, Result};
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use compkit::{Manager, TracingSink};
use compkit_bootstrap::{AppConfig, AppConfigProvider, AppSection, CliArgs};

use std::path::{Path, PathBuf};
use std::sync::Arc;

mod components;

struct DemoApp {
    name: String,
    debug: i32,
}

impl From<&AppSection> for DemoApp {
    fn from(app: &AppSection) -> Self {
        Self {
            name: app.name.clone(),
            debug: app.debug,
        }
    }
}

impl compkit::Application for DemoApp {
    fn name(&self) -> &str {
        &self.name
    }

    fn debug(&self) -> i32 {
        self.debug
    }
}

/// Compkit demo - builds sample components in dependency order
#[derive(Parser)]
#[command(name = "compkit-demo")]
#[command(about = "Compkit demo - builds sample components in dependency order")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print effective configuration (YAML) and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace + lifecycle events)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build everything, run the runner, close everything
    Run,
    /// Build one category and its dependencies, then close
    Build { category: String },
    /// Build everything, print the build order and close
    Check,
}

fn main() -> Result<()> {
    // Components come first so they can register command-line options.
    let mut manager = Manager::default();
    manager.add_components(components::all())?;
    manager.add_discovered()?;

    let matches = manager.configure_all(Cli::command()).get_matches();
    let cli = Cli::from_arg_matches(&matches)?;

    let args = CliArgs {
        verbose: cli.verbose,
    };

    // Layered config:
    // 1) defaults -> 2) YAML (if provided) -> 3) env (APP__*) -> 4) CLI overrides
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config
        .logging
        .clone()
        .unwrap_or_else(compkit_bootstrap::default_logging_config);
    compkit_bootstrap::init_logging(&logging_config, Path::new(&config.app.home_dir));

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    tracing::info!(app = %config.app.name, "Compkit demo starting");
    let mut manager = wire(manager, Arc::new(config))?;
    manager.set_matches(matches);

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run(&mut manager),
        Commands::Build { category } => build_one(&mut manager, &category),
        Commands::Check => check(&mut manager),
    }
}

/// Attach application, configuration and event reporting; load configured plugins.
fn wire(manager: Manager, config: Arc<AppConfig>) -> Result<Manager> {
    let mut manager = manager
        .with_application(Arc::new(DemoApp::from(&config.app)))
        .with_config(Arc::new(AppConfigProvider::from_arc(config.clone())))
        .with_event_sink(Arc::new(TracingSink));

    #[cfg(feature = "dylib")]
    {
        manager = manager.with_loader(Box::new(compkit::plugins::DylibLoader));
    }

    if let Some(plugins) = &config.plugins {
        manager
            .add_plugins(&plugins.dir, &plugins.symbol, |m, entry| entry(m))
            .with_context(|| format!("Failed to load plugins from '{}'", plugins.dir))?;
    }

    Ok(manager)
}

fn run(manager: &mut Manager) -> Result<()> {
    manager.initialize_all()?;
    let result = manager.build_all().and_then(|()| manager.run());
    // Close whatever was built, even after a failure.
    manager.close_all();
    Ok(result?)
}

fn build_one(manager: &mut Manager, category: &str) -> Result<()> {
    manager.initialize_all()?;
    let result = manager.build_one(category);
    println!("built: {}", manager.build_order().join(" -> "));
    manager.close_all();
    Ok(result?)
}

fn check(manager: &mut Manager) -> Result<()> {
    let result = manager.build_all();
    println!("build order: {}", manager.build_order().join(" -> "));
    manager.close_all();
    result?;
    println!("Component graph is valid");
    Ok(())
}
