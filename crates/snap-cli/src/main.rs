use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use snap_config::PROJECT_DIR;

mod bootstrap;
mod cli;
mod commands;
mod context;
mod output;
mod progress;
mod runner;
mod ui;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("docsnaps error: {error:#}");
            std::process::exit(1);
        }
    }
}

/// Run the CLI and return the process exit code.
async fn run() -> anyhow::Result<i32> {
    let cli = cli::Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Init(args) => {
            commands::init::handle(args, &flags).await?;
            return Ok(0);
        }
        cli::Commands::Schema(args) => {
            commands::schema::handle(args, &flags)?;
            return Ok(0);
        }
        _ => {}
    }

    let project_root = resolve_project_root(flags.project.as_deref())?;
    let config = bootstrap::load_config(&project_root)?;
    context::warn_unconfigured(&config);

    let ctx = context::AppContext::init(project_root, config)
        .await
        .context("failed to initialize docsnaps application context")?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("DOCSNAPS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

fn resolve_project_root(project_override: Option<&str>) -> anyhow::Result<PathBuf> {
    if let Some(path) = project_override {
        let explicit = context::project_root_from_arg(Path::new(path))?;

        if explicit.join(PROJECT_DIR).is_dir() {
            return Ok(explicit);
        }

        anyhow::bail!(
            "invalid --project '{}': no .docsnaps directory found. Run 'docsnaps init' there first.",
            explicit.display()
        );
    }

    let start = std::env::current_dir().context("failed to read current directory")?;
    context::find_project_root(&start)
        .context("not a docsnaps project (no .docsnaps directory found). Run 'docsnaps init' first.")
}
