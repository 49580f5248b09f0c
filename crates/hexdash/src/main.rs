mod cli;
mod commands;
mod error;
mod format;
mod monitor;
mod render;
mod style;

use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use hexdash_api::ApiClient;
use hexdash_config::{DashboardConfig, Overrides};

use crate::cli::Cli;
use crate::error::CliError;
use crate::monitor::Monitor;
use crate::style::Palette;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "hexdash", &mut io::stdout());
        return;
    }

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = build_config(&cli)?;
    let palette = Palette::new(style::should_color(cli.color));
    let client = ApiClient::new(config.api_base.clone(), &config.transport())?;

    tracing::debug!(api_base = %config.api_base, refresh = ?config.refresh_interval, "configuration resolved");

    // Control flags take priority over either polling mode.
    if let Some(control) = commands::requested(&cli) {
        commands::handle(&client, control, palette, &mut io::stdout()).await?;
        return Ok(());
    }

    let clear_screen = !cli.no_clear && io::stdout().is_terminal();
    let mut monitor =
        Monitor::new(&client, &config, palette, io::stdout()).with_clear_screen(clear_screen);
    if cli.once {
        monitor.run_once().await
    } else {
        monitor.run_interactive(interrupted()).await
    }
}

/// Merge config file, environment, and CLI flags into a validated config.
fn build_config(cli: &Cli) -> Result<DashboardConfig, CliError> {
    let overrides = Overrides {
        api_base: cli.api_base.clone(),
        refresh: cli.refresh,
        timeout: cli.timeout,
        insecure: cli.insecure.then_some(true),
    };
    let settings = hexdash_config::load_settings(cli.config.as_deref(), &overrides)?;
    Ok(settings.resolve()?)
}

/// Resolves on Ctrl-C. If the handler cannot be installed, never resolves.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "unable to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}
