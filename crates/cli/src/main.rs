// SPDX-License-Identifier: MIT
// Copyright (c) 2026 civic.band contributors

//! `clerk`: command-line front end for the civic-data pipeline
//! coordinator (spec.md SS6).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::panic))]

mod app;
mod commands;
mod config;
mod exit_error;
mod telemetry;
#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};

use config::Config;
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "clerk", about = "Civic-data ETL pipeline coordinator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a site, auto-enqueue at high priority.
    New(commands::new::NewArgs),
    /// Re-enqueue `fetch` for one site or the scheduler's next eligible site.
    Update(commands::update::UpdateArgs),
    /// Enqueue `fetch` for one or more sites directly.
    Enqueue(commands::enqueue::EnqueueArgs),
    /// Run the reconciler once.
    ReconcilePipeline,
    /// Print per-queue counts and per-site stage/counters.
    Status(commands::status::StatusArgs),
    /// Start a worker loop in this process.
    Worker(commands::worker::WorkerArgs),
    /// Write systemd user-unit files for configured worker counts.
    InstallWorkers,
    /// Remove systemd user-unit files written by `install-workers`.
    UninstallWorkers,
    /// Run every stage handler in-process for one subdomain.
    TestPipeline(commands::test_pipeline::TestPipelineArgs),
    /// Clear stale per-page extraction caches.
    MigrateExtractionSchema,
    /// Clear orphaned `coordinator_enqueued` flags and reconcile.
    MigrateStuckSites,
    /// Database subcommands.
    Db {
        #[command(subcommand)]
        command: DbCommand,
    },
}

#[derive(Subcommand)]
enum DbCommand {
    /// Smoke-check the WAL opens and replays cleanly.
    Upgrade,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_env();
    let _telemetry_guard = telemetry::init(&config);

    if let Err(err) = dispatch(cli.command, config).await {
        tracing::error!(code = err.code, message = %err.message, "clerk exited with an error");
        eprintln!("error: {}", err.message);
        std::process::exit(err.code);
    }
}

async fn dispatch(command: Command, config: Config) -> Result<(), ExitError> {
    // `install-workers`/`uninstall-workers` and `worker` don't need a
    // full engine `Context`, but building one unconditionally keeps the
    // dispatch table uniform and costs one extra WAL-replay on every
    // invocation, which this CLI's "single-shot operational command"
    // usage pattern never makes expensive.
    let ctx = app::build(&config).await?;

    match command {
        Command::New(args) => commands::new::run(&ctx, args).await,
        Command::Update(args) => commands::update::run(&ctx, args).await,
        Command::Enqueue(args) => commands::enqueue::run(&ctx, args).await,
        Command::ReconcilePipeline => commands::reconcile::run(&ctx).await,
        Command::Status(args) => commands::status::run(&ctx, args).await,
        Command::Worker(args) => commands::worker::run(ctx, args).await,
        Command::InstallWorkers => commands::supervision::install_workers(&ctx, &config).await,
        Command::UninstallWorkers => commands::supervision::uninstall_workers(&ctx, &config).await,
        Command::TestPipeline(args) => commands::test_pipeline::run(&ctx, args).await,
        Command::MigrateExtractionSchema => commands::migrate::migrate_extraction_schema(&ctx).await,
        Command::MigrateStuckSites => commands::migrate::migrate_stuck_sites(&ctx).await,
        Command::Db { command: DbCommand::Upgrade } => commands::migrate::db_upgrade(&ctx).await,
    }
}
