//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `hotel_sync` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use hotel_sync::app::{ctrl_c_signal, print_sync_statistics, run_periodic_sync, summary_line};
use hotel_sync::config::{Command, InsertArgs, Opt, SyncArgs};
use hotel_sync::{
    deserialize_field_map, init_coordinator, init_logger_with, run_migrations, Config, Endpoint,
    SyncCoordinator,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Connection strings may live in a .env file next to the working directory
    let _ = dotenvy::dotenv();

    let opt = Opt::parse();
    let config = Config::from(&opt);
    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut coordinator = init_coordinator(&config);
    match run(&mut coordinator, opt.command).await {
        Ok(()) => {
            print_sync_statistics(&coordinator.stats());
            Ok(())
        }
        Err(e) => {
            eprintln!("hotel_sync error: {:#}", e);
            process::exit(1);
        }
    }
}

async fn run(coordinator: &mut SyncCoordinator, command: Command) -> Result<()> {
    match command {
        Command::Migrate { online } => {
            let manager = coordinator.manager_mut();
            manager.select_endpoint(Endpoint::Local).await;
            run_migrations(manager)
                .await
                .context("Failed to migrate local database")?;
            println!("Local database is up to date");
            if online {
                manager.select_endpoint(Endpoint::Online).await;
                let result = run_migrations(manager).await;
                manager.select_endpoint(Endpoint::Local).await;
                result.context("Failed to migrate online database")?;
                println!("Online database is up to date");
            }
        }
        Command::Insert(InsertArgs { table, data }) => {
            let fields = deserialize_field_map(&data).context("Invalid --data")?;
            let outcome = coordinator
                .insert_with_sync(&table, &fields)
                .await
                .with_context(|| format!("Failed to insert into {table}"))?;
            println!("{table}: {}", outcome.as_str());
        }
        Command::Sync(SyncArgs {
            watch,
            interval_secs,
        }) => {
            if watch {
                let passes = run_periodic_sync(
                    coordinator,
                    Duration::from_secs(interval_secs),
                    ctrl_c_signal(),
                )
                .await;
                println!("Completed {passes} sync pass(es)");
            } else {
                let report = coordinator
                    .sync_pending_records()
                    .await
                    .context("Pending sync failed; queue kept for retry")?;
                println!(
                    "Synced {} pending record(s); {} removed from queue",
                    report.replayed, report.cleared
                );
            }
            println!("{}", summary_line(&coordinator.stats()));
        }
        Command::Pending => {
            let records = coordinator
                .pending_records()
                .await
                .context("Failed to read pending queue")?;
            for record in &records {
                println!("{}", serde_json::to_string(record)?);
            }
            eprintln!("{} pending record(s)", records.len());
        }
    }
    Ok(())
}
