//! Main entry point for the dcman device-configuration manager.
//!
//! Registers the built-in plugin table, binds devices from the optional
//! JSON inventory, and runs until interrupted. Any plugin registration
//! failure aborts startup.

use std::sync::Arc;

use clap::Parser;
use dcman_core::{Configuration, DeviceManager, registry_with_builtins, startup};
use dcman_plugin::DeviceMeta;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "dcman", about = "Device configuration manager")]
struct Cli {
    /// Configuration file path (defaults to conf/dcman.yml when present)
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
    /// JSON device inventory, overrides the configured path
    #[arg(long = "inventory", env = "DCMAN_INVENTORY")]
    inventory: Option<String>,
    /// Validate the plugin table and inventory, then exit
    #[arg(long = "check")]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    let configuration = Configuration::from_file(args.config.as_deref())?;
    let _logging_guard = startup::init_logging(&configuration.logging_config())?;

    // Built-in plugins must be registered before any device lookup
    let registry = registry_with_builtins().inspect_err(|e| {
        error!(error = %e, "plugin registration failed, aborting startup");
    })?;
    info!(plugins = ?registry.list(), "plugin table ready");

    let manager = DeviceManager::new(Arc::new(registry));

    let inventory_path = args.inventory.or_else(|| configuration.inventory_path());
    if let Some(path) = inventory_path {
        let raw = std::fs::read_to_string(&path)?;
        let inventory: Vec<DeviceMeta> = serde_json::from_str(&raw)?;
        info!(path = %path, devices = inventory.len(), "loading device inventory");
        for meta in inventory {
            let name = meta.name.clone();
            match manager.add_device(meta).await {
                Ok(()) => {
                    let facts = manager.facts(&name).await?;
                    info!(device = %name, model = %facts.model, os = %facts.os_version, "device ready");
                }
                Err(e) => error!(device = %name, error = %e, "device binding failed"),
            }
        }
    }

    if args.check {
        info!(devices = ?manager.devices(), "check passed");
        return Ok(());
    }

    info!("dcman running, press ctrl-c to stop");
    tokio::signal::ctrl_c().await?;

    for name in manager.devices() {
        if let Err(e) = manager.remove_device(&name).await {
            error!(device = %name, error = %e, "shutdown failed");
        }
    }
    info!("dcman stopped");
    Ok(())
}
