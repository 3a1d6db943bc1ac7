//! DRA Inventory
//!
//! Enumerates the allocatable devices of this node once and writes them to
//! stdout for the driver's advertisement layer.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────────┐    ┌──────────────┐
//! │  Config/CLI  │───▶│ DeviceEnumerator │───▶│ stdout (map) │
//! └──────────────┘    └──────────────────┘    └──────────────┘
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use kube::Client;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dra_inventory::adapters::ResourceSliceSource;
use dra_inventory::config::{InventoryConfig, InventorySource};
use dra_inventory::{AllocatableDevices, DeviceEnumerator};

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Synthetic,
    Mirror,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

/// DRA Inventory - enumerate allocatable devices for this node
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file; flags override its values
    #[arg(long, env = "INVENTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Device producer
    #[arg(long, env = "INVENTORY_MODE", value_enum)]
    mode: Option<Mode>,

    /// Number of synthetic devices
    #[arg(long, env = "NUM_DEVICES", allow_negative_numbers = true)]
    num_devices: Option<i64>,

    /// Seed for synthetic device identities
    #[arg(long, env = "NODE_NAME")]
    node_name: Option<String>,

    /// Only mirror ResourceSlices published by this driver
    #[arg(long, env = "DRIVER_NAME")]
    driver: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    output: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

impl Args {
    fn inventory_config(&self) -> anyhow::Result<InventoryConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                InventoryConfig::from_yaml_str(&raw)?
            }
            None => InventoryConfig::from_env()?,
        };

        if let Some(mode) = self.mode {
            config.source = match mode {
                Mode::Synthetic => InventorySource::Synthetic,
                Mode::Mirror => InventorySource::Mirror,
            };
        }
        if let Some(n) = self.num_devices {
            config.num_devices = n;
        }
        if let Some(node_name) = &self.node_name {
            config.node_name = node_name.clone();
        }
        if self.driver.is_some() {
            config.driver = self.driver.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(&args);

    let config = args.inventory_config()?;
    info!(
        mode = %config.mode(),
        node = %config.node_name,
        driver = ?config.driver,
        "Starting device enumeration"
    );

    let mut enumerator = DeviceEnumerator::new(config.mode(), config.node_name.clone());
    if config.source == InventorySource::Mirror {
        let client = Client::try_default()
            .await
            .context("Kubernetes client creation failed")?;
        info!("Connected to Kubernetes cluster");
        enumerator = match &config.driver {
            Some(driver) => enumerator.with_source(ResourceSliceSource::for_driver(client, driver.clone())),
            None => enumerator.with_source(ResourceSliceSource::new(client)),
        };
    }

    let devices = enumerator.enumerate().await?;

    write_devices(&devices, args.output)?;
    Ok(())
}

fn write_devices(devices: &AllocatableDevices, format: OutputFormat) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, devices)?;
            writeln!(out)?;
        }
        OutputFormat::Yaml => serde_yaml::to_writer(&mut out, devices)?,
    }
    out.flush()?;
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env()
        .add_directive(level.into())
        .add_directive("hyper=warn".parse().expect("static directive"))
        .add_directive("kube=info".parse().expect("static directive"))
        .add_directive("tower=warn".parse().expect("static directive"));

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
