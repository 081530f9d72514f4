// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{Parser, Subcommand};
use netatlas_core::registry::NetworkKind;
use netatlas_core::snapshot::SnapshotStore;
use netatlas_core::{RegionCatalog, UsageBucket, UsageRegistry};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "netatlas", version, about, long_about = None)]
struct Cli {
    /// Session snapshot file (defaults to the config dir)
    #[arg(short, long, env = "NETATLAS_SNAPSHOT")]
    snapshot: Option<PathBuf>,

    /// Region catalog JSON file (defaults to the builtin world-city list)
    #[arg(short, long, env = "NETATLAS_CATALOG")]
    catalog: Option<PathBuf>,

    /// Simulated registration round-trip in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered cities with their marker encoding
    List,
    /// Register a new city data point
    Add {
        /// Region name, exactly as listed by `cities`
        region: String,
        /// Network type (4G or 5G)
        #[arg(short, long)]
        network: String,
        /// Usage value (non-negative integer)
        #[arg(short, long)]
        usage: String,
    },
    /// List the selectable regions from the catalog
    Cities,
    /// Show the usage buckets with their color token and marker radius
    Buckets,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let catalog = match &cli.catalog {
        Some(path) => {
            log::debug!("loading catalog from {:?}", path);
            RegionCatalog::load_file(path)?
        }
        None => RegionCatalog::builtin(),
    };

    let store = match &cli.snapshot {
        Some(path) => SnapshotStore::new(path.clone()),
        None => SnapshotStore::at_default_path(),
    };
    log::debug!("session snapshot at {:?}", store.path());
    let mut registry = UsageRegistry::new(store.load()?)?
        .with_round_trip(Duration::from_millis(cli.delay_ms));

    match &cli.command {
        Commands::List => {
            for record in registry.records() {
                let bucket = UsageBucket::classify(record.usage);
                println!(
                    "#{:<3} {:<14} ({:>7.2}, {:>8.2})  {:>7} on {}  [{} {} r={}]",
                    record.id,
                    record.region,
                    record.coordinates.lat,
                    record.coordinates.lon,
                    record.usage,
                    record.network,
                    bucket,
                    bucket.color(),
                    bucket.radius()
                );
            }
        }
        Commands::Add {
            region,
            network,
            usage,
        } => {
            // The form offers 4G/5G; enforce that here rather than in the registry.
            let network = NetworkKind::from_str(network)?;

            println!("Registering {}...", region);
            let record = registry
                .register_city(&catalog, region, network.as_str(), usage)
                .await?;
            println!(
                "Added #{} {} — usage {} on {}",
                record.id, record.region, record.usage, record.network
            );
            store.save(registry.records())?;
        }
        Commands::Cities => {
            for entry in &catalog.cities {
                println!(
                    "{:<14} ({:>7.2}, {:>8.2})",
                    entry.region, entry.coordinates.lat, entry.coordinates.lon
                );
            }
            println!(
                "\nNetworks: {}",
                catalog
                    .network_options()
                    .iter()
                    .map(|n| n.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            println!(
                "Usage presets: {}",
                catalog
                    .usage_presets()
                    .iter()
                    .map(|u| u.to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        Commands::Buckets => {
            println!("{:<10} {:<14} {:<9} radius", "bucket", "range", "color");
            let rows = [
                (UsageBucket::Light, "< 500"),
                (UsageBucket::Moderate, "500..999"),
                (UsageBucket::Heavy, "1000..4999"),
                (UsageBucket::Extreme, ">= 5000"),
            ];
            for (bucket, range) in rows {
                println!(
                    "{:<10} {:<14} {:<9} {}",
                    bucket.label(),
                    range,
                    bucket.color(),
                    bucket.radius()
                );
            }
        }
    }

    Ok(())
}
