//! blocklist-admin: inspect and edit a file-backed blocked number store.
//!
//! Every command prints one JSON document on stdout. Logs go to stderr.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::debug;

use blocked_numbers::{
    BlockedNumber, BlockedNumberReader, BlocklistConfig, BlocklistProvider, BlocklistService, CountryDetector,
    EnvCountryDetector, FieldValues, FixedCountryDetector, StorageBackend,
};
use blocklist_bus::ChangeNotifier;
use blocklist_telemetry::{init_telemetry, TelemetryConfig};

const COLLECTION: &str = "blocked";

/// Blocked number store administration
#[derive(Parser, Debug)]
#[command(name = "blocklist-admin")]
#[command(about = "Inspect and edit a blocked number store")]
struct Cli {
    /// Store file
    #[arg(long, env = "BLOCKLIST_STORE_PATH", default_value = "blocklist.db")]
    store: PathBuf,

    /// ISO region for national-format numbers (default: detected from the environment)
    #[arg(long)]
    country: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Block a number
    Add {
        number: String,
        /// Store this E.164 value instead of deriving one
        #[arg(long)]
        e164: Option<String>,
    },
    /// Delete one record by id
    Remove { id: u64 },
    /// Delete records matching a selection
    RemoveWhere {
        selection: String,
        args: Vec<String>,
    },
    /// Delete every record
    Clear,
    /// List records, optionally filtered
    List {
        #[arg(long = "where")]
        selection: Option<String>,
        args: Vec<String>,
    },
    /// Check whether a number is blocked
    Check { number: String },
    /// Print the content type of a resource path
    Type { path: String },
    /// Record count and the country used for normalization
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _telemetry = init_telemetry(TelemetryConfig::from_env().with_json_logs(false))
        .context("failed to initialise logging")?;

    let output = run(cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn open_provider(cli: &Cli) -> Result<BlocklistProvider> {
    let config = BlocklistConfig::from_env()
        .context("invalid blocklist configuration")?
        .with_storage(StorageBackend::file(&cli.store));

    let detector: Arc<dyn CountryDetector> = match &cli.country {
        Some(iso) => Arc::new(FixedCountryDetector::new(iso.as_str())),
        None => Arc::new(EnvCountryDetector),
    };
    let notifier = Arc::new(ChangeNotifier::with_capacity(config.notification_capacity));

    let service = BlocklistService::open(&config, detector, notifier)
        .with_context(|| format!("failed to open store {}", cli.store.display()))?;

    debug!(
        store = %cli.store.display(),
        country = ?service.normalizer().current_country(),
        "Store ready"
    );
    Ok(BlocklistProvider::new(Arc::new(service)))
}

fn run(cli: Cli) -> Result<Value> {
    let provider = open_provider(&cli)?;

    let output = match cli.command {
        Command::Add { number, e164 } => {
            let mut values = FieldValues::new().with("original_number", number);
            if let Some(e164) = e164 {
                values.put("e164_number", e164);
            }
            let resource = provider.insert(COLLECTION, &values)?;
            json!({ "inserted": resource.to_string() })
        }
        Command::Remove { id } => {
            let deleted = provider.delete(&format!("{COLLECTION}/{id}"), None, &[])?;
            json!({ "deleted": deleted })
        }
        Command::RemoveWhere { selection, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let deleted = provider.delete(COLLECTION, Some(&selection), &args)?;
            json!({ "deleted": deleted })
        }
        Command::Clear => {
            let deleted = provider.delete(COLLECTION, None, &[])?;
            json!({ "deleted": deleted })
        }
        Command::List { selection, args } => {
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let rows: Vec<BlockedNumber> = provider
                .query(COLLECTION, selection.as_deref(), &args)?
                .collect();
            serde_json::to_value(rows)?
        }
        Command::Check { number } => {
            let result = provider.service().check(&number)?;
            json!({
                "number": number,
                "blocked": result.blocked,
                "matched_tier": result.matched_tier,
            })
        }
        Command::Type { path } => {
            let content_type = provider.record_type(&path).map(|t| t.content_type());
            json!({ "path": path, "content_type": content_type })
        }
        Command::Stats => {
            let service = provider.service();
            json!({
                "records": service.count()?,
                "country": service.normalizer().current_country(),
            })
        }
    };

    Ok(output)
}
