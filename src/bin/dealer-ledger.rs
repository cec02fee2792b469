#![forbid(unsafe_code)]
//! Command-line front end for the dealer asset ledger

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use dealerledger::asset::Asset;
use dealerledger::config::load_config;
use dealerledger::dispatch::invoke;
use dealerledger::ledger::{AssetContract, AssetLedger};
use dealerledger::store::SqliteStore;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the ledger database (overrides config.toml)
    #[arg(long)]
    db: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invokes a ledger function by name with positional string arguments
    Invoke {
        /// Function name, e.g. CreateAsset, ReadAsset, UpdateBalance
        function: String,
        /// Positional arguments; numeric values are passed as strings
        args: Vec<String>,
    },
    /// Lists every asset in world state as a table
    List,
    /// Shows the full version history of one asset
    History {
        /// The asset id
        id: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => load_config()?.database.path,
    };
    let store = SqliteStore::open(&db_path)?;
    let ledger = AssetLedger;

    match &cli.command {
        Commands::Invoke { function, args } => {
            match invoke(&ledger, &store, function, args) {
                Ok(serde_json::Value::Null) => {
                    println!("{}", "OK".green().bold());
                }
                Ok(value) => {
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                Err(e) => {
                    eprintln!("{} {}", "Error:".red().bold(), e);
                    std::process::exit(1);
                }
            }
        }
        Commands::List => {
            let assets = ledger.get_all_assets(&store)?;
            if assets.is_empty() {
                println!("{}", "No assets in world state".yellow());
            } else {
                println!("{}", render_asset_table(&assets));
            }
        }
        Commands::History { id } => {
            let snapshots = ledger.get_history(&store, id)?;
            if snapshots.is_empty() {
                println!("{}", format!("No history for asset {}", id).yellow());
            } else {
                println!("{}", format!("History for {} (most recent first)", id).cyan());
                println!("{}", render_asset_table(&snapshots));
            }
        }
    }

    Ok(())
}

fn render_asset_table(assets: &[Asset]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Dealer", "MSISDN", "Balance", "Status", "Last Amount", "Last Type", "Remarks",
        ]);

    for asset in assets {
        table.add_row(vec![
            Cell::new(&asset.dealer_id),
            Cell::new(&asset.msisdn),
            Cell::new(format!("{:.2}", asset.balance)),
            Cell::new(&asset.status),
            Cell::new(format!("{:.2}", asset.trans_amount)),
            Cell::new(&asset.trans_type),
            Cell::new(&asset.remarks),
        ]);
    }

    table
}
