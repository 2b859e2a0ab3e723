//! Shoecart CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! shoecart show
//!
//! # Add one unit of product 3
//! shoecart add 3
//!
//! # Set product 3 to 2 units
//! shoecart update 3 2
//!
//! # Remove product 3
//! shoecart remove 3
//!
//! # Empty the cart
//! shoecart clear
//! ```
//!
//! Uses the same environment variables as the storefront binary
//! (`SHOECART_DATA_DIR`, `SHOECART_STORAGE_KEY`, ...). Only `add` and `update`
//! need `SHOECART_INVENTORY_URL`. Rejections and failures are reported as
//! notices on the log.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use shoecart_core::ProductId;

mod commands;

#[derive(Parser)]
#[command(name = "shoecart")]
#[command(author, version, about = "Shoecart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Set the quantity of a product already in the cart
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity (zero or less is ignored)
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Remove every product from the cart
    Clear,
}

impl Commands {
    /// Whether the command checks stock or reads the catalog.
    const fn needs_inventory(&self) -> bool {
        matches!(self, Self::Add { .. } | Self::Update { .. })
    }
}

#[tokio::main]
async fn main() {
    // Cart output goes through the log, so default to info
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let manager = if cli.command.needs_inventory() {
        commands::cart::open().await?
    } else {
        commands::cart::open_offline().await
    };

    match cli.command {
        Commands::Show => {}
        Commands::Add { product_id } => manager.add_product(product_id).await,
        Commands::Remove { product_id } => manager.remove_product(product_id).await,
        Commands::Update { product_id, amount } => {
            commands::cart::update(&manager, product_id, amount).await;
        }
        Commands::Clear => manager.try_clear().await?,
    }

    commands::cart::show(&manager).await;
    Ok(())
}
