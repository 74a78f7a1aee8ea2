// SPDX-FileCopyrightText: 2026 Volley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Volley - bulk-SMS campaign dispatch and delivery reconciliation.
//!
//! This is the binary entry point for the Volley service.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod keygen;
mod serve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Volley - bulk-SMS campaign dispatch and delivery reconciliation.
#[derive(Parser, Debug)]
#[command(name = "volley", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Volley gateway server.
    Serve,
    /// Print the resolved configuration summary.
    Config,
    /// Mint a new API key for an account and print it once.
    Keygen {
        /// Account the key authorizes.
        account_id: String,
        /// Optional label shown in key listings.
        #[arg(long, default_value = "")]
        label: String,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("volley={log_level},info")));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match volley_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("error: {error}");
            }
            std::process::exit(1);
        }
    };

    init_tracing(&config.service.log_level);

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Keygen { account_id, label }) => {
            keygen::run_keygen(&config, &account_id, &label).await
        }
        Some(Commands::Config) | None => {
            print_config_summary(&config);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn print_config_summary(config: &volley_config::VolleyConfig) {
    println!("service:   {}", config.service.name);
    println!(
        "gateway:   {}:{}",
        config.gateway.host, config.gateway.port
    );
    println!("database:  {}", config.storage.database_path);
    println!("default:   {}", config.carriers.default);
    println!(
        "onbuka:    {}",
        if config.carriers.onbuka.api_key.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    for (name, account) in [
        ("eims_1", &config.carriers.eims_1),
        ("eims_2", &config.carriers.eims_2),
        ("eims_3", &config.carriers.eims_3),
    ] {
        println!(
            "{name}:    {}",
            if account.account.is_some() {
                "configured"
            } else {
                "not configured"
            }
        );
    }
    println!(
        "dispatch:  pages of {} (max {}/run, {}ms between pages)",
        config.dispatch.page_size,
        config.dispatch.max_pages_per_run,
        config.dispatch.page_delay_ms
    );
}
