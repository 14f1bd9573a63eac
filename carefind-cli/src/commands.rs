//! CLI command implementations

use anyhow::Context;
use clap::Subcommand;
use tracing::info;

use carefind_core::OracleConfig;
use carefind_search::PackageSearchService;

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Server {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,
        /// Use canned demo data instead of the live oracle
        #[arg(long)]
        demo: bool,
    },
    /// Run a one-off package search and print the results
    Search {
        /// Free-text query, e.g. "full body checkup under 5000"
        query: String,
        /// Use canned demo data instead of the live oracle
        #[arg(long)]
        demo: bool,
    },
}

/// Handle the CLI command
///
/// # Errors
/// Returns an error when configuration is missing or the command fails.
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Server { host, port, demo } => start_server(host, port, demo).await,
        Commands::Search { query, demo } => run_search(query, demo).await,
    }
}

async fn start_server(host: String, port: u16, demo: bool) -> anyhow::Result<()> {
    let config = if demo {
        None
    } else {
        Some(OracleConfig::from_env().context("loading oracle configuration")?)
    };

    info!(%host, port, demo, "starting carefind web server");
    println!("Starting CareFind web server...");
    println!("URL: http://{host}:{port}");
    if demo {
        println!("Mode: Demo (canned package data)");
    }
    println!("Press Ctrl+C to stop the server");

    carefind_web::run_server(config, &host, port, demo)
        .await
        .map_err(|e| anyhow::anyhow!("web server failed: {e}"))
}

async fn run_search(query: String, demo: bool) -> anyhow::Result<()> {
    let service = if demo {
        PackageSearchService::new_demo()
    } else {
        let config = OracleConfig::from_env().context("loading oracle configuration")?;
        PackageSearchService::new(config)?
    };

    info!(%query, demo, "running one-off package search");
    let packages = service.search_packages(&query).await?;

    println!("Found {} package(s)", packages.len());
    println!("{:-<60}", "");

    for package in &packages {
        println!("Hospital: {}", package.hospital);
        if !package.description.is_empty() {
            println!("Description: {}", package.description);
        }
        println!("Price: {}", package.price);
        for feature in &package.features {
            println!("  - {feature}");
        }
        println!("{:-<60}", "");
    }

    Ok(())
}
