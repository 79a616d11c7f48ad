use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use site_router::config::load_config;
use site_router::locale::LocaleSignals;
use site_router::SiteState;

#[derive(Parser)]
#[command(name = "site-cli")]
#[command(about = "Inspect site routing without starting the server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "site.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration and compile the route table
    Check,
    /// Print the compiled route table
    Routes,
    /// Show the decision for a request path
    Resolve {
        path: String,
        /// Value of the locale cookie
        #[arg(long)]
        cookie: Option<String>,
        /// Accept-Language header
        #[arg(long)]
        accept_language: Option<String>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let site = SiteState::build(load_config(&cli.config)?)?;

    match cli.command {
        Commands::Check => {
            println!(
                "ok: {} routes, {} locales",
                site.router.table().len(),
                site.router.catalog().len()
            );
        }
        Commands::Routes => {
            let routes: Vec<_> = site.router.table().iter().collect();
            println!("{}", serde_json::to_string_pretty(&routes)?);
        }
        Commands::Resolve {
            path,
            cookie,
            accept_language,
        } => {
            let signals = LocaleSignals {
                cookie: cookie.as_deref(),
                accept_language: accept_language.as_deref(),
            };
            let output = match site.router.resolve(&path, &signals) {
                Ok(decision) => serde_json::to_value(&decision)?,
                Err(e) => json!({ "decision": "malformed_service", "code": e.code(), "error": e.to_string() }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
