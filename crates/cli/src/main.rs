//! QKART CLI - session management and one-shot catalog/cart queries.
//!
//! # Usage
//!
//! ```bash
//! # Store the token and username issued at login
//! qkart session set --token eyJhbGci... --username crio
//!
//! # Show who is signed in
//! qkart session show
//!
//! # Log out
//! qkart session clear
//!
//! # List products, optionally filtered by a search
//! qkart products
//! qkart products --search basket
//!
//! # Show the signed-in user's cart with totals
//! qkart cart
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

use commands::CommandError;

#[derive(Parser)]
#[command(name = "qkart")]
#[command(author, version, about = "QKART CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the persisted login session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// List products from the catalog
    Products {
        /// Only show products matching this search
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Show the signed-in user's cart
    Cart,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Store a session issued by the login page
    Set {
        /// Bearer token
        #[arg(short, long)]
        token: String,

        /// Username shown in the header
        #[arg(short, long)]
        username: String,
    },
    /// Remove the stored session (logout)
    Clear,
    /// Show the stored session
    Show,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = qkart_storefront::config::StorefrontConfig::from_env()?;
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Set { token, username } => {
                commands::session::set(&config, token, username).await?;
            }
            SessionAction::Clear => commands::session::clear(&config).await?,
            SessionAction::Show => commands::session::show(&config, &mut out).await?,
        },
        Commands::Products { search } => {
            commands::shop::products(&config, search.as_deref(), &mut out).await?;
        }
        Commands::Cart => commands::shop::cart(&config, &mut out).await?,
    }
    Ok(())
}
