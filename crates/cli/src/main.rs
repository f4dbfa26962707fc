//! Nabta CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! nabta-cli migrate
//!
//! # Create an admin user
//! nabta-cli admin create -p +249912345678 -w 'a-strong-password' -n "Admin Name"
//!
//! # Seed the database with starter data
//! nabta-cli seed
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `admin create` - Create or promote admin users
//! - `seed` - Seed the database with starter catalog data

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "nabta-cli")]
#[command(author, version, about = "Nabta CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Seed the database with starter data
    Seed,
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user (or promote an existing account)
    Create {
        /// Admin phone number (Sudanese format)
        #[arg(short, long)]
        phone: String,

        /// Admin password
        #[arg(short = 'w', long)]
        password: String,

        /// Admin display name
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                phone,
                password,
                name,
            } => {
                commands::admin::create_user(&phone, &password, name.as_deref()).await?;
            }
        },
        Commands::Seed => commands::seed::run().await?,
    }
    Ok(())
}
