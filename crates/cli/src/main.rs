//! Tenantmart CLI - Database migrations and tenant management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (tables and the session store)
//! tm-cli migrate
//!
//! # Register a store
//! tm-cli tenant add --slug acme --name "Acme Goods" --domain shop.acme.test
//!
//! # List stores
//! tm-cli tenant list
//!
//! # Insert the demo stores
//! tm-cli seed
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` or `DATABASE_URL` - `PostgreSQL` connection string

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tm-cli")]
#[command(author, version, about = "Tenantmart CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage tenants
    Tenant {
        #[command(subcommand)]
        action: TenantAction,
    },
    /// Insert the built-in demo tenants
    Seed,
}

#[derive(Subcommand)]
enum TenantAction {
    /// Register a new tenant
    Add {
        /// URL slug (lowercase letters, digits and hyphens)
        #[arg(short, long)]
        slug: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Custom domain serving the tenant's store
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// List tenants
    List,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Migrate => commands::migrate::run(&pool).await?,
        Commands::Tenant { action } => match action {
            TenantAction::Add { slug, name, domain } => {
                commands::tenant::add(&pool, &slug, &name, domain.as_deref()).await?;
            }
            TenantAction::List => commands::tenant::list(&pool).await?,
        },
        Commands::Seed => commands::seed::run(&pool).await?,
    }
    Ok(())
}
