//! Fenet Cafe CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations (schema + session table)
//! fenet migrate
//!
//! # Load the menu, replacing items with the same name
//! fenet seed menu --file data/menu.yaml
//!
//! # Start from an empty menu
//! fenet seed menu --wipe
//!
//! # Create an admin account (password read from FENET_ADMIN_PASSWORD if omitted)
//! fenet admin create -u owner
//!
//! # Reset an admin password
//! fenet admin set-password -u owner
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed menu` - Upsert menu items from a YAML file
//! - `admin create` / `admin set-password` - Manage admin accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "fenet")]
#[command(author, version, about = "Fenet Cafe CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load data into the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert menu items by name from a YAML file
    Menu {
        /// Path to the menu YAML file
        #[arg(short, long, default_value = "data/menu.yaml")]
        file: String,

        /// Delete every existing menu item first
        #[arg(long)]
        wipe: bool,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (at least 12 characters)
        #[arg(short, long, env = "FENET_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Replace an admin user's password
    SetPassword {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// New password (at least 12 characters)
        #[arg(short, long, env = "FENET_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
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
        Commands::Seed { target } => match target {
            SeedTarget::Menu { file, wipe } => {
                commands::seed::menu(&file, wipe).await?;
            }
        },
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create_user(&username, &password).await?;
            }
            AdminAction::SetPassword { username, password } => {
                commands::admin::set_password(&username, &password).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_seed_menu_defaults() {
        let cli = Cli::try_parse_from(["fenet", "seed", "menu"]).unwrap_or_else(|e| panic!("{e}"));
        let Commands::Seed {
            target: SeedTarget::Menu { file, wipe },
        } = cli.command
        else {
            panic!("expected seed menu");
        };
        assert_eq!(file, "data/menu.yaml");
        assert!(!wipe);
    }

    #[test]
    fn test_admin_create_takes_password_flag() {
        let cli = Cli::try_parse_from([
            "fenet",
            "admin",
            "create",
            "-u",
            "owner",
            "-p",
            "a long enough password",
        ]);
        assert!(cli.is_ok());
    }
}
