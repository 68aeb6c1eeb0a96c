//! SrRobot CLI - Database migrations and bootstrap tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! srrobot-cli migrate
//!
//! # Create the superadmin (password from SUPERADMIN_PASSWORD or -p)
//! srrobot-cli superadmin create -n "Ana Torres" -e ana@srrobot.com
//!
//! # Print a fresh token signing secret for JWT_SECRET
//! srrobot-cli secret generate
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "srrobot-cli")]
#[command(author, version, about = "SrRobot shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the superadmin account
    Superadmin {
        #[command(subcommand)]
        action: SuperadminAction,
    },
    /// Token signing secrets
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },
}

#[derive(Subcommand)]
enum SuperadminAction {
    /// Create the one and only superadmin
    Create {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Corporate email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long, env = "SUPERADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Print a random secret suitable for `JWT_SECRET`
    Generate,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Superadmin { action } => match action {
            SuperadminAction::Create {
                name,
                email,
                password,
            } => {
                commands::superadmin::create(&name, &email, &password).await?;
            }
        },
        Commands::Secret { action } => match action {
            SecretAction::Generate => commands::secret::generate(),
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_superadmin_create_parses() {
        let cli = Cli::try_parse_from([
            "srrobot-cli",
            "superadmin",
            "create",
            "-n",
            "Ana Torres",
            "-e",
            "ana@srrobot.com",
            "-p",
            "s3guro",
        ])
        .unwrap();

        match cli.command {
            Commands::Superadmin {
                action: SuperadminAction::Create { name, email, password },
            } => {
                assert_eq!(name, "Ana Torres");
                assert_eq!(email, "ana@srrobot.com");
                assert_eq!(password, "s3guro");
            }
            _ => panic!("expected superadmin create"),
        }
    }
}
