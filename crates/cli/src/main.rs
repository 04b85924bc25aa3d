//! ELMIS CLI - inspect and edit the console's persisted session.
//!
//! Operates on the same storage directory as the running console
//! (`ELMIS_STORAGE_DIR`). A running console does not observe changes made
//! here until it restarts.
//!
//! # Usage
//!
//! ```bash
//! # Show who is signed in and the active theme
//! elmis-cli session show
//!
//! # Sign in as a known user
//! elmis-cli session login -e admin@library.com -p password
//!
//! # Sign out
//! elmis-cli session logout
//!
//! # Switch theme
//! elmis-cli theme toggle
//! elmis-cli theme set light
//!
//! # List known users
//! elmis-cli users list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use elmis_core::Theme;

mod commands;

use commands::{CliError, Context};

#[derive(Parser)]
#[command(name = "elmis-cli")]
#[command(author, version, about = "ELMIS console CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or change the signed-in user
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Change the console theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Inspect the user directory
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Print the persisted session
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Sign in as a known user
    Login {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// Demo password
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Flip between light and dark
    Toggle,
    /// Set a specific theme (`light` or `dark`)
    Set { theme: Theme },
}

#[derive(Subcommand)]
enum UsersAction {
    /// List every known user
    List,
}

fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Session { action } => match action {
            SessionAction::Show { json } => commands::session::show(&ctx, json)?,
            SessionAction::Login { email, password } => {
                commands::session::login(&ctx, &email, &password)?;
            }
            SessionAction::Logout => commands::session::logout(&ctx),
        },
        Commands::Theme { action } => match action {
            ThemeAction::Toggle => commands::theme::toggle(&ctx),
            ThemeAction::Set { theme } => commands::theme::set(&ctx, theme),
        },
        Commands::Users { action } => match action {
            UsersAction::List => commands::users::list(&ctx),
        },
    }
    Ok(())
}
