//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use clausewise_core::{config, logging};

mod commands;

#[derive(Parser)]
#[command(name = "clausewise")]
#[command(version)]
#[command(about = "ClauseWise contract analysis client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL from config
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create an account (does not log in)
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLAUSEWISE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CLAUSEWISE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Check whether the contract analysis service is ready
    Status,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let Cli { command, api_url } = cli;

    // Config commands must work even when the existing file is broken.
    if let Some(Commands::Config { command }) = &command {
        return match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        };
    }

    let mut config = config::Config::load().context("load config")?;
    if let Some(url) = api_url {
        config.api_base_url = url;
    }
    logging::init(&config.log_level);
    tracing::debug!(api = %config.api_base_url, "config loaded");

    // default to the interactive app
    let Some(command) = command else {
        return commands::app::run(&config).await;
    };

    match command {
        Commands::Signup {
            name,
            email,
            password,
        } => commands::auth::signup(&config, &name, &email, &password).await,
        Commands::Login { email, password } => {
            commands::auth::login(&config, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => {
            commands::auth::whoami();
            Ok(())
        }
        Commands::Status => commands::status::run(&config).await,
        Commands::Config { .. } => Ok(()),
    }
}
