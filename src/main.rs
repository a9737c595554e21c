use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use uigen_core::config::{AppConfig, Environment};
use uigen_core::session::{MemoryCookieJar, SessionIssuer, AUTH_COOKIE_NAME};
use uigen_core::tool_badge::{badge_for, InvocationState, ToolArgs, ToolInvocation};

#[derive(Parser)]
#[command(
    name = "uigen",
    about = "Session and tool-badge backend for the uigen coding assistant",
    version,
    author
)]
struct Cli {
    /// Path to config file (default: ~/.config/uigen/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Override the runtime environment (development, production, test)
    #[arg(long, global = true)]
    env: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind host
        #[arg(long)]
        host: Option<String>,
        /// Bind port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the badge a tool invocation renders as
    Badge {
        /// Tool name, e.g. str_replace_editor or file_manager
        tool: String,
        #[arg(long)]
        command: Option<String>,
        #[arg(long)]
        path: Option<String>,
        #[arg(long)]
        new_path: Option<String>,
        /// Invocation state ("call" or "result")
        #[arg(long, default_value = "call")]
        state: String,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Mint a session token and print its Set-Cookie header
    Session {
        #[arg(long)]
        user_id: String,
        #[arg(long)]
        email: String,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize default configuration file
    Init,
    /// Print config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| {
            "uigen=info,uigen_core=info,uigen_server=info,warn".into()
        }))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config, then environment, then CLI overrides.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env_overrides()?;
    if let Some(env) = cli.env {
        config.auth.environment = env;
    }

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(h) = host {
                config.server.host = h;
            }
            if let Some(p) = port {
                config.server.port = p;
            }
            uigen_server::serve(config).await?;
        }
        Commands::Badge {
            tool,
            command,
            path,
            new_path,
            state,
            json,
        } => {
            let args = if command.is_none() && path.is_none() && new_path.is_none() {
                None
            } else {
                Some(ToolArgs {
                    command,
                    path,
                    new_path,
                })
            };
            let badge = badge_for(&ToolInvocation {
                tool_call_id: None,
                tool_name: tool,
                state: InvocationState::from(state),
                args,
            });
            if json {
                println!("{}", serde_json::to_string_pretty(&badge)?);
            } else {
                println!("{}", badge);
            }
        }
        Commands::Session { user_id, email } => {
            let issuer = SessionIssuer::from_config(&config.auth);
            let mut jar = MemoryCookieJar::new();
            issuer.issue(&mut jar, &user_id, &email).await?;
            if let Some(cookie) = jar.cookie(AUTH_COOKIE_NAME) {
                println!("Set-Cookie: {}", cookie.to_header_value());
            }
        }
        Commands::Config { action } => {
            handle_config_command(action, &config)?;
        }
    }

    Ok(())
}

fn handle_config_command(action: Option<ConfigAction>, config: &AppConfig) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
        }
        Some(ConfigAction::Init) => {
            let path = AppConfig::default_path();
            if path.exists() {
                println!("Config already exists at: {}", path.display());
            } else {
                config.save()?;
                println!("Created default config at: {}", path.display());
            }
        }
        Some(ConfigAction::Path) => {
            println!("{}", AppConfig::default_path().display());
        }
    }
    Ok(())
}
