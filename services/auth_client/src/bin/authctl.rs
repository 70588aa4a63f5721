//! services/auth_client/src/bin/authctl.rs

use auth_client_lib::{
    adapters::{FileSessionStorage, HttpAuthApi, JwtExpiryChecker, SystemClock},
    config::Config,
    error::ClientError,
    SessionManager,
};
use auth_session_core::domain::RegisterRequest;
use auth_session_core::ports::Clock;
use auth_session_core::store::SessionStore;
use clap::{Parser, Subcommand};
use std::io::BufRead;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "authctl", about = "Sign in to the auth service and keep the session fresh")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in with email and password
    Login {
        email: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account and sign in
    Register {
        email: String,
        username: String,
        #[arg(long)]
        name: Option<String>,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Rotate the tokens
    Refresh {
        /// Only refresh when the refresh token is close to expiry
        #[arg(long)]
        if_needed: bool,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the stored session
    Status,
    /// Ask the auth service who the stored session belongs to
    Whoami,
}

fn read_password(password: Option<String>) -> Result<String, ClientError> {
    if let Some(password) = password {
        return Ok(password);
    }
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    let cli = Cli::parse();

    // --- 1. Load Configuration & Set Up Logging ---
    let config = Config::from_env()?;
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    debug!("Configuration loaded");

    // --- 2. Initialize Adapters ---
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let storage = Arc::new(FileSessionStorage::new(&config.session_dir, &config.storage_key));
    debug!(path = %storage.path().display(), "Using session storage");
    let checker = Arc::new(JwtExpiryChecker::new(clock.clone()));
    let api = Arc::new(
        HttpAuthApi::new(config.auth_api_url.clone(), config.http_timeout)?
            .with_prefix(&config.auth_api_prefix),
    );

    // --- 3. Rehydrate the Session ---
    let store = SessionStore::open(storage, checker, clock);
    let mut manager = SessionManager::new(store, api);

    // --- 4. Run the Command ---
    match cli.command {
        Command::Login { email, password } => {
            let password = read_password(password)?;
            let user = manager.login(&email, &password).await?;
            println!("Signed in as {} <{}>", user.username, user.email);
        }
        Command::Register {
            email,
            username,
            name,
            password,
        } => {
            let request = RegisterRequest {
                email,
                username,
                password: read_password(password)?,
                name,
            };
            let user = manager.register(&request).await?;
            println!("Registered and signed in as {} <{}>", user.username, user.email);
        }
        Command::Refresh { if_needed } => {
            if if_needed {
                let refreshed = manager.refresh_if_needed().await?;
                println!("{}", if refreshed { "Refreshed" } else { "No refresh needed" });
            } else {
                manager.refresh().await?;
                println!("Refreshed");
            }
        }
        Command::Logout => {
            manager.logout().await;
            println!("Signed out");
        }
        Command::Status => {
            let status = manager.status();
            match status.user {
                Some(user) if status.authenticated => {
                    println!("Signed in as {} <{}> ({})", user.username, user.email, user.role);
                    if let Some(at) = status
                        .last_refresh_check
                        .and_then(chrono::DateTime::<chrono::Utc>::from_timestamp_millis)
                    {
                        println!("Tokens last issued at {}", at.to_rfc3339());
                    }
                    if status.needs_refresh {
                        println!("Refresh token expires soon; run `authctl refresh`");
                    }
                }
                _ => println!("Not signed in"),
            }
        }
        Command::Whoami => {
            let user = manager.current_user().await?;
            println!("{} <{}> id={} role={}", user.username, user.email, user.id, user.role);
        }
    }

    info!("Done");
    Ok(())
}
