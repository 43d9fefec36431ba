use std::path::PathBuf;

use authgate::{AuthError, AuthService, ClientConfig, ErrorCode, FileTokenStore, Navigator, Route, SessionState};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{code}: {source}")]
    Auth {
        code: &'static str,
        #[source]
        source: AuthError,
    },
    #[error("invalid JSON output: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<AuthError> for CliError {
    fn from(source: AuthError) -> Self {
        Self::Auth { code: source.error_code(), source }
    }
}

#[derive(Parser, Debug)]
#[command(name = "authgate", about = "Log in to an auth API and manage the local session")]
struct Cli {
    #[arg(long, env = "AUTH_API_URL")]
    base_url: Option<String>,

    #[arg(long, env = "AUTH_TOKEN_PATH")]
    token_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange email and password for a token.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and store its token.
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        name: String,
    },
    /// Show the current user as reported by the API.
    Me,
    /// Replace the stored token with a fresh one.
    Refresh,
    /// Request a password reset email.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Decode the stored token and report the session state.
    Status,
    /// Print where the current user should be sent.
    Redirect,
    /// Forget the stored token.
    Logout,
    /// List configured login providers.
    Providers,
}

/// Prints navigation instead of driving a UI router.
struct StdoutNavigator;

impl Navigator for StdoutNavigator {
    fn push(&self, route: Route) {
        println!("-> {route}");
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env_with_api_url(cli.base_url.as_deref())?;
    if let Some(path) = cli.token_path {
        config.token_path = path;
    }
    tracing::debug!(api_url = %config.api_url, token_path = %config.token_path.display(), "config loaded");

    let store = FileTokenStore::new(config.token_path.clone());
    let service = AuthService::from_config(&config, store, StdoutNavigator)?;
    run(&service, cli.command).await
}

async fn run(service: &AuthService<FileTokenStore, StdoutNavigator>, command: Command) -> Result<(), CliError> {
    match command {
        Command::Login { email, password } => {
            let auth = service.login(&email, &password).await?;
            print_json(&Value::Object(auth.rest))?;
        }
        Command::Signup { email, password, name } => {
            let auth = service.signup(&email, &password, &name).await?;
            print_json(&Value::Object(auth.rest))?;
        }
        Command::Me => print_json(&service.fetch_user().await?)?,
        Command::Refresh => {
            service.update_token().await?;
            println!("token refreshed");
        }
        Command::ResetPassword { email } => print_json(&service.reset_password(&email).await?)?,
        Command::Status => print_json(&status_json(&service.session(None)?))?,
        Command::Redirect => {
            service.redirect_user(None)?;
        }
        Command::Logout => {
            service.logout()?;
        }
        Command::Providers => {
            for provider in service.auth_providers() {
                println!("{provider}");
            }
        }
    }
    Ok(())
}

fn status_json(state: &SessionState) -> Value {
    match state {
        SessionState::LoggedOut => json!({ "state": "logged_out" }),
        SessionState::Active(claims) => json!({ "state": "active", "exp": claims.exp, "user": claims.user() }),
        SessionState::Expired(claims) => json!({ "state": "expired", "exp": claims.exp, "user": claims.user() }),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
