//! CLI argument parsing, secret loading, and startup helpers.

use crate::ServerConfig;
use crate::auth::{
    DEFAULT_AUTH_SCHEME, DEFAULT_SIGNAL_HEADER, DEFAULT_TOKEN_HEADER, GateConfig, ServiceStrategy,
};
use crate::secrets::{Secret, Secrets};
use axum::http::HeaderName;
use clap::Parser;
use tracing::{error, info, warn};

const MIN_SECRET_LENGTH: usize = 32;

pub const ACCESS_SECRET_ENV: &str = "JWT_ACCESS_TOKEN_SECRET";
pub const REFRESH_SECRET_ENV: &str = "JWT_REFRESH_TOKEN_SECRET";
pub const SERVICE_SECRET_ENV: &str = "SERVICE_AUTH_TOKEN";

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

/// Header convention for internal-service calls.
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ServiceAuthMode {
    /// `Authorization: <scheme> <secret>`
    Authorization,
    /// Presence-only signal header plus a raw token header
    #[default]
    InternalHeader,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "campus-gate",
    about = "Authentication gate for session and internal-service requests"
)]
pub struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    pub port: u16,

    /// How internal services identify themselves
    #[arg(long, value_enum, default_value = "internal-header")]
    pub service_auth: ServiceAuthMode,

    /// Scheme expected in the Authorization header (authorization mode)
    #[arg(long, default_value = DEFAULT_AUTH_SCHEME, value_parser = validate_scheme)]
    pub auth_scheme: String,

    /// Presence of this header marks an internal-service call (internal-header mode)
    #[arg(long, default_value = DEFAULT_SIGNAL_HEADER, value_parser = parse_header_name)]
    pub service_signal_header: HeaderName,

    /// Header carrying the raw shared secret (internal-header mode)
    #[arg(long, default_value = DEFAULT_TOKEN_HEADER, value_parser = parse_header_name)]
    pub service_token_header: HeaderName,

    /// File with the access-token secret. Prefer the JWT_ACCESS_TOKEN_SECRET env var
    #[arg(long)]
    pub access_secret_file: Option<String>,

    /// File with the refresh-token secret. Prefer the JWT_REFRESH_TOKEN_SECRET env var
    #[arg(long)]
    pub refresh_secret_file: Option<String>,

    /// File with the internal-service secret. Prefer the SERVICE_AUTH_TOKEN env var
    #[arg(long)]
    pub service_secret_file: Option<String>,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn parse_header_name(s: &str) -> Result<HeaderName, String> {
    HeaderName::from_bytes(s.as_bytes()).map_err(|_| format!("Invalid header name: {}", s))
}

fn validate_scheme(s: &str) -> Result<String, String> {
    if s.is_empty() {
        return Err("Auth scheme must not be empty".to_string());
    }
    if s.chars().any(|c| !c.is_ascii_alphanumeric() && c != '-' && c != '_') {
        return Err(format!("Auth scheme contains invalid characters: {}", s));
    }
    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load a secret from an environment variable or a file.
///
/// A missing or unreadable secret is logged and left unbound; requests that
/// need it are then rejected as `secret-unconfigured` instead of the process
/// refusing to start.
pub fn load_secret(env_var: &str, file: Option<&str>) -> Option<Secret> {
    let value = if let Ok(value) = std::env::var(env_var) {
        // Clear the environment variable to prevent leaking
        // SAFETY: called during startup before any other thread reads the
        // environment.
        unsafe { std::env::remove_var(env_var) };
        value
    } else if let Some(path) = file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, secret = env_var, "Failed to read secret file");
                return None;
            }
        }
    } else {
        String::new()
    };

    let Some(secret) = Secret::new(value) else {
        warn!(secret = env_var, "Secret is not configured");
        return None;
    };

    if secret.len() < MIN_SECRET_LENGTH {
        warn!(
            secret = env_var,
            "Secret is shorter than {} characters. Use a longer secret", MIN_SECRET_LENGTH
        );
    }

    Some(secret)
}

/// Load all three secrets according to the arguments.
pub fn load_secrets(args: &Args) -> Secrets {
    Secrets {
        access_token: load_secret(ACCESS_SECRET_ENV, args.access_secret_file.as_deref()),
        refresh_token: load_secret(REFRESH_SECRET_ENV, args.refresh_secret_file.as_deref()),
        service_token: load_secret(SERVICE_SECRET_ENV, args.service_secret_file.as_deref()),
    }
}

/// Map the CLI selection onto a service strategy.
pub fn service_strategy(args: &Args) -> ServiceStrategy {
    match args.service_auth {
        ServiceAuthMode::Authorization => ServiceStrategy::Authorization {
            scheme: args.auth_scheme.clone(),
        },
        ServiceAuthMode::InternalHeader => ServiceStrategy::SignalHeader {
            signal: args.service_signal_header.clone(),
            token: args.service_token_header.clone(),
        },
    }
}

/// Build ServerConfig from validated arguments and loaded secrets.
pub fn build_config(args: &Args, secrets: Secrets) -> ServerConfig {
    let service_strategy = service_strategy(args);
    info!(strategy = ?service_strategy, "Service authentication configured");

    ServerConfig {
        gate: GateConfig {
            secrets,
            service_strategy,
        },
    }
}
