//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use realms_narrative::application::sessions::SessionLimits;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Listen address of the HTTP server and bounds on live games.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Interface to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Game session bounds (`MAX_SESSIONS`, `SESSION_IDLE_TTL_SECS`).
    pub session_limits: SessionLimits,
}

impl ServerConfig {
    /// Reads the server settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric setting does not parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the server settings through `lookup`, falling back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric setting does not parse or a
    /// session limit is zero.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = SessionLimits::default();
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = parse_or(&lookup, "PORT", DEFAULT_PORT)?;
        let max_sessions = parse_or(&lookup, "MAX_SESSIONS", defaults.max_sessions)?;
        let idle_ttl_secs =
            parse_or(&lookup, "SESSION_IDLE_TTL_SECS", defaults.idle_ttl.as_secs())?;
        if max_sessions == 0 || idle_ttl_secs == 0 {
            return Err(AppError::Config(
                "MAX_SESSIONS and SESSION_IDLE_TTL_SECS must be positive".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            session_limits: SessionLimits {
                max_sessions,
                idle_ttl: Duration::from_secs(idle_ttl_secs),
            },
        })
    }

    /// Resolves the configured host and port into a socket address.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the combination does not parse.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("{key} must be a valid number: {e}"))),
        None => Ok(default),
    }
}
