//! Process configuration from environment variables.
//!
//! | Variable | Default | |
//! |---|---|---|
//! | `PORT` | `3000` | TCP port to listen on |
//! | `HOST` | `0.0.0.0` | address to bind |
//! | `APP_ENV` | `development` | `development` or `production` |
//! | `APP_NAME` | `usuarios` | name reported at startup |
//! | `STATIC_DIR` | `public` | directory served before routing |
//! | `DB_HOST` | `localhost` | database server, reported at startup only |

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("HOST must be an IP address, got {0:?}")]
    InvalidHost(String),

    #[error("APP_ENV must be `development` or `production`, got {0:?}")]
    InvalidEnvironment(String),
}

/// Deployment environment. Request logging is only installed in development.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Self::Development
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(ConfigError::InvalidEnvironment(s.to_owned())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub environment: Environment,
    pub app_name: String,
    pub static_dir: PathBuf,
    /// Users are kept in memory; this is only logged.
    pub db_host: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            environment: Environment::Development,
            app_name: "usuarios".to_owned(),
            static_dir: PathBuf::from("public"),
            db_host: "localhost".to_owned(),
        }
    }
}

impl Config {
    /// Reads the process environment. Unset or empty variables take their
    /// defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(port) = get("PORT") {
            config.port = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
        }
        if let Some(host) = get("HOST") {
            config.host = host.trim().parse().map_err(|_| ConfigError::InvalidHost(host))?;
        }
        if let Some(env) = get("APP_ENV") {
            config.environment = env.parse()?;
        }
        if let Some(name) = get("APP_NAME") {
            config.app_name = name;
        }
        if let Some(dir) = get("STATIC_DIR") {
            config.static_dir = PathBuf::from(dir);
        }
        if let Some(db_host) = get("DB_HOST") {
            config.db_host = db_host.trim().to_owned();
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
