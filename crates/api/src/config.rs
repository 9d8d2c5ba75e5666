//! Process configuration, read from the environment.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | first CLI argument or `MOCKREST_SERVICE` | `tasks`, `posts` or `users` | required |
//! | `MOCKREST_HOST` | bind address | `0.0.0.0` |
//! | `MOCKREST_PORT` | bind port | 7000 / 7001 / 7002 |
//! | `MOCKREST_DB` | datastore file | `db-tasks.json` / `db-posts.json` / `db-users-roles-countries.json` |
//! | `MOCKREST_LOG_FORMAT` | `json` or `pretty` | `json` |

use core::fmt;
use core::str::FromStr;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use mockrest_observability::{LogFormat, UnknownLogFormat};
use thiserror::Error;

pub const SERVICE_VAR: &str = "MOCKREST_SERVICE";
pub const HOST_VAR: &str = "MOCKREST_HOST";
pub const PORT_VAR: &str = "MOCKREST_PORT";
pub const DB_VAR: &str = "MOCKREST_DB";
pub const LOG_FORMAT_VAR: &str = "MOCKREST_LOG_FORMAT";

/// Which of the three backends this process serves.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Tasks,
    Posts,
    Users,
}

impl ServiceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Tasks => "tasks",
            Self::Posts => "posts",
            Self::Users => "users",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Self::Tasks => 7000,
            Self::Posts => 7001,
            Self::Users => 7002,
        }
    }

    pub fn default_db_file(self) -> &'static str {
        match self {
            Self::Tasks => "db-tasks.json",
            Self::Posts => "db-posts.json",
            Self::Users => "db-users-roles-countries.json",
        }
    }

    /// Collections guaranteed to exist in this service's datastore.
    pub fn collections(self) -> &'static [&'static str] {
        match self {
            Self::Tasks => &[mockrest_tasks::TASKS],
            Self::Posts => &[mockrest_posts::POSTS, mockrest_posts::USERS, mockrest_posts::CATEGORIES],
            Self::Users => &[mockrest_users::USERS, mockrest_users::ROLES, mockrest_users::COUNTRIES],
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ServiceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tasks" => Ok(Self::Tasks),
            "posts" => Ok(Self::Posts),
            "users" => Ok(Self::Users),
            _ => Err(ConfigError::UnknownService(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no service selected: pass tasks, posts or users as the first argument or set MOCKREST_SERVICE")]
    MissingService,

    #[error("unknown service {0:?} (expected tasks, posts or users)")]
    UnknownService(String),

    #[error("invalid MOCKREST_HOST {0:?}")]
    InvalidHost(String),

    #[error("invalid MOCKREST_PORT {0:?}")]
    InvalidPort(String),

    #[error(transparent)]
    LogFormat(#[from] UnknownLogFormat),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub service: ServiceKind,
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Read configuration from CLI arguments (program name excluded) and the
    /// process environment.
    pub fn from_env(mut args: impl Iterator<Item = String>) -> Result<Self, ConfigError> {
        Self::from_lookup(args.next(), |key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(
        service_arg: Option<String>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let service: ServiceKind = service_arg
            .or_else(|| lookup(SERVICE_VAR))
            .ok_or(ConfigError::MissingService)?
            .parse()?;

        let host = match lookup(HOST_VAR) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidHost(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => service.default_port(),
        };

        let db_path = lookup(DB_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(service.default_db_file()));

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };

        Ok(Self {
            service,
            host,
            port,
            db_path,
            log_format,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
