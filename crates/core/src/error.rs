use std::{error::Error as StdError, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

type BoxedSource = Box<dyn StdError + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Connect(#[from] ConnectError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection is closed")]
    Disconnected,
}

/// Construction failed; no adapter was produced.
#[derive(Debug, thiserror::Error)]
#[error("could not make a database link using {username}@{hostname}: {source}")]
pub struct ConnectError {
    pub username: String,
    pub hostname: String,
    #[source]
    pub source: BoxedSource,
}

impl ConnectError {
    pub fn new<E>(username: impl Into<String>, hostname: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self {
            username: username.into(),
            hostname: hostname.into(),
            source: Box::new(source),
        }
    }
}

/// The server rejected a statement. The connection remains usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("query failed (error {code}): {message}; sql=`{sql}`")]
pub struct QueryError {
    pub message: String,
    pub code: u16,
    pub sql: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid port `{raw}`: expected an integer between 1 and 65535")]
    InvalidPort { raw: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TlsError {
    #[error("failed to create temporary {kind} file in `{}`", dir.display())]
    CreateArtifact {
        kind: &'static str,
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write temporary {kind} file `{}`", path.display())]
    WriteArtifact {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure reported by a [`crate::Driver`] or one of its connections.
///
/// `code` is the server error number when the failure came from the server,
/// and `None` for client-side failures (I/O, TLS, protocol).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", render_driver_error(.code, .message))]
pub struct DriverError {
    pub code: Option<u16>,
    pub message: String,
}

impl DriverError {
    pub fn server(code: u16, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: message.into(),
        }
    }

    pub fn client(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

fn render_driver_error(code: &Option<u16>, message: &str) -> String {
    match code {
        Some(code) => format!("[{code}] {message}"),
        None => message.to_string(),
    }
}
