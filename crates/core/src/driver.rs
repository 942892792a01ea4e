use std::{fmt, path::Path};

use crate::{DriverError, Row, escape::escape_string};

/// Wire-protocol client that opens connections for a [`crate::Database`].
pub trait Driver {
    type Connection: DriverConnection;

    fn connect(&self, request: &ConnectRequest<'_>) -> Result<Self::Connection, DriverError>;
}

pub trait DriverConnection {
    fn set_charset(&mut self, charset: &str) -> Result<(), DriverError>;

    /// Runs `sql` verbatim. Rows of the first result set are drained before
    /// returning.
    fn query(&mut self, sql: &str) -> Result<QueryOutput, DriverError>;

    /// Whether the server currently reports the `NO_BACKSLASH_ESCAPES`
    /// sql_mode for this session.
    fn no_backslash_escapes(&self) -> bool {
        false
    }

    /// Escapes `value` for a single-quoted literal under the session's
    /// active escaping rules.
    fn escape(&self, value: &str) -> String {
        escape_string(value, self.no_backslash_escapes())
    }

    fn affected_rows(&self) -> u64;

    fn last_insert_id(&self) -> u64;

    fn close(self)
    where
        Self: Sized;
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows { num_rows: u64, rows: Vec<Row> },
    Done,
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ConnectRequest<'a> {
    pub hostname: &'a str,
    pub port: u16,
    pub username: &'a str,
    pub password: &'a str,
    pub database: &'a str,
    /// `Some` requests an encrypted session.
    pub tls: Option<TlsPaths<'a>>,
}

impl fmt::Debug for ConnectRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectRequest")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("tls", &self.tls)
            .finish()
    }
}

/// Paths of the temporary PEM files; absent material stays `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TlsPaths<'a> {
    pub key: Option<&'a Path>,
    pub cert: Option<&'a Path>,
    pub ca: Option<&'a Path>,
}
