use std::{fmt, path::PathBuf};

use chrono::FixedOffset;

use crate::ConfigError;

pub const DEFAULT_PORT: u16 = 3306;

/// Connection parameters for a single [`crate::Database`].
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub hostname: String,
    pub username: String,
    pub password: String,
    pub database: String,
    /// Raw port text; empty means [`DEFAULT_PORT`].
    pub port: String,
    pub tls: TlsMaterial,
    /// Directory that receives the temporary PEM files when `tls` is set.
    pub temp_dir: PathBuf,
    /// Session time zone override. `None` uses the host's current offset.
    pub utc_offset: Option<FixedOffset>,
}

impl ConnectionConfig {
    #[must_use]
    pub fn new(
        hostname: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            hostname: hostname.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
            port: String::new(),
            tls: TlsMaterial::default(),
            temp_dir: std::env::temp_dir(),
            utc_offset: None,
        }
    }

    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }

    #[must_use]
    pub fn with_tls(mut self, tls: TlsMaterial) -> Self {
        self.tls = tls;
        self
    }

    #[must_use]
    pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = temp_dir.into();
        self
    }

    #[must_use]
    pub fn with_utc_offset(mut self, offset: FixedOffset) -> Self {
        self.utc_offset = Some(offset);
        self
    }

    pub fn resolved_port(&self) -> Result<u16, ConfigError> {
        parse_port(&self.port)
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("hostname", &self.hostname)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .field("port", &self.port)
            .field("tls", &self.tls)
            .field("temp_dir", &self.temp_dir)
            .field("utc_offset", &self.utc_offset)
            .finish()
    }
}

/// PEM bodies (no BEGIN/END markers) for the client key, client certificate
/// and certificate authority.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct TlsMaterial {
    pub key: Option<String>,
    pub cert: Option<String>,
    pub ca: Option<String>,
}

impl TlsMaterial {
    /// True when no body is present. Empty strings count as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [&self.key, &self.cert, &self.ca]
            .into_iter()
            .all(|body| non_empty(body.as_deref()).is_none())
    }

    pub(crate) fn key(&self) -> Option<&str> {
        non_empty(self.key.as_deref())
    }

    pub(crate) fn cert(&self) -> Option<&str> {
        non_empty(self.cert.as_deref())
    }

    pub(crate) fn ca(&self) -> Option<&str> {
        non_empty(self.ca.as_deref())
    }
}

impl fmt::Debug for TlsMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsMaterial")
            .field("key", &self.key().map(|_| "<redacted>"))
            .field("cert", &self.cert().map(|_| "<present>"))
            .field("ca", &self.ca().map(|_| "<present>"))
            .finish()
    }
}

pub fn parse_port(raw: &str) -> Result<u16, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(DEFAULT_PORT);
    }

    trimmed
        .parse::<u16>()
        .ok()
        .filter(|port| *port != 0)
        .ok_or_else(|| ConfigError::InvalidPort {
            raw: raw.to_string(),
        })
}

fn non_empty(body: Option<&str>) -> Option<&str> {
    body.filter(|body| !body.is_empty())
}
