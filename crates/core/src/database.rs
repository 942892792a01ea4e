use crate::{
    ConnectError, ConnectRequest, ConnectionConfig, Driver, DriverConnection, DriverError, Error,
    Outcome, QueryError, QueryOutput, Result, ResultSet,
    session::{
        FOREIGN_KEY_CHECKS_SQL, SESSION_CHARSET, SQL_MODE_SQL, format_utc_offset,
        local_utc_offset, time_zone_sql,
    },
    tls::TlsArtifacts,
};

/// A single established connection plus its normalized query surface.
///
/// The underlying connection is closed by [`Database::close`] or on drop,
/// whichever comes first.
pub struct Database<C: DriverConnection> {
    connection: Option<C>,
}

impl<C: DriverConnection> Database<C> {
    /// Opens a connection through `driver` and prepares the session
    /// (character set, SQL mode, foreign key checks, time zone).
    pub fn connect<D>(driver: &D, config: &ConnectionConfig) -> Result<Self>
    where
        D: Driver<Connection = C>,
    {
        let port = config.resolved_port()?;
        let connection = open_connection(driver, config, port)
            .map_err(|source| connect_error(config, source))?;

        let mut database = Self {
            connection: Some(connection),
        };
        database
            .prepare_session(config)
            .map_err(|source| connect_error(config, source))?;

        tracing::info!(
            hostname = %config.hostname,
            port,
            database = %config.database,
            "database connection established"
        );
        Ok(database)
    }

    /// Runs `sql` verbatim. The caller is responsible for escaping any
    /// interpolated values with [`Database::escape`].
    pub fn execute(&mut self, sql: &str) -> Result<Outcome> {
        let connection = self.connection.as_mut().ok_or(Error::Disconnected)?;

        match connection.query(sql) {
            Ok(QueryOutput::Rows { num_rows, rows }) => {
                tracing::debug!(num_rows, "query returned rows");
                Ok(Outcome::Rows(ResultSet::new(num_rows, rows)))
            }
            Ok(QueryOutput::Done) => {
                tracing::debug!(
                    affected_rows = connection.affected_rows(),
                    "statement completed"
                );
                Ok(Outcome::Done)
            }
            Err(source) => {
                tracing::debug!(code = ?source.code, "query failed");
                Err(QueryError {
                    message: source.message,
                    code: source.code.unwrap_or_default(),
                    sql: sql.to_string(),
                }
                .into())
            }
        }
    }

    pub fn escape(&self, value: &str) -> Result<String> {
        self.connection
            .as_ref()
            .map(|connection| connection.escape(value))
            .ok_or(Error::Disconnected)
    }

    /// Rows affected by the most recent statement; `0` once closed.
    #[must_use]
    pub fn affected_rows(&self) -> u64 {
        self.connection
            .as_ref()
            .map_or(0, DriverConnection::affected_rows)
    }

    #[must_use]
    pub fn last_insert_id(&self) -> u64 {
        self.connection
            .as_ref()
            .map_or(0, DriverConnection::last_insert_id)
    }

    /// Reports whether a handle is held. Does not contact the server.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    pub fn close(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            tracing::info!("database connection closed");
        }
    }

    fn prepare_session(
        &mut self,
        config: &ConnectionConfig,
    ) -> std::result::Result<(), DriverError> {
        let Some(connection) = self.connection.as_mut() else {
            return Err(DriverError::client("connection closed during session setup"));
        };

        connection.set_charset(SESSION_CHARSET)?;
        for sql in [SQL_MODE_SQL, FOREIGN_KEY_CHECKS_SQL] {
            tracing::debug!(sql, "running session statement");
            connection.query(sql)?;
        }

        let offset = format_utc_offset(config.utc_offset.unwrap_or_else(local_utc_offset));
        let sql = time_zone_sql(&connection.escape(&offset));
        tracing::debug!(sql = %sql, "running session statement");
        connection.query(&sql)?;

        Ok(())
    }
}

impl<C: DriverConnection> Drop for Database<C> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<C: DriverConnection> std::fmt::Debug for Database<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connected", &self.is_connected())
            .finish()
    }
}

fn open_connection<D: Driver>(
    driver: &D,
    config: &ConnectionConfig,
    port: u16,
) -> std::result::Result<D::Connection, Box<dyn std::error::Error + Send + Sync>> {
    // Dropped at the end of this function, removing the files whether or not
    // the driver connected.
    let artifacts = TlsArtifacts::materialize(&config.tls, &config.temp_dir)?;

    let request = ConnectRequest {
        hostname: &config.hostname,
        port,
        username: &config.username,
        password: &config.password,
        database: &config.database,
        tls: artifacts.as_ref().map(TlsArtifacts::paths),
    };
    tracing::debug!(
        hostname = request.hostname,
        port,
        username = request.username,
        database = request.database,
        tls = request.tls.is_some(),
        "connecting"
    );

    Ok(driver.connect(&request)?)
}

fn connect_error<E>(config: &ConnectionConfig, source: E) -> Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    ConnectError {
        username: config.username.clone(),
        hostname: config.hostname.clone(),
        source: source.into(),
    }
    .into()
}
