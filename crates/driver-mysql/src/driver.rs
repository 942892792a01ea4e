use std::path::Path;

use dblink_core::{
    ConnectRequest, Driver, DriverConnection, DriverError, QueryOutput, Row, TlsPaths,
    escape_string,
};
use mysql::{ClientIdentity, Conn, OptsBuilder, SslOpts, prelude::Queryable};

use crate::value::convert_value;

#[derive(Debug, Default, Clone, Copy)]
pub struct MysqlDriver;

pub struct MysqlConnection {
    conn: Conn,
}

impl Driver for MysqlDriver {
    type Connection = MysqlConnection;

    fn connect(&self, request: &ConnectRequest<'_>) -> Result<Self::Connection, DriverError> {
        let mut builder = OptsBuilder::new()
            .ip_or_hostname(Some(request.hostname.to_string()))
            .tcp_port(request.port)
            .user(Some(request.username.to_string()))
            .pass(Some(request.password.to_string()))
            .db_name(Some(request.database.to_string()));
        if let Some(paths) = &request.tls {
            builder = builder.ssl_opts(Some(ssl_opts(paths)));
        }

        let conn = Conn::new(builder).map_err(driver_error)?;
        Ok(MysqlConnection { conn })
    }
}

impl DriverConnection for MysqlConnection {
    fn set_charset(&mut self, charset: &str) -> Result<(), DriverError> {
        self.conn
            .query_drop(format!("SET NAMES {charset}").as_str())
            .map_err(driver_error)
    }

    fn query(&mut self, sql: &str) -> Result<QueryOutput, DriverError> {
        let mut result = self.conn.query_iter(sql).map_err(driver_error)?;
        let Some(set) = result.iter() else {
            return Ok(QueryOutput::Done);
        };

        let columns = set.columns().as_ref().to_vec();
        if columns.is_empty() {
            return Ok(QueryOutput::Done);
        }

        let mut rows = Vec::new();
        for row in set {
            let row = row.map_err(driver_error)?;
            rows.push(
                columns
                    .iter()
                    .enumerate()
                    .map(|(index, column)| {
                        let value = row.as_ref(index).cloned().unwrap_or(mysql::Value::NULL);
                        (column.name_str().into_owned(), convert_value(column, value))
                    })
                    .collect::<Row>(),
            );
        }

        Ok(QueryOutput::Rows {
            num_rows: rows.len() as u64,
            rows,
        })
    }

    fn no_backslash_escapes(&self) -> bool {
        self.conn.no_backslash_escape()
    }

    fn escape(&self, value: &str) -> String {
        escape_literal(value, self.no_backslash_escapes())
    }

    fn affected_rows(&self) -> u64 {
        self.conn.affected_rows()
    }

    fn last_insert_id(&self) -> u64 {
        self.conn.last_insert_id()
    }

    fn close(self) {
        drop(self.conn);
    }
}

fn ssl_opts(paths: &TlsPaths<'_>) -> SslOpts {
    let mut opts = SslOpts::default().with_root_cert_path(paths.ca.map(Path::to_path_buf));

    match (paths.cert, paths.key) {
        (Some(cert), Some(key)) => {
            opts = opts.with_client_identity(Some(ClientIdentity::new(
                cert.to_path_buf(),
                key.to_path_buf(),
            )));
        }
        (None, None) => {}
        (cert, key) => {
            tracing::warn!(
                cert = cert.is_some(),
                key = key.is_some(),
                "client certificate and key must both be set; connecting without client identity"
            );
        }
    }

    opts
}

/// Quotes `value` the way the `mysql` crate renders text parameters, then
/// strips the surrounding quotes.
fn escape_literal(value: &str, no_backslash_escape: bool) -> String {
    let literal = mysql::Value::from(value).as_sql(no_backslash_escape);
    literal
        .strip_prefix('\'')
        .and_then(|body| body.strip_suffix('\''))
        .map_or_else(
            || escape_string(value, no_backslash_escape),
            str::to_string,
        )
}

fn driver_error(error: mysql::Error) -> DriverError {
    match error {
        mysql::Error::MySqlError(server) => DriverError::server(server.code, server.message),
        other => DriverError::client(other.to_string()),
    }
}
