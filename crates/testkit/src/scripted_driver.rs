use std::{cell::RefCell, collections::BTreeMap, fs, path::Path, path::PathBuf, rc::Rc};

use dblink_core::{
    ConnectRequest, Driver, DriverConnection, DriverError, QueryOutput, escape_string,
};

use crate::{Script, ScriptedResponse};

/// In-memory [`Driver`] that answers from a [`Script`] and records every
/// call for later inspection.
///
/// Connections share state with the driver that opened them, so the driver
/// remains inspectable after a `Database` takes ownership of the connection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    state: Rc<RefCell<DriverState>>,
}

#[derive(Debug, Default)]
struct DriverState {
    script: Script,
    connect_failure: Option<DriverError>,
    charset_failure: Option<DriverError>,
    connects: Vec<RecordedConnect>,
    charsets: Vec<String>,
    executed_sql: Vec<String>,
    no_backslash_escapes: bool,
    escape_overrides: BTreeMap<String, String>,
    escaped_values: Vec<String>,
    close_count: usize,
    affected_rows: u64,
    last_insert_id: u64,
}

/// Snapshot of a connect call. TLS files are read while the call is in
/// progress, since they are removed as soon as it returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedConnect {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub database: String,
    pub tls: Option<RecordedTls>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordedTls {
    pub key: Option<RecordedArtifact>,
    pub cert: Option<RecordedArtifact>,
    pub ca: Option<RecordedArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedArtifact {
    pub path: PathBuf,
    /// File contents, or the read error message when the file was missing
    /// or unreadable at connect time.
    pub contents: Result<String, String>,
}

#[derive(Debug)]
pub struct ScriptedConnection {
    state: Rc<RefCell<DriverState>>,
}

impl ScriptedDriver {
    #[must_use]
    pub fn new(script: Script) -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().script = script;
        driver
    }

    pub fn respond(&self, sql: impl Into<String>, response: ScriptedResponse) {
        self.state
            .borrow_mut()
            .script
            .insert(sql.into(), response);
    }

    pub fn fail_connect(&self, error: DriverError) {
        self.state.borrow_mut().connect_failure = Some(error);
    }

    pub fn fail_charset(&self, error: DriverError) {
        self.state.borrow_mut().charset_failure = Some(error);
    }

    /// Reports the `NO_BACKSLASH_ESCAPES` sql_mode from every connection.
    pub fn set_no_backslash_escapes(&self, enabled: bool) {
        self.state.borrow_mut().no_backslash_escapes = enabled;
    }

    /// Answers `escape(value)` with `escaped` instead of the escaping rules.
    pub fn escape_as(&self, value: impl Into<String>, escaped: impl Into<String>) {
        self.state
            .borrow_mut()
            .escape_overrides
            .insert(value.into(), escaped.into());
    }

    /// Values passed to `escape`, in call order.
    pub fn escaped_values(&self) -> Vec<String> {
        self.state.borrow().escaped_values.clone()
    }

    pub fn connects(&self) -> Vec<RecordedConnect> {
        self.state.borrow().connects.clone()
    }

    pub fn last_connect(&self) -> Option<RecordedConnect> {
        self.state.borrow().connects.last().cloned()
    }

    pub fn charsets(&self) -> Vec<String> {
        self.state.borrow().charsets.clone()
    }

    pub fn executed_sql(&self) -> Vec<String> {
        self.state.borrow().executed_sql.clone()
    }

    pub fn close_count(&self) -> usize {
        self.state.borrow().close_count
    }
}

impl Driver for ScriptedDriver {
    type Connection = ScriptedConnection;

    fn connect(&self, request: &ConnectRequest<'_>) -> Result<Self::Connection, DriverError> {
        let mut state = self.state.borrow_mut();
        state.connects.push(record_connect(request));

        if let Some(error) = state.connect_failure.clone() {
            return Err(error);
        }

        Ok(ScriptedConnection {
            state: Rc::clone(&self.state),
        })
    }
}

impl DriverConnection for ScriptedConnection {
    fn set_charset(&mut self, charset: &str) -> Result<(), DriverError> {
        let mut state = self.state.borrow_mut();
        if let Some(error) = state.charset_failure.clone() {
            return Err(error);
        }
        state.charsets.push(charset.to_string());
        Ok(())
    }

    fn query(&mut self, sql: &str) -> Result<QueryOutput, DriverError> {
        let mut state = self.state.borrow_mut();
        state.executed_sql.push(sql.to_string());

        let response = state.script.get(sql).cloned().unwrap_or_default();
        if let Some(error) = response.driver_error() {
            return Err(error);
        }

        match response.result_rows() {
            Some(rows) => {
                state.affected_rows = rows.len() as u64;
                Ok(QueryOutput::Rows {
                    num_rows: response.num_rows.unwrap_or(rows.len() as u64),
                    rows,
                })
            }
            None => {
                state.affected_rows = response.affected_rows;
                if let Some(last_insert_id) = response.last_insert_id {
                    state.last_insert_id = last_insert_id;
                }
                Ok(QueryOutput::Done)
            }
        }
    }

    fn no_backslash_escapes(&self) -> bool {
        self.state.borrow().no_backslash_escapes
    }

    fn escape(&self, value: &str) -> String {
        let mut state = self.state.borrow_mut();
        state.escaped_values.push(value.to_string());
        match state.escape_overrides.get(value) {
            Some(escaped) => escaped.clone(),
            None => escape_string(value, state.no_backslash_escapes),
        }
    }

    fn affected_rows(&self) -> u64 {
        self.state.borrow().affected_rows
    }

    fn last_insert_id(&self) -> u64 {
        self.state.borrow().last_insert_id
    }

    fn close(self) {
        self.state.borrow_mut().close_count += 1;
    }
}

fn record_connect(request: &ConnectRequest<'_>) -> RecordedConnect {
    RecordedConnect {
        hostname: request.hostname.to_string(),
        port: request.port,
        username: request.username.to_string(),
        password: request.password.to_string(),
        database: request.database.to_string(),
        tls: request.tls.map(|paths| RecordedTls {
            key: paths.key.map(record_artifact),
            cert: paths.cert.map(record_artifact),
            ca: paths.ca.map(record_artifact),
        }),
    }
}

fn record_artifact(path: &Path) -> RecordedArtifact {
    RecordedArtifact {
        path: path.to_path_buf(),
        contents: fs::read_to_string(path).map_err(|error| error.to_string()),
    }
}
