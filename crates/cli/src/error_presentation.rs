use std::{io, path::PathBuf};

use miette::Report;

const STATEMENT_CONTEXT: &str = "while running statement";
const FILE_READ_CONTEXT: &str = "while reading TLS material file";
const STDIN_READ_CONTEXT: &str = "while reading SQL from stdin";
const STDOUT_WRITE_CONTEXT: &str = "while writing results to stdout";

pub(crate) type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug)]
pub(crate) enum CliError {
    MissingSql,
    ReadFile { path: PathBuf, source: io::Error },
    ReadStdin(io::Error),
    WriteStdout(io::Error),
    Core(dblink_core::Error),
}

impl From<dblink_core::Error> for CliError {
    fn from(value: dblink_core::Error) -> Self {
        Self::Core(value)
    }
}

pub(crate) fn render_runtime_error(error: CliError) -> String {
    match error {
        CliError::MissingSql => format!("[usage] {}", missing_sql_message()),
        CliError::ReadFile { path, source } => {
            let context = format!("{FILE_READ_CONTEXT} `{}`", path.display());
            let report = report_with_context(source, context);
            format!("[io] {report}")
        }
        CliError::ReadStdin(source) => {
            let report = report_with_context(source, STDIN_READ_CONTEXT);
            format!("[io] {report}")
        }
        CliError::WriteStdout(source) => {
            let report = report_with_context(source, STDOUT_WRITE_CONTEXT);
            format!("[io] {report}")
        }
        CliError::Core(source) => {
            let category = core_category(&source);
            let report = report_with_context(source, STATEMENT_CONTEXT);
            format!("[{category}] {report}")
        }
    }
}

fn report_with_context<E, C>(source: E, context: C) -> Report
where
    E: std::error::Error + Send + Sync + 'static,
    C: Into<String>,
{
    let context = context.into();
    let anyhow_error = anyhow::Error::new(source).context(context);
    miette::miette!("{anyhow_error:#}")
}

fn core_category(error: &dblink_core::Error) -> &'static str {
    match error {
        dblink_core::Error::Connect(_) | dblink_core::Error::Disconnected => "connect",
        dblink_core::Error::Query(_) => "query",
        dblink_core::Error::Config(_) => "config",
    }
}

fn missing_sql_message() -> &'static str {
    "missing SQL: pass --execute <SQL> or pipe SQL via stdin"
}
