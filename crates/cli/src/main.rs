mod error_presentation;
mod output;
mod pem;

use std::{
    fs,
    io::{self, IsTerminal, Read},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use dblink_core::{ConnectionConfig, TlsMaterial};
use error_presentation::{CliError, CliResult, render_runtime_error};
use tracing_subscriber::EnvFilter;

/// Run one SQL statement against a MySQL-compatible server.
#[derive(Debug, Parser)]
#[command(name = "dblink", version)]
struct Cli {
    /// Database name
    database: String,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Server port; empty means 3306
    #[arg(short = 'P', long, default_value = "")]
    port: String,

    #[arg(short = 'u', long, default_value = "root")]
    user: String,

    #[arg(short = 'p', long, default_value = "")]
    password: String,

    /// Client key PEM body (no BEGIN/END lines)
    #[arg(long, conflicts_with = "ssl_key_file")]
    ssl_key: Option<String>,

    /// Client certificate PEM body (no BEGIN/END lines)
    #[arg(long, conflicts_with = "ssl_cert_file")]
    ssl_cert: Option<String>,

    /// CA certificate PEM body (no BEGIN/END lines)
    #[arg(long, conflicts_with = "ssl_ca_file")]
    ssl_ca: Option<String>,

    #[arg(long)]
    ssl_key_file: Option<PathBuf>,

    #[arg(long)]
    ssl_cert_file: Option<PathBuf>,

    #[arg(long)]
    ssl_ca_file: Option<PathBuf>,

    /// Directory for temporary TLS files (defaults to the system temp dir)
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// SQL to run; read from stdin when omitted
    #[arg(short = 'e', long)]
    execute: Option<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> CliResult<()> {
    let sql = read_sql(cli.execute.as_deref())?;
    let config = connection_config(&cli)?;

    let mut database = dblink_mysql::connect(&config)?;
    let outcome = database.execute(&sql)?;

    let mut stdout = io::stdout().lock();
    output::write_outcome(
        &mut stdout,
        &outcome,
        database.affected_rows(),
        database.last_insert_id(),
    )
    .map_err(CliError::WriteStdout)?;
    database.close();

    Ok(())
}

fn connection_config(cli: &Cli) -> CliResult<ConnectionConfig> {
    let tls = TlsMaterial {
        key: pem_body(cli.ssl_key.as_deref(), cli.ssl_key_file.as_deref())?,
        cert: pem_body(cli.ssl_cert.as_deref(), cli.ssl_cert_file.as_deref())?,
        ca: pem_body(cli.ssl_ca.as_deref(), cli.ssl_ca_file.as_deref())?,
    };

    let mut config = ConnectionConfig::new(
        cli.host.as_str(),
        cli.user.as_str(),
        cli.password.as_str(),
        cli.database.as_str(),
    )
    .with_port(cli.port.as_str())
    .with_tls(tls);
    if let Some(temp_dir) = &cli.temp_dir {
        config = config.with_temp_dir(temp_dir.clone());
    }

    Ok(config)
}

fn pem_body(inline: Option<&str>, file: Option<&Path>) -> CliResult<Option<String>> {
    if let Some(body) = inline {
        return Ok(Some(body.to_string()));
    }

    let Some(path) = file else {
        return Ok(None);
    };
    let contents = fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(pem::body_from_file_contents(&contents)))
}

fn read_sql(execute: Option<&str>) -> CliResult<String> {
    if let Some(sql) = execute.filter(|sql| !is_blank(sql)) {
        return Ok(sql.to_string());
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Err(CliError::MissingSql);
    }

    let mut sql = String::new();
    stdin.read_to_string(&mut sql).map_err(CliError::ReadStdin)?;

    if is_blank(&sql) {
        return Err(CliError::MissingSql);
    }
    Ok(sql)
}

fn is_blank(sql: &str) -> bool {
    sql.trim().is_empty()
}
