mod config;
mod database;
mod driver;
mod error;
mod escape;
mod result;
pub mod session;
pub mod tls;
mod value;

pub use config::{ConnectionConfig, DEFAULT_PORT, TlsMaterial, parse_port};
pub use database::Database;
pub use driver::{ConnectRequest, Driver, DriverConnection, QueryOutput, TlsPaths};
pub use error::{ConfigError, ConnectError, DriverError, Error, QueryError, Result, TlsError};
pub use escape::escape_string;
pub use result::{Outcome, ResultSet};
pub use value::{Row, Value};
