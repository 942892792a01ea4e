mod driver;
mod value;

use dblink_core::{ConnectionConfig, Database, Result};

pub use driver::{MysqlConnection, MysqlDriver};

pub type MysqlDatabase = Database<MysqlConnection>;

/// Connects to a MySQL-compatible server with the `mysql` crate.
pub fn connect(config: &ConnectionConfig) -> Result<MysqlDatabase> {
    Database::connect(&MysqlDriver, config)
}
