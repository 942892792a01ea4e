#![allow(dead_code)]

use std::path::Path;

use chrono::FixedOffset;
use dblink_core::{ConnectionConfig, Database, TlsMaterial};
use dblink_testkit::{ScriptedConnection, ScriptedDriver};

pub const SQL_MODE_SQL: &str = "SET SESSION sql_mode = 'NO_ZERO_IN_DATE,NO_ENGINE_SUBSTITUTION'";
pub const FOREIGN_KEY_CHECKS_SQL: &str = "SET FOREIGN_KEY_CHECKS = 0";
pub const TIME_ZONE_SQL: &str = "SET `time_zone` = '+02:00'";

pub fn config(temp_dir: &Path) -> ConnectionConfig {
    ConnectionConfig::new("db", "u", "p", "app")
        .with_temp_dir(temp_dir)
        .with_utc_offset(FixedOffset::east_opt(2 * 3600).expect("valid offset"))
}

pub fn tls_config(temp_dir: &Path, key: &str, cert: &str, ca: &str) -> ConnectionConfig {
    config(temp_dir).with_tls(TlsMaterial {
        key: Some(key.to_string()),
        cert: Some(cert.to_string()),
        ca: Some(ca.to_string()),
    })
}

pub fn connect(driver: &ScriptedDriver, temp_dir: &Path) -> Database<ScriptedConnection> {
    Database::connect(driver, &config(temp_dir)).expect("scripted connect must succeed")
}

pub fn session_statements() -> Vec<String> {
    [SQL_MODE_SQL, FOREIGN_KEY_CHECKS_SQL, TIME_ZONE_SQL]
        .into_iter()
        .map(str::to_string)
        .collect()
}
