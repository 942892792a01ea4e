use chrono::{FixedOffset, Local, Offset};

pub const SESSION_CHARSET: &str = "utf8mb4";
pub const SQL_MODE_SQL: &str = "SET SESSION sql_mode = 'NO_ZERO_IN_DATE,NO_ENGINE_SUBSTITUTION'";
pub const FOREIGN_KEY_CHECKS_SQL: &str = "SET FOREIGN_KEY_CHECKS = 0";

#[must_use]
pub fn local_utc_offset() -> FixedOffset {
    Local::now().offset().fix()
}

/// Formats an offset as `+HH:MM` / `-HH:MM`.
#[must_use]
pub fn format_utc_offset(offset: FixedOffset) -> String {
    let seconds = offset.local_minus_utc();
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}

/// `escaped_offset` must already be escaped for a string literal.
#[must_use]
pub fn time_zone_sql(escaped_offset: &str) -> String {
    format!("SET `time_zone` = '{escaped_offset}'")
}
