/// Escapes `value` for use inside a single-quoted MySQL string literal.
///
/// With `no_backslash_escapes` set (the server reports the
/// `NO_BACKSLASH_ESCAPES` sql_mode) backslashes are literal and only quotes
/// are doubled; otherwise the backslash rules of `mysql_real_escape_string`
/// for `utf8mb4` apply.
#[must_use]
pub fn escape_string(value: &str, no_backslash_escapes: bool) -> String {
    if no_backslash_escapes {
        return value.replace('\'', "''");
    }

    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\0' => escaped.push_str("\\0"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '"' => escaped.push_str("\\\""),
            '\x1a' => escaped.push_str("\\Z"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
