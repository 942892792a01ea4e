use dblink_core::Value;
use mysql::{
    Column,
    consts::{ColumnFlags, ColumnType},
};

/// Text-protocol values arrive as bytes; integer and floating point columns
/// are parsed, everything else (including DECIMAL) stays textual.
pub(crate) fn convert_value(column: &Column, value: mysql::Value) -> Value {
    match value {
        mysql::Value::NULL => Value::Null,
        mysql::Value::Int(int) => Value::Int(int),
        mysql::Value::UInt(uint) => Value::UInt(uint),
        mysql::Value::Float(float) => Value::Double(f64::from(float)),
        mysql::Value::Double(double) => Value::Double(double),
        mysql::Value::Bytes(bytes) => convert_bytes(
            column.column_type(),
            column.flags().contains(ColumnFlags::UNSIGNED_FLAG),
            bytes,
        ),
        mysql::Value::Date(year, month, day, hour, minute, second, micros) => {
            let mut text = format!(
                "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
            );
            push_micros(&mut text, micros);
            Value::Text(text)
        }
        mysql::Value::Time(negative, days, hours, minutes, seconds, micros) => {
            let sign = if negative { "-" } else { "" };
            let hours = u64::from(days) * 24 + u64::from(hours);
            let mut text = format!("{sign}{hours:02}:{minutes:02}:{seconds:02}");
            push_micros(&mut text, micros);
            Value::Text(text)
        }
    }
}

fn convert_bytes(column_type: ColumnType, unsigned: bool, bytes: Vec<u8>) -> Value {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(error) => return Value::Bytes(error.into_bytes()),
    };

    let parsed = if is_integer(column_type) {
        if unsigned {
            text.parse::<u64>().ok().map(Value::UInt)
        } else {
            text.parse::<i64>().ok().map(Value::Int)
        }
    } else if is_floating(column_type) {
        text.parse::<f64>().ok().map(Value::Double)
    } else {
        None
    };

    parsed.unwrap_or(Value::Text(text))
}

fn is_integer(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_TINY
            | ColumnType::MYSQL_TYPE_SHORT
            | ColumnType::MYSQL_TYPE_INT24
            | ColumnType::MYSQL_TYPE_LONG
            | ColumnType::MYSQL_TYPE_LONGLONG
            | ColumnType::MYSQL_TYPE_YEAR
    )
}

fn is_floating(column_type: ColumnType) -> bool {
    matches!(
        column_type,
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE
    )
}

fn push_micros(text: &mut String, micros: u32) {
    if micros > 0 {
        text.push_str(&format!(".{micros:06}"));
    }
}
