use std::collections::BTreeMap;

use dblink_core::{DriverError, Row, Value};
use serde::Deserialize;

/// Canned responses keyed by the exact SQL text a connection receives.
pub type Script = BTreeMap<String, ScriptedResponse>;

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptedResponse {
    /// Present for statements that produce a result set, even an empty one.
    pub rows: Option<Vec<serde_yaml::Mapping>>,
    /// Overrides the row count the driver reports; defaults to `rows.len()`.
    pub num_rows: Option<u64>,
    pub affected_rows: u64,
    pub last_insert_id: Option<u64>,
    pub error: Option<ScriptedError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedError {
    pub code: u16,
    pub message: String,
}

impl ScriptedResponse {
    #[must_use]
    pub fn rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Some(rows.iter().map(row_to_mapping).collect()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn write(affected_rows: u64, last_insert_id: Option<u64>) -> Self {
        Self {
            affected_rows,
            last_insert_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self {
            error: Some(ScriptedError {
                code,
                message: message.into(),
            }),
            ..Self::default()
        }
    }

    pub(crate) fn driver_error(&self) -> Option<DriverError> {
        self.error
            .as_ref()
            .map(|error| DriverError::server(error.code, error.message.clone()))
    }

    pub(crate) fn result_rows(&self) -> Option<Vec<Row>> {
        self.rows
            .as_ref()
            .map(|rows| rows.iter().map(mapping_to_row).collect())
    }
}

pub fn load_script_from_str(yaml: &str) -> Result<Script, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

fn mapping_to_row(mapping: &serde_yaml::Mapping) -> Row {
    mapping
        .iter()
        .map(|(column, value)| (yaml_key(column), yaml_to_value(value)))
        .collect()
}

fn row_to_mapping(row: &Row) -> serde_yaml::Mapping {
    row.iter()
        .map(|(column, value)| {
            (
                serde_yaml::Value::String(column.to_string()),
                value_to_yaml(value),
            )
        })
        .collect()
}

fn yaml_key(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(name) => name.clone(),
        other => yaml_to_value(other).to_string(),
    }
}

fn yaml_to_value(value: &serde_yaml::Value) -> Value {
    match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(flag) => Value::Int(i64::from(*flag)),
        serde_yaml::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::Int(int)
            } else if let Some(uint) = number.as_u64() {
                Value::UInt(uint)
            } else {
                Value::Double(number.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_yaml::Value::String(text) => Value::Text(text.clone()),
        serde_yaml::Value::Tagged(tagged) => yaml_to_value(&tagged.value),
        other => Value::Text(serde_yaml::to_string(other).unwrap_or_default()),
    }
}

fn value_to_yaml(value: &Value) -> serde_yaml::Value {
    match value {
        Value::Null => serde_yaml::Value::Null,
        Value::Int(int) => serde_yaml::Value::from(*int),
        Value::UInt(uint) => serde_yaml::Value::from(*uint),
        Value::Double(double) => serde_yaml::Value::from(*double),
        Value::Text(text) => serde_yaml::Value::String(text.clone()),
        Value::Bytes(bytes) => serde_yaml::Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}
