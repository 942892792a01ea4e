use std::path::Path;

use dblink_core::{ConnectRequest, Driver, DriverConnection, QueryOutput, TlsPaths, Value};
use dblink_testkit::{ScriptedDriver, ScriptedError, load_script_from_str};

const SCRIPT: &str = r#"
"SELECT x, label FROM t":
  rows:
    - { x: 1, label: one }
    - { x: 2, label: ~ }
"SELECT x FROM empty":
  rows: []
"INSERT INTO t(x) VALUES (1)":
  affected_rows: 1
  last_insert_id: 42
"SELEC broken":
  error:
    code: 1064
    message: You have an error in your SQL syntax
"#;

fn plaintext_request() -> ConnectRequest<'static> {
    ConnectRequest {
        hostname: "db",
        port: 3306,
        username: "u",
        password: "p",
        database: "app",
        tls: None,
    }
}

#[test]
fn script_fields_parse_with_defaults() {
    let script = load_script_from_str(SCRIPT).expect("yaml must parse");

    let insert = script
        .get("INSERT INTO t(x) VALUES (1)")
        .expect("insert response must be present");
    assert!(insert.rows.is_none());
    assert_eq!(insert.affected_rows, 1);
    assert_eq!(insert.last_insert_id, Some(42));

    let broken = script.get("SELEC broken").expect("error response");
    assert_eq!(
        broken.error,
        Some(ScriptedError {
            code: 1064,
            message: "You have an error in your SQL syntax".to_string(),
        })
    );

    let empty = script.get("SELECT x FROM empty").expect("empty response");
    assert_eq!(empty.rows.as_ref().map(Vec::len), Some(0));
}

#[test]
fn unknown_fields_are_rejected() {
    let yaml = r#"
"SELECT 1":
  rowz: []
"#;
    assert!(load_script_from_str(yaml).is_err());
}

#[test]
fn scripted_rows_keep_column_order_and_value_types() {
    let driver = ScriptedDriver::new(load_script_from_str(SCRIPT).expect("yaml must parse"));
    let mut connection = driver.connect(&plaintext_request()).expect("connect");

    let output = connection
        .query("SELECT x, label FROM t")
        .expect("scripted query");
    let QueryOutput::Rows { num_rows, rows } = output else {
        panic!("select must produce rows, got {output:?}");
    };

    assert_eq!(num_rows, 2);
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), vec!["x", "label"]);
    assert_eq!(rows[0].get("x"), Some(&Value::Int(1)));
    assert_eq!(rows[0].get("label"), Some(&Value::Text("one".to_string())));
    assert_eq!(rows[1].get("label"), Some(&Value::Null));
}

#[test]
fn unscripted_statements_succeed_without_rows() {
    let driver = ScriptedDriver::default();
    let mut connection = driver.connect(&plaintext_request()).expect("connect");

    assert_eq!(
        connection.query("SET FOREIGN_KEY_CHECKS = 0"),
        Ok(QueryOutput::Done)
    );
    assert_eq!(connection.affected_rows(), 0);
    assert_eq!(driver.executed_sql(), vec!["SET FOREIGN_KEY_CHECKS = 0"]);

    connection.close();
    assert_eq!(driver.close_count(), 1);
}

#[test]
fn scripted_errors_carry_server_code() {
    let driver = ScriptedDriver::new(load_script_from_str(SCRIPT).expect("yaml must parse"));
    let mut connection = driver.connect(&plaintext_request()).expect("connect");

    let error = connection
        .query("SELEC broken")
        .expect_err("scripted error must surface");
    assert_eq!(error.code, Some(1064));
    assert!(error.message.contains("SQL syntax"));
}

#[test]
fn unreadable_tls_artifact_is_recorded_instead_of_aborting() {
    let driver = ScriptedDriver::default();
    let missing = Path::new("/nonexistent/dblink_ca_missing.pem");
    let request = ConnectRequest {
        tls: Some(TlsPaths {
            ca: Some(missing),
            ..TlsPaths::default()
        }),
        ..plaintext_request()
    };

    let _connection = driver.connect(&request).expect("connect must succeed");

    let ca = driver
        .last_connect()
        .and_then(|connect| connect.tls)
        .and_then(|tls| tls.ca)
        .expect("ca artifact must be recorded");
    assert_eq!(ca.path, missing);
    assert!(ca.contents.is_err(), "got: {:?}", ca.contents);
}

#[test]
fn escape_follows_scripted_server_mode_and_is_recorded() {
    let driver = ScriptedDriver::default();
    let connection = driver
        .connect(&plaintext_request())
        .expect("connect must succeed");

    assert!(!connection.no_backslash_escapes());
    assert_eq!(connection.escape("it's"), "it\\'s");

    driver.set_no_backslash_escapes(true);
    assert!(connection.no_backslash_escapes());
    assert_eq!(connection.escape("it's"), "it''s");

    driver.escape_as("marker", "escaped-marker");
    assert_eq!(connection.escape("marker"), "escaped-marker");

    assert_eq!(driver.escaped_values(), ["it's", "it's", "marker"]);
}
