#[path = "support/fixtures.rs"]
mod fixtures;

use std::fs;

use dblink_core::{
    ConnectionConfig, Database, DriverError, Error, TlsMaterial, tls::wrap_pem_body,
};
use dblink_testkit::{ScriptedDriver, ScriptedResponse};
use fixtures::{TIME_ZONE_SQL, config, session_statements, tls_config};
use tempfile::tempdir;

#[test]
fn empty_port_connects_on_3306() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();

    let database = Database::connect(&driver, &config(dir.path())).expect("connect");

    assert!(database.is_connected());
    let connect = driver.last_connect().expect("connect must be recorded");
    assert_eq!(connect.port, 3306);
    assert_eq!(connect.hostname, "db");
    assert_eq!(connect.username, "u");
    assert_eq!(connect.password, "p");
    assert_eq!(connect.database, "app");
}

#[test]
fn explicit_port_is_passed_through() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();

    let _database =
        Database::connect(&driver, &config(dir.path()).with_port("3307")).expect("connect");

    assert_eq!(driver.last_connect().map(|connect| connect.port), Some(3307));
}

#[test]
fn invalid_port_fails_before_connecting() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();

    let error = Database::connect(&driver, &config(dir.path()).with_port("db-port"))
        .expect_err("invalid port must fail");

    assert!(matches!(error, Error::Config(_)));
    assert!(driver.connects().is_empty());
}

#[test]
fn no_tls_material_connects_in_plaintext() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    let config = config(dir.path()).with_tls(TlsMaterial {
        key: Some(String::new()),
        cert: Some(String::new()),
        ca: Some(String::new()),
    });

    let _database = Database::connect(&driver, &config).expect("connect");

    let connect = driver.last_connect().expect("connect must be recorded");
    assert!(connect.tls.is_none());
}

#[test]
fn any_single_tls_body_requests_tls_with_only_that_file() {
    for (key, cert, ca) in [
        (Some("KEYBODY"), None, None),
        (None, Some("CERTBODY"), None),
        (None, None, Some("CABODY")),
    ] {
        let dir = tempdir().expect("create tempdir");
        let driver = ScriptedDriver::default();
        let config = config(dir.path()).with_tls(TlsMaterial {
            key: key.map(str::to_string),
            cert: cert.map(str::to_string),
            ca: ca.map(str::to_string),
        });

        let _database = Database::connect(&driver, &config).expect("connect");

        let tls = driver
            .last_connect()
            .and_then(|connect| connect.tls)
            .expect("any TLS body must request an encrypted session");
        assert_eq!(
            tls.key.map(|artifact| artifact.contents),
            key.map(wrap_pem_body).map(Ok)
        );
        assert_eq!(
            tls.cert.map(|artifact| artifact.contents),
            cert.map(wrap_pem_body).map(Ok)
        );
        assert_eq!(
            tls.ca.map(|artifact| artifact.contents),
            ca.map(wrap_pem_body).map(Ok)
        );
    }
}

#[test]
fn tls_artifacts_use_distinct_files_in_configured_dir_and_are_removed() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();

    let database =
        Database::connect(&driver, &tls_config(dir.path(), "K", "C", "A")).expect("connect");

    let tls = driver
        .last_connect()
        .and_then(|connect| connect.tls)
        .expect("tls connect");
    let paths = [tls.key, tls.cert, tls.ca].map(|artifact| {
        artifact
            .expect("all three artifacts must be written")
            .path
    });

    assert_ne!(paths[0], paths[1]);
    assert_ne!(paths[1], paths[2]);
    assert_ne!(paths[0], paths[2]);
    for path in &paths {
        assert!(path.starts_with(dir.path()), "{} outside temp dir", path.display());
        assert!(!path.exists(), "{} must be removed after connect", path.display());
    }

    assert!(database.is_connected());
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn tls_artifacts_are_removed_when_connect_fails() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    driver.fail_connect(DriverError::client("TLS handshake failed"));

    let error = Database::connect(&driver, &tls_config(dir.path(), "K", "C", "A"))
        .expect_err("connect must fail");

    assert!(matches!(error, Error::Connect(_)));
    assert_eq!(fs::read_dir(dir.path()).expect("read dir").count(), 0);
}

#[test]
fn concurrent_constructions_with_same_material_do_not_collide() {
    let dir = tempdir().expect("create tempdir");
    let first = ScriptedDriver::default();
    let second = ScriptedDriver::default();
    let config = tls_config(dir.path(), "K", "C", "A");

    let _a = Database::connect(&first, &config).expect("first connect");
    let _b = Database::connect(&second, &config).expect("second connect");

    let first_ca = first
        .last_connect()
        .and_then(|connect| connect.tls)
        .and_then(|tls| tls.ca)
        .expect("first ca");
    let second_ca = second
        .last_connect()
        .and_then(|connect| connect.tls)
        .and_then(|tls| tls.ca)
        .expect("second ca");
    assert_ne!(first_ca.path, second_ca.path);
}

#[test]
fn session_is_prepared_in_order_after_connect() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();

    let _database = Database::connect(&driver, &config(dir.path())).expect("connect");

    assert_eq!(driver.charsets(), vec!["utf8mb4".to_string()]);
    assert_eq!(driver.executed_sql(), session_statements());
}

#[test]
fn host_offset_is_used_when_no_override_is_set() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    let config = ConnectionConfig::new("db", "u", "p", "app").with_temp_dir(dir.path());

    let _database = Database::connect(&driver, &config).expect("connect");

    let time_zone_sql = driver
        .executed_sql()
        .last()
        .cloned()
        .expect("time zone statement");
    let offset = time_zone_sql
        .strip_prefix("SET `time_zone` = '")
        .and_then(|rest| rest.strip_suffix('\''))
        .expect("time zone literal");
    let bytes = offset.as_bytes();
    assert_eq!(bytes.len(), 6, "offset `{offset}` must be +HH:MM");
    assert!(matches!(bytes[0], b'+' | b'-'));
    assert_eq!(bytes[3], b':');
}

#[test]
fn connect_failure_reports_user_and_host() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    driver.fail_connect(DriverError::server(1045, "Access denied for user 'u'@'%'"));

    let error = Database::connect(&driver, &config(dir.path())).expect_err("connect must fail");

    let Error::Connect(connect) = error else {
        panic!("expected connect error, got {error:?}");
    };
    assert_eq!(connect.username, "u");
    assert_eq!(connect.hostname, "db");
    assert!(connect.to_string().contains("Access denied"));
    assert!(driver.executed_sql().is_empty());
}

#[test]
fn session_statement_failure_aborts_and_closes_connection() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    driver.respond(
        TIME_ZONE_SQL,
        ScriptedResponse::error(1298, "Unknown or incorrect time zone: '+02:00'"),
    );

    let error = Database::connect(&driver, &config(dir.path())).expect_err("connect must fail");

    assert!(matches!(error, Error::Connect(_)));
    assert!(error.to_string().contains("Unknown or incorrect time zone"));
    assert_eq!(driver.close_count(), 1);
}

#[test]
fn charset_failure_aborts_before_session_statements() {
    let dir = tempdir().expect("create tempdir");
    let driver = ScriptedDriver::default();
    driver.fail_charset(DriverError::server(1115, "Unknown character set: 'utf8mb4'"));

    let error = Database::connect(&driver, &config(dir.path())).expect_err("connect must fail");

    assert!(matches!(error, Error::Connect(_)));
    assert!(driver.executed_sql().is_empty());
    assert_eq!(driver.close_count(), 1);
}
