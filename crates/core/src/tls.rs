//! Temporary PEM files for client libraries that only accept TLS material by
//! path.
//!
//! Each supplied body is wrapped in certificate markers and written to its own
//! uniquely named file under the configured directory. The files live as long
//! as the [`TlsArtifacts`] value and are removed when it is dropped, which
//! happens right after the connect attempt returns.

use std::{io::Write, path::Path};

use tempfile::{Builder, NamedTempFile};

use crate::{TlsError, TlsMaterial, TlsPaths};

pub const PEM_BEGIN_MARKER: &str = "-----BEGIN CERTIFICATE-----";
pub const PEM_END_MARKER: &str = "-----END CERTIFICATE-----";

const KEY_PREFIX: &str = "dblink_key_";
const CERT_PREFIX: &str = "dblink_cert_";
const CA_PREFIX: &str = "dblink_ca_";

#[derive(Debug)]
pub struct TlsArtifacts {
    key: Option<NamedTempFile>,
    cert: Option<NamedTempFile>,
    ca: Option<NamedTempFile>,
}

impl TlsArtifacts {
    /// Returns `Ok(None)` when `material` holds no body at all.
    pub fn materialize(material: &TlsMaterial, dir: &Path) -> Result<Option<Self>, TlsError> {
        if material.is_empty() {
            return Ok(None);
        }

        let artifacts = Self {
            key: write_optional(material.key(), dir, KEY_PREFIX, "key")?,
            cert: write_optional(material.cert(), dir, CERT_PREFIX, "cert")?,
            ca: write_optional(material.ca(), dir, CA_PREFIX, "ca")?,
        };
        tracing::debug!(
            key = artifacts.key.is_some(),
            cert = artifacts.cert.is_some(),
            ca = artifacts.ca.is_some(),
            dir = %dir.display(),
            "wrote temporary TLS material"
        );
        Ok(Some(artifacts))
    }

    #[must_use]
    pub fn paths(&self) -> TlsPaths<'_> {
        TlsPaths {
            key: self.key.as_ref().map(NamedTempFile::path),
            cert: self.cert.as_ref().map(NamedTempFile::path),
            ca: self.ca.as_ref().map(NamedTempFile::path),
        }
    }
}

#[must_use]
pub fn wrap_pem_body(body: &str) -> String {
    format!("{PEM_BEGIN_MARKER}\n{body}\n{PEM_END_MARKER}")
}

fn write_optional(
    body: Option<&str>,
    dir: &Path,
    prefix: &str,
    kind: &'static str,
) -> Result<Option<NamedTempFile>, TlsError> {
    body.map(|body| write_artifact(body, dir, prefix, kind))
        .transpose()
}

fn write_artifact(
    body: &str,
    dir: &Path,
    prefix: &str,
    kind: &'static str,
) -> Result<NamedTempFile, TlsError> {
    let mut file = Builder::new()
        .prefix(prefix)
        .tempfile_in(dir)
        .map_err(|source| TlsError::CreateArtifact {
            kind,
            dir: dir.to_path_buf(),
            source,
        })?;

    file.write_all(wrap_pem_body(body).as_bytes())
        .and_then(|()| file.flush())
        .map_err(|source| TlsError::WriteArtifact {
            kind,
            path: file.path().to_path_buf(),
            source,
        })?;

    Ok(file)
}
