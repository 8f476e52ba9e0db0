//! rollcall-ledger — the attendance table.
//!
//! A flat CSV file with a `Name,Timestamp` header and at most one row per
//! person per process run. The file is opened and closed for every append.

use chrono::{Local, NaiveDateTime};
use rollcall_core::Identity;
use serde::Serialize;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Header row written when the ledger file is created.
pub const HEADER: [&str; 2] = ["Name", "Timestamp"];

/// Local-time, second-precision timestamp format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("ledger csv: {0}")]
    Csv(#[from] csv::Error),
}

/// One attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
}

/// Append-only attendance table plus the names already logged this run.
#[derive(Debug)]
pub struct AttendanceLedger {
    path: PathBuf,
    seen: HashSet<String>,
}

impl AttendanceLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            seen: HashSet::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: io::Error) -> LedgerError {
        LedgerError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Make the ledger file writable, creating it with the header if missing.
    ///
    /// Existing contents are never touched, so repeated calls are no-ops.
    pub fn ensure_ready(&self) -> Result<(), LedgerError> {
        match fs::metadata(&self.path) {
            Ok(meta) => {
                let perms = meta.permissions();
                if !owner_can_write(&perms) {
                    tracing::info!(path = %self.path.display(), "making ledger writable");
                    fs::set_permissions(&self.path, writable(perms)).map_err(|e| self.io_err(e))?;
                }
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let file = fs::File::create(&self.path).map_err(|e| self.io_err(e))?;
                let mut writer = csv_writer(file);
                writer.write_record(HEADER)?;
                writer.flush().map_err(|e| self.io_err(e))?;
                tracing::info!(path = %self.path.display(), "created attendance ledger");
                Ok(())
            }
            Err(e) => Err(self.io_err(e)),
        }
    }

    /// Log `identity` now. See [`mark_at`](Self::mark_at).
    pub fn mark(&mut self, identity: &Identity) -> Result<Option<AttendanceRecord>, LedgerError> {
        self.mark_at(identity, Local::now().naive_local())
    }

    /// Append one row for `identity` unless it is unknown or already logged.
    ///
    /// Returns the written record, or `None` when nothing was appended. The
    /// name only joins the seen-set after the row is on disk.
    pub fn mark_at(
        &mut self,
        identity: &Identity,
        at: NaiveDateTime,
    ) -> Result<Option<AttendanceRecord>, LedgerError> {
        let Some(name) = identity.name() else {
            return Ok(None);
        };
        if self.seen.contains(name) {
            return Ok(None);
        }

        let record = AttendanceRecord {
            name: name.to_string(),
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
        };

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_err(e))?;
        let mut writer = csv_writer(file);
        writer.serialize(&record)?;
        writer.flush().map_err(|e| self.io_err(e))?;

        self.seen.insert(record.name.clone());
        tracing::info!(name = %record.name, timestamp = %record.timestamp, "attendance marked");
        Ok(Some(record))
    }

    /// Whether `name` was already logged during this run.
    pub fn is_marked(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn marked_count(&self) -> usize {
        self.seen.len()
    }
}

fn csv_writer<W: io::Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::CRLF)
        .from_writer(inner)
}

#[cfg(unix)]
fn owner_can_write(perms: &fs::Permissions) -> bool {
    use std::os::unix::fs::PermissionsExt;
    perms.mode() & 0o200 != 0
}

#[cfg(not(unix))]
fn owner_can_write(perms: &fs::Permissions) -> bool {
    !perms.readonly()
}

#[cfg(unix)]
fn writable(perms: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(perms.mode() | 0o200)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn writable(mut perms: fs::Permissions) -> fs::Permissions {
    perms.set_readonly(false);
    perms
}
