/// Flat-file persistence for guest responses.
///
/// The whole guest list lives in one JSON array (`guests.json`). Every read parses
/// the full file and every mutation rewrites it in full. A single async mutex
/// serializes access within the process so concurrent submissions cannot drop
/// each other's appends. The rewrite itself is not atomic.
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::warn;

use crate::error::CommonError;
use crate::model::{coerce_attendance, Attendance, GuestRecord};

pub const GUESTS_FILE_NAME: &str = "guests.json";

#[derive(Debug)]
pub struct GuestStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl GuestStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Store backed by `guests.json` inside `data_dir`.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(GUESTS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file with an empty array if it does not exist yet.
    pub async fn ensure_exists(&self) -> Result<(), CommonError> {
        if tokio::fs::try_exists(&self.path).await.map_err(|e| self.io_err(e))? {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_err(e))?;
        }
        tokio::fs::write(&self.path, "[]")
            .await
            .map_err(|e| self.io_err(e))
    }

    /// All stored records in insertion order, with legacy grouped entries expanded.
    pub async fn read_all(&self) -> Result<Vec<GuestRecord>, CommonError> {
        let _guard = self.lock.lock().await;
        self.read_records().await
    }

    /// Append one record per name, all sharing `attendance`, and return the new records.
    pub async fn append(
        &self,
        guests: &[String],
        attendance: Attendance,
    ) -> Result<Vec<GuestRecord>, CommonError> {
        let created: Vec<GuestRecord> = guests
            .iter()
            .map(|guest| GuestRecord::new(guest.as_str(), attendance))
            .collect();

        let _guard = self.lock.lock().await;
        let mut records = self.read_records().await?;
        records.extend(created.iter().cloned());
        self.write_records(&records).await?;
        Ok(created)
    }

    // Callers hold `lock`.
    async fn read_records(&self) -> Result<Vec<GuestRecord>, CommonError> {
        self.ensure_exists().await?;
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_err(e))?;
        let entries: Vec<Value> = serde_json::from_str(&raw)?;
        normalize(entries)
    }

    // Callers hold `lock`. Replaces the whole file.
    async fn write_records(&self, records: &[GuestRecord]) -> Result<(), CommonError> {
        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| self.io_err(e))
    }

    fn io_err(&self, source: std::io::Error) -> CommonError {
        CommonError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Flatten stored items into records.
///
/// Items carrying `attendance` plus `guest` (or the legacy `guests` list) are
/// always kept. Anything else is skipped. A recognized item whose values cannot
/// be read fails the whole read so the next rewrite cannot lose it.
fn normalize(entries: Vec<Value>) -> Result<Vec<GuestRecord>, CommonError> {
    let mut records = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Some(item) = entry.as_object() else {
            warn!(index, entry = %entry, "skipping unrecognized guest store entry");
            continue;
        };
        let Some(raw_attendance) = item.get("attendance") else {
            warn!(index, entry = %entry, "skipping unrecognized guest store entry");
            continue;
        };

        if let Some(guest) = item.get("guest") {
            let attendance = stored_attendance(index, raw_attendance)?;
            records.push(GuestRecord {
                guest: stored_name(index, guest)?,
                attendance,
            });
        } else if let Some(guests) = item.get("guests") {
            let attendance = stored_attendance(index, raw_attendance)?;
            for guest in grouped_names(index, guests)? {
                records.push(GuestRecord {
                    guest: stored_name(index, guest)?,
                    attendance,
                });
            }
        } else {
            warn!(index, entry = %entry, "skipping unrecognized guest store entry");
        }
    }
    Ok(records)
}

fn stored_attendance(index: usize, value: &Value) -> Result<i64, CommonError> {
    coerce_attendance(value).ok_or_else(|| CommonError::InvalidEntry {
        index,
        reason: format!("attendance {value} is not an integer"),
    })
}

fn stored_name(index: usize, value: &Value) -> Result<String, CommonError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| CommonError::InvalidEntry {
            index,
            reason: format!("guest {value} is not a string"),
        })
}

fn grouped_names(index: usize, value: &Value) -> Result<&Vec<Value>, CommonError> {
    value.as_array().ok_or_else(|| CommonError::InvalidEntry {
        index,
        reason: format!("guests {value} is not a list"),
    })
}
