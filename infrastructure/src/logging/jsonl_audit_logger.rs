//! JSONL file writer for audit events.
//!
//! Each [`AuditEvent`] is serialized as a single JSON line with a `type`
//! field and `timestamp`, appended to the file via a buffered writer.

use opsroute_application::{AuditEvent, AuditLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

/// JSONL audit logger that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every record and
/// on `Drop`. Write errors never reach the caller; the first one is reported
/// through `tracing` and all of them are counted.
pub struct JsonlAuditLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    failed_writes: AtomicU64,
}

impl JsonlAuditLogger {
    /// Open (or create) the audit file at `path` in append mode.
    ///
    /// Creates parent directories if they don't exist. Returns `None` if
    /// the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create audit log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open audit log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            failed_writes: AtomicU64::new(0),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records that could not be written.
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    fn write_line(&self, line: &str) -> std::io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        writeln!(writer, "{}", line)?;
        writer.flush()
    }

    fn record_failure(&self, event_type: &str, error: &str) {
        if self.failed_writes.fetch_add(1, Ordering::Relaxed) == 0 {
            warn!(
                "Audit log {} is not writable ({}); dropping '{}' and later failures are counted only",
                self.path.display(),
                error,
                event_type
            );
        }
    }
}

/// Flatten an event into one JSON object: payload fields plus `type` and
/// `timestamp`. Non-object payloads are nested under `data`.
fn audit_record(event: AuditEvent, timestamp: String) -> serde_json::Value {
    match event.payload {
        serde_json::Value::Object(mut fields) => {
            fields.insert("type".into(), event.event_type.into());
            fields.insert("timestamp".into(), timestamp.into());
            serde_json::Value::Object(fields)
        }
        data => serde_json::json!({
            "type": event.event_type,
            "timestamp": timestamp,
            "data": data,
        }),
    }
}

impl AuditLogger for JsonlAuditLogger {
    fn log(&self, event: AuditEvent) {
        let event_type = event.event_type;
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let result = serde_json::to_string(&audit_record(event, timestamp))
            .map_err(|e| e.to_string())
            .and_then(|line| self.write_line(&line).map_err(|e| e.to_string()));

        if let Err(e) = result {
            self.record_failure(event_type, &e);
        }
    }
}

impl Drop for JsonlAuditLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsroute_application::ports::audit_logger::{EXECUTION_COMPLETED, ROUTING_DECISION};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::new(&path).unwrap();

        logger.log(AuditEvent::new(
            ROUTING_DECISION,
            serde_json::json!({
                "backend": "config_management",
                "rule": 1,
                "keyword": ">",
            }),
        ));
        logger.log(AuditEvent::new(
            EXECUTION_COMPLETED,
            serde_json::json!({ "exit_code": 0, "duration_ms": 12 }),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        for record in &records {
            assert!(record.get("timestamp").is_some());
        }
        assert_eq!(records[0]["type"], "routing_decision");
        assert_eq!(records[0]["backend"], "config_management");
        assert_eq!(records[0]["rule"], 1);
        assert_eq!(records[1]["type"], "execution_completed");
        assert_eq!(records[1]["exit_code"], 0);
    }

    #[test]
    fn test_appends_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("audit.jsonl");

        for n in 0..2 {
            let logger = JsonlAuditLogger::new(&path).unwrap();
            logger.log(AuditEvent::new(ROUTING_DECISION, serde_json::json!({ "n": n })));
        }

        let records = read_lines(&path);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["n"], 1);
    }

    #[test]
    fn test_non_object_payload_is_wrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let logger = JsonlAuditLogger::new(&path).unwrap();

        logger.log(AuditEvent::new(
            ROUTING_DECISION,
            serde_json::json!("just a string"),
        ));
        drop(logger);

        let records = read_lines(&path);
        assert_eq!(records[0]["type"], "routing_decision");
        assert_eq!(records[0]["data"], "just a string");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_write_failures_are_counted_not_raised() {
        // Every write to /dev/full fails with ENOSPC
        let logger = JsonlAuditLogger::new("/dev/full").unwrap();
        logger.log(AuditEvent::new(ROUTING_DECISION, serde_json::json!({ "n": 1 })));
        logger.log(AuditEvent::new(EXECUTION_COMPLETED, serde_json::json!({ "n": 2 })));
        assert_eq!(logger.failed_writes(), 2);
    }

    #[test]
    fn test_successful_writes_are_not_counted_as_failures() {
        let dir = tempfile::tempdir().unwrap();
        let logger = JsonlAuditLogger::new(dir.path().join("audit.jsonl")).unwrap();
        logger.log(AuditEvent::new(ROUTING_DECISION, serde_json::json!({})));
        assert_eq!(logger.failed_writes(), 0);
    }

    #[test]
    fn test_directory_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlAuditLogger::new(dir.path()).is_none());
    }
}
