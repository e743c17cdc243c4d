//! Thread-safe ledger of in-flight and completed downloads.

use std::sync::{Arc, Mutex};

/// Point-in-time state of one download; exactly one live record per filename.
#[derive(Debug, Clone)]
pub struct DownloadRecord {
    pub filename: String,
    pub total_size: u64,
    pub downloaded_bytes: u64,
    pub completed: bool,
}

impl DownloadRecord {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total_size == 0 {
            return 1.0;
        }
        (self.downloaded_bytes as f64 / self.total_size as f64).min(1.0)
    }
}

/// Download ledger. Cheap to clone and share across worker threads; every
/// operation runs under one exclusive section and the lock never escapes.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    records: Arc<Mutex<Vec<DownloadRecord>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the record for `filename`, or reset an existing one.
    pub fn register(&self, filename: &str, total_size: u64) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.filename == filename) {
            record.total_size = total_size;
            record.downloaded_bytes = 0;
            record.completed = false;
            return;
        }
        records.push(DownloadRecord {
            filename: filename.to_string(),
            total_size,
            downloaded_bytes: 0,
            completed: false,
        });
    }

    /// Add `bytes` to the record, clamped so downloaded never exceeds total.
    /// Unknown filenames are ignored.
    pub fn add_progress(&self, filename: &str, bytes: u64) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.filename == filename) {
            record.downloaded_bytes = record
                .downloaded_bytes
                .saturating_add(bytes)
                .min(record.total_size);
        }
    }

    /// Force the record to fully downloaded and mark it completed.
    pub fn complete(&self, filename: &str) {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.iter_mut().find(|r| r.filename == filename) {
            record.downloaded_bytes = record.total_size;
            record.completed = true;
        }
    }

    /// Consistent point-in-time copy of every record, for display.
    pub fn snapshot(&self) -> Vec<DownloadRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_progress_clamps_to_total() {
        let tracker = ProgressTracker::new();
        tracker.register("a.bin", 100);
        tracker.add_progress("a.bin", 60);
        tracker.add_progress("a.bin", 60);
        tracker.add_progress("a.bin", 10);
        let records = tracker.snapshot();
        assert_eq!(records[0].downloaded_bytes, 100);
        assert!(!records[0].completed);
    }

    #[test]
    fn register_resets_existing_record() {
        let tracker = ProgressTracker::new();
        tracker.register("a.bin", 100);
        tracker.add_progress("a.bin", 40);
        tracker.register("a.bin", 200);
        let records = tracker.snapshot();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].total_size, 200);
        assert_eq!(records[0].downloaded_bytes, 0);
    }

    #[test]
    fn complete_forces_full_download() {
        let tracker = ProgressTracker::new();
        tracker.register("a.bin", 100);
        tracker.add_progress("a.bin", 10);
        tracker.complete("a.bin");
        let records = tracker.snapshot();
        assert_eq!(records[0].downloaded_bytes, 100);
        assert!(records[0].completed);
    }

    #[test]
    fn unknown_filename_is_ignored() {
        let tracker = ProgressTracker::new();
        tracker.add_progress("ghost.bin", 10);
        tracker.complete("ghost.bin");
        assert!(tracker.snapshot().is_empty());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let tracker = ProgressTracker::new();
        tracker.register("a.bin", 100);
        let before = tracker.snapshot();
        tracker.add_progress("a.bin", 50);
        assert_eq!(before[0].downloaded_bytes, 0);
        assert_eq!(tracker.snapshot()[0].downloaded_bytes, 50);
    }

    #[test]
    fn fraction_handles_zero_total() {
        let record = DownloadRecord {
            filename: "empty".to_string(),
            total_size: 0,
            downloaded_bytes: 0,
            completed: false,
        };
        assert_eq!(record.fraction(), 1.0);
    }
}
