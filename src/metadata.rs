//! Append-only CSV metadata log of successful captures.
//!
//! One row per saved photo. The file is created with its header on first
//! use; after that rows are only ever appended. Single-process,
//! sequential access only.

use chrono::Local;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// One successful capture. Field order defines the CSV header:
/// `dog_name,filename,filepath,timestamp`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CaptureRecord {
    pub dog_name: String,
    pub filename: String,
    pub filepath: String,
    pub timestamp: String,
}

impl CaptureRecord {
    /// Build a record for a capture that just happened, stamped with the
    /// current local time.
    pub fn new(dog_name: &str, filename: &str, filepath: &Path) -> Self {
        CaptureRecord {
            dog_name: dog_name.to_string(),
            filename: filename.to_string(),
            filepath: filepath.display().to_string(),
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Errors that can occur while writing the metadata log.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("Failed to open metadata log: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write metadata row: {0}")]
    Csv(#[from] csv::Error),
}

/// Handle on the shared metadata CSV file.
#[derive(Debug, Clone)]
pub struct MetadataLog {
    path: PathBuf,
}

impl MetadataLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        MetadataLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the file is new.
    pub fn append(&self, record: &CaptureRecord) -> Result<(), MetadataError> {
        let write_header = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(dog: &str, index: u32) -> CaptureRecord {
        let filename = format!("{}_{}.jpg", dog, index);
        CaptureRecord {
            dog_name: dog.to_string(),
            filename: filename.clone(),
            filepath: format!("dog_images/{}/{}", dog, filename),
            timestamp: "2026-08-29 12:00:00".to_string(),
        }
    }

    #[test]
    fn test_first_append_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("metadata.csv"));

        log.append(&record("gomi", 1)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let mut lines = contents.lines();
        assert_eq!(lines.next(), Some("dog_name,filename,filepath,timestamp"));
        assert_eq!(
            lines.next(),
            Some("gomi,gomi_1.jpg,dog_images/gomi/gomi_1.jpg,2026-08-29 12:00:00")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_second_append_does_not_repeat_header() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("metadata.csv"));

        log.append(&record("gomi", 1)).unwrap();
        log.append(&record("millie", 1)).unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let header_count = contents
            .lines()
            .filter(|l| *l == "dog_name,filename,filepath,timestamp")
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(contents.lines().count(), 3);
        assert!(contents.lines().nth(2).unwrap().starts_with("millie,millie_1.jpg,"));
    }

    #[test]
    fn test_rows_keep_append_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("metadata.csv"));

        for i in 1..=3 {
            log.append(&record("gomi", i)).unwrap();
        }

        let contents = std::fs::read_to_string(log.path()).unwrap();
        let names: Vec<&str> = contents
            .lines()
            .skip(1)
            .map(|l| l.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(names, ["gomi_1.jpg", "gomi_2.jpg", "gomi_3.jpg"]);
    }

    #[test]
    fn test_record_new_stamps_timestamp() {
        let rec = CaptureRecord::new("gomi", "gomi_1.jpg", Path::new("dog_images/gomi/gomi_1.jpg"));
        assert_eq!(rec.dog_name, "gomi");
        assert_eq!(rec.filename, "gomi_1.jpg");
        assert_eq!(rec.filepath, "dog_images/gomi/gomi_1.jpg");
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(rec.timestamp.len(), 19);
        assert_eq!(&rec.timestamp[4..5], "-");
        assert_eq!(&rec.timestamp[10..11], " ");
    }

    #[test]
    fn test_append_to_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let log = MetadataLog::new(dir.path().join("missing").join("metadata.csv"));
        assert!(matches!(
            log.append(&record("gomi", 1)),
            Err(MetadataError::Io(_))
        ));
    }
}
