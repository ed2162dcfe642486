//! On-disk image library: per-subject directories and index computation.
//!
//! Filenames follow `<subject>_<N>.jpg` inside `<root>/<subject>/`. The
//! next index is always computed fresh from the directory listing, so the
//! filesystem itself is the only counter.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Root of the photo library on disk.
#[derive(Debug, Clone)]
pub struct ImageLibrary {
    root: PathBuf,
}

impl ImageLibrary {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ImageLibrary { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the shared metadata log file.
    pub fn metadata_path(&self) -> PathBuf {
        self.root.join("metadata.csv")
    }

    /// Directory holding one subject's photos.
    pub fn subject_dir(&self, subject: &str) -> PathBuf {
        self.root.join(subject)
    }

    /// Create the library root and every subject directory up front so
    /// captures never have to deal with a missing directory.
    pub fn ensure_dirs(&self, subjects: &[String]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;
        for subject in subjects {
            fs::create_dir_all(self.subject_dir(subject))?;
        }
        Ok(())
    }

    /// Next free index for a subject: `max(N) + 1` over existing
    /// `<subject>_<N>.jpg` files, or 1 for an empty (or missing)
    /// directory. Files that don't match the pattern are skipped.
    pub fn next_index(&self, subject: &str) -> io::Result<u32> {
        let dir = self.subject_dir(subject);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(1),
            Err(e) => return Err(e),
        };

        let mut max = 0u32;
        for entry in entries {
            let entry = entry?;
            if let Some(index) = entry
                .file_name()
                .to_str()
                .and_then(|name| parse_index(name, subject))
            {
                max = max.max(index);
            }
        }
        Ok(max + 1)
    }

    /// Build the filename and full path for the next capture of a subject.
    pub fn next_image_path(&self, subject: &str) -> io::Result<(String, PathBuf)> {
        let index = self.next_index(subject)?;
        let filename = format!("{}_{}.jpg", subject, index);
        let path = self.subject_dir(subject).join(&filename);
        Ok((filename, path))
    }
}

/// Parse the numeric index out of `<subject>_<N>.jpg`. Returns `None` for
/// anything that doesn't match exactly (wrong prefix, no underscore,
/// non-numeric suffix, wrong extension).
fn parse_index(file_name: &str, subject: &str) -> Option<u32> {
    file_name
        .strip_prefix(subject)?
        .strip_prefix('_')?
        .strip_suffix(".jpg")?
        .parse()
        .ok()
}
