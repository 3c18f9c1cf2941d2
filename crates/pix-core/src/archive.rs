//! ZIP packaging for batch exports.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use thiserror::Error;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// MIME type of a finished archive.
pub const ARCHIVE_MIME: &str = "application/zip";

/// Errors from building an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("ZIP write failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// File name of a batch archive created at `timestamp_ms`.
pub fn archive_name(timestamp_ms: i64) -> String {
    format!("pix-batch-{timestamp_ms}.zip")
}

/// Collects named binary entries into an in-memory ZIP.
///
/// Entry names are unique within one archive: a repeated name gets `-2`,
/// `-3`, ... inserted before its extension.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    names: HashSet<String>,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            names: HashSet::new(),
        }
    }

    /// Number of entries added so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Add an entry and return the name it was stored under.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<String, ArchiveError> {
        let name = self.unique_name(name);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer.start_file(name.as_str(), options)?;
        self.writer.write_all(bytes)?;
        self.names.insert(name.clone());
        Ok(name)
    }

    /// Finalize the archive into bytes.
    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.writer.finish()?.into_inner())
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.names.contains(name) {
            return name.to_string();
        }
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => name.split_at(dot),
            _ => (name, ""),
        };
        (2..)
            .map(|n| format!("{stem}-{n}{ext}"))
            .find(|candidate| !self.names.contains(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                let mut contents = Vec::new();
                file.read_to_end(&mut contents).unwrap();
                (file.name().to_string(), contents)
            })
            .collect()
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_name(1700000000000), "pix-batch-1700000000000.zip");
    }

    #[test]
    fn test_entries_round_trip_in_order() {
        let mut builder = ArchiveBuilder::new();
        builder.add("a.png", b"first").unwrap();
        builder.add("b.jpg", b"second").unwrap();
        assert_eq!(builder.len(), 2);

        let entries = entries(builder.finish().unwrap());
        assert_eq!(
            entries,
            vec![
                ("a.png".to_string(), b"first".to_vec()),
                ("b.jpg".to_string(), b"second".to_vec()),
            ]
        );
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let mut builder = ArchiveBuilder::new();
        assert_eq!(builder.add("photo.png", b"1").unwrap(), "photo.png");
        assert_eq!(builder.add("photo.png", b"2").unwrap(), "photo-2.png");
        assert_eq!(builder.add("photo.png", b"3").unwrap(), "photo-3.png");
        assert_eq!(builder.add("noext", b"4").unwrap(), "noext");
        assert_eq!(builder.add("noext", b"5").unwrap(), "noext-2");

        let names: Vec<_> = entries(builder.finish().unwrap())
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(
            names,
            ["photo.png", "photo-2.png", "photo-3.png", "noext", "noext-2"]
        );
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
        assert!(entries(builder.finish().unwrap()).is_empty());
    }
}
