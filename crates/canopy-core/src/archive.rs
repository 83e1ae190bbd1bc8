//! Zip export of the project.
//!
//! Export happens in two steps. [`ExportJob`] is created synchronously and
//! owns a copy of every `(path, content)` pair, so the explorer is free to
//! change as soon as the job exists. [`ExportJob::run`] then compresses the
//! copy on a blocking task and yields an [`Archive`].

use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::CoreResult;
use crate::config::Compression;
use crate::event::{EventBus, ExplorerEvent};

impl From<Compression> for CompressionMethod {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::Stored => CompressionMethod::Stored,
            Compression::Deflated => CompressionMethod::Deflated,
        }
    }
}

/// A finished, in-memory zip archive.
#[derive(Debug, Clone)]
pub struct Archive {
    file_name: String,
    bytes: Vec<u8>,
    entries: usize,
}

impl Archive {
    /// Compresses `files` into a zip archive named `file_name`.
    ///
    /// Files with empty content still get a (zero-length) entry.
    pub fn build(
        file_name: impl Into<String>,
        files: &[(String, String)],
        compression: Compression,
    ) -> CoreResult<Self> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (path, content) in files {
            let options = SimpleFileOptions::default().compression_method(compression.into());
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content.as_bytes())?;
        }
        let bytes = writer.finish()?.into_inner();

        Ok(Self {
            file_name: file_name.into(),
            bytes,
            entries: files.len(),
        })
    }

    /// Returns the file name used when saving.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns the raw archive bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the number of file entries.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Decompresses every entry as `(path, content)`, in archive order.
    pub fn read_entries(&self) -> CoreResult<Vec<(String, String)>> {
        let mut archive = ZipArchive::new(Cursor::new(self.bytes.as_slice()))?;
        let mut out = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let mut content = String::new();
            file.read_to_string(&mut content)?;
            out.push((file.name().to_string(), content));
        }
        Ok(out)
    }

    /// Writes the archive to `dir/<file_name>` and returns the full path.
    pub async fn save_in(&self, dir: impl AsRef<Path>) -> CoreResult<PathBuf> {
        let dir = dir.as_ref();
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!("Saved {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

/// A snapshot of the project waiting to be compressed.
pub struct ExportJob {
    pub(crate) file_name: String,
    pub(crate) files: Vec<(String, String)>,
    pub(crate) compression: Compression,
    pub(crate) events: EventBus,
}

impl ExportJob {
    /// Number of files captured by the snapshot.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the snapshot holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Compresses the snapshot off the async executor.
    pub async fn run(self) -> CoreResult<Archive> {
        tracing::debug!("Compressing {} files", self.len());
        let ExportJob {
            file_name,
            files,
            compression,
            events,
        } = self;

        let archive =
            tokio::task::spawn_blocking(move || Archive::build(file_name, &files, compression))
                .await??;

        tracing::info!(
            "Exported {} files into {} ({} bytes)",
            archive.entries(),
            archive.file_name(),
            archive.bytes().len()
        );
        events.emit(ExplorerEvent::ArchiveExported {
            entries: archive.entries(),
            bytes: archive.bytes().len(),
        });
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_archive() {
        let archive = Archive::build("project.zip", &[], Compression::Deflated).unwrap();
        assert_eq!(archive.entries(), 0);
        assert!(archive.read_entries().unwrap().is_empty());
    }

    #[test]
    fn test_entries_round_trip() {
        let input = files(&[("a.txt", "hi"), ("dir/b.txt", "bye"), ("empty.js", "")]);
        for compression in [Compression::Stored, Compression::Deflated] {
            let archive = Archive::build("project.zip", &input, compression).unwrap();
            assert_eq!(archive.read_entries().unwrap(), input);
        }
    }

    #[tokio::test]
    async fn test_save_in() {
        let dir = tempfile::tempdir().unwrap();
        let archive =
            Archive::build("out.zip", &files(&[("a.txt", "hi")]), Compression::Stored).unwrap();

        let path = archive.save_in(dir.path().join("dist")).await.unwrap();

        assert_eq!(path, dir.path().join("dist").join("out.zip"));
        assert_eq!(std::fs::read(&path).unwrap(), archive.bytes());
    }

    #[tokio::test]
    async fn test_job_emits_event() {
        let events = EventBus::new();
        let mut rx = events.subscribe();
        let job = ExportJob {
            file_name: "project.zip".into(),
            files: files(&[("a.txt", "hi")]),
            compression: Compression::Deflated,
            events,
        };

        let archive = job.run().await.unwrap();

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            ExplorerEvent::ArchiveExported {
                entries: 1,
                bytes: archive.bytes().len()
            }
        );
    }
}
