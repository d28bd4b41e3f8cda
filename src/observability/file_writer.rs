//! Rotating file writer with size-based rotation and backup retention.
//!
//! [`FileWriter`] is handed to the `fmt` layer as its [`MakeWriter`]. Each log line
//! is appended to the primary file; once that file exceeds the size limit it is
//! renamed with a timestamp suffix and old backups beyond the retention count are
//! deleted. This keeps disk usage bounded for long-running shells.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::MakeWriter;

/// Maximum file size before rotation (10 MB).
const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// # Rotation Strategy
///
/// 1. Check file size before each write
/// 2. If size > limit, rotate:
///    - Rename current file to `<name>.<timestamp>`
///    - Create new empty file on the next write
///    - Remove oldest backups beyond the retention count
pub struct FileWriter {
    /// Path to the primary log file.
    file_path: PathBuf,
    max_bytes: u64,
    max_backups: usize,
    /// Lazily-initialized file handle (opens on first write).
    writer: Mutex<Option<fs::File>>,
}

impl FileWriter {
    /// Creates a writer with the default limits (10 MB, 3 backups).
    ///
    /// The file is not opened until the first write.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limits(file_path, MAX_FILE_SIZE_BYTES, MAX_BACKUP_FILES)
    }

    #[must_use]
    pub const fn with_limits(file_path: PathBuf, max_bytes: u64, max_backups: usize) -> Self {
        Self {
            file_path,
            max_bytes,
            max_backups,
            writer: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Appends `bytes` to the file, rotating first if necessary.
    ///
    /// # Errors
    ///
    /// May fail due to file system permissions, disk space exhaustion, or a
    /// poisoned lock.
    pub fn write_bytes(&self, bytes: &[u8]) -> std::io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| std::io::Error::other(format!("Mutex poisoned: {e}")))?;

        self.check_and_rotate(&mut writer)?;

        if writer.is_none() {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.file_path)?;
            *writer = Some(file);
        }

        let file = writer
            .as_mut()
            .ok_or_else(|| std::io::Error::other("No file available"))?;

        file.write_all(bytes)?;
        file.flush()?;
        drop(writer);

        Ok(())
    }

    fn check_and_rotate(&self, writer: &mut Option<fs::File>) -> std::io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *writer = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    /// Renames the current file to `<name>.<timestamp>` and prunes old backups.
    fn rotate_files(&self) -> std::io::Result<()> {
        let timestamp = chrono::Local::now().format("%Y%m%dT%H%M%S%.9f");
        let backup_path = self.file_path.with_file_name(format!("{}.{timestamp}", self.file_name()?));

        if self.file_path.exists() {
            fs::rename(&self.file_path, &backup_path)?;
        }

        self.cleanup_old_backups()
    }

    /// Keeps the newest `max_backups` backups by modification time.
    ///
    /// Individual deletion errors are ignored.
    fn cleanup_old_backups(&self) -> std::io::Result<()> {
        let parent_dir = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let prefix = format!("{}.", self.file_name()?);

        let mut backups: Vec<PathBuf> = fs::read_dir(parent_dir)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();

        backups.sort_by(|a, b| {
            let a_time = fs::metadata(a).and_then(|m| m.modified()).ok();
            let b_time = fs::metadata(b).and_then(|m| m.modified()).ok();
            b_time.cmp(&a_time).then_with(|| b.cmp(a))
        });

        for old_backup in backups.iter().skip(self.max_backups) {
            let _ = fs::remove_file(old_backup);
        }

        Ok(())
    }

    fn file_name(&self) -> std::io::Result<&str> {
        self.file_path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| std::io::Error::other("Invalid file name"))
    }
}

/// Per-event writer handed out by [`FileWriter::make_writer`].
pub struct FileWriterGuard<'a> {
    owner: &'a FileWriter,
}

impl Write for FileWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.owner.write_bytes(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for FileWriter {
    type Writer = FileWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        FileWriterGuard { owner: self }
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .field("max_backups", &self.max_backups)
            .finish_non_exhaustive()
    }
}
