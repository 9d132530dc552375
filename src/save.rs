use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{Error, Result};
use crate::util::{clean_path, with_suffix};
use crate::Ini;

const BACKUP_SUFFIX: &str = ".bak";

impl Ini {
    /// Writes the model to `path`, keeping any existing file as `<path>.bak`.
    ///
    /// The text is snapshotted under the read lock and the lock is released before any file is
    /// touched, so writes that land while the save runs are not part of the saved text. The
    /// snapshot goes to a uniquely named temp file next to `path` and is only renamed onto
    /// `path` once it has been flushed, so a failed save never leaves a truncated file behind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the temp file cannot be written, the existing file cannot be
    /// backed up (a missing file is fine), or the final rename fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = clean_path(path.as_ref());
        let text = self.to_string();

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = write_temp(dir, &text).map_err(|e| Error::io(dir, e))?;
        debug!(path = %temp.path().display(), bytes = text.len(), "wrote snapshot");

        let backup = with_suffix(&path, BACKUP_SUFFIX);
        match fs::rename(&path, &backup) {
            Ok(()) => debug!(path = %backup.display(), "backed up previous file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::io(&path, e)),
        }

        temp.persist(&path).map_err(|e| Error::io(&path, e.error))?;
        debug!(path = %path.display(), "saved configuration");

        Ok(())
    }

    /// Writes the serialized model to `writer` through a buffer and flushes it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stream`] if writing or flushing fails.
    pub fn write_to(&self, writer: impl Write) -> Result<()> {
        let text = self.to_string();
        let mut writer = BufWriter::new(writer);
        writer.write_all(text.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Writes `text` to a fresh temp file in `dir`. The file is removed if it is dropped unpersisted.
fn write_temp(dir: &Path, text: &str) -> io::Result<NamedTempFile> {
    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(temp);
    writer.write_all(text.as_bytes())?;
    let temp = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
