use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::StoreError;

/// Raw byte storage behind a [`super::DocumentStore`].
///
/// Backends do no locking of their own beyond what they need to be `Sync`;
/// the store serializes every access.
pub trait DocumentBackend: Send + Sync {
    /// Current contents, or `None` when nothing has been written yet.
    fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replace the contents. Readers must observe either the old or the new
    /// bytes, never a mix.
    fn write_bytes(&self, bytes: &[u8]) -> Result<(), StoreError>;
}

/// Single JSON file on local disk.
///
/// Writes go to a sibling temp file which is then renamed over the target,
/// so a crash mid-write leaves the previous document intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "database.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl DocumentBackend for JsonFileBackend {
    fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(None),
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_bytes(&self, bytes: &[u8]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let temp = self.temp_path();
        let result = (|| {
            let mut file = fs::File::create(&temp)?;
            file.write_all(bytes)?;
            file.sync_all()?;
            fs::rename(&temp, &self.path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(e));
        }
        Ok(())
    }
}

/// In-memory backend for tests/dev. Still round-trips through JSON bytes so
/// serialization is exercised exactly as with the file backend.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    bytes: Mutex<Option<Vec<u8>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentBackend for InMemoryBackend {
    fn read_bytes(&self) -> Result<Option<Vec<u8>>, StoreError> {
        let bytes = self.bytes.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(bytes.clone())
    }

    fn write_bytes(&self, bytes: &[u8]) -> Result<(), StoreError> {
        let mut slot = self.bytes.lock().map_err(|_| StoreError::Poisoned)?;
        *slot = Some(bytes.to_vec());
        Ok(())
    }
}
