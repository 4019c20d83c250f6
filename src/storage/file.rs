use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{PushError, PushResult};
use crate::storage::traits::PointerStore;

/// Keeps the pointer as a single trimmed UTF-8 line in a plain text file.
#[derive(Debug, Clone)]
pub struct FilePointerStore {
    path: PathBuf,
}

impl FilePointerStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PointerStore for FilePointerStore {
    fn load(&self) -> PushResult<Option<String>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let text = String::from_utf8(bytes).map_err(|e| {
            PushError::State(format!("{} is not valid UTF-8: {}", self.path.display(), e))
        })?;

        Ok(Some(text.trim().to_string()))
    }

    fn save(&self, link: &str) -> PushResult<()> {
        fs::write(&self.path, link.trim())?;
        Ok(())
    }

    fn clear(&self) -> PushResult<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FilePointerStore) {
        let dir = TempDir::new().unwrap();
        let store = FilePointerStore::new(dir.path().join("last_link.txt"));
        (dir, store)
    }

    #[test]
    fn test_missing_file_is_none() {
        let (_dir, store) = setup();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = setup();
        store.save("https://x/1").unwrap();

        assert_eq!(store.load().unwrap(), Some("https://x/1".to_string()));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "https://x/1");
    }

    #[test]
    fn test_load_trims_whitespace() {
        let (_dir, store) = setup();
        fs::write(store.path(), "  https://x/1\n").unwrap();
        assert_eq!(store.load().unwrap(), Some("https://x/1".to_string()));
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = setup();
        store.save("https://x/1").unwrap();
        store.save("https://x/2").unwrap();
        assert_eq!(store.load().unwrap(), Some("https://x/2".to_string()));
    }

    #[test]
    fn test_invalid_utf8_is_state_error() {
        let (_dir, store) = setup();
        fs::write(store.path(), [0xff, 0xfe, 0xfd]).unwrap();
        assert!(matches!(store.load(), Err(PushError::State(_))));
    }

    #[test]
    fn test_directory_in_place_of_file_is_error() {
        let (_dir, store) = setup();
        fs::create_dir(store.path()).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = setup();
        assert!(!store.clear().unwrap());

        store.save("https://x/1").unwrap();
        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }
}
