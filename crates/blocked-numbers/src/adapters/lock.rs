//! # Store Lock
//!
//! Uses `fs2` for cross-platform file locking (flock on Unix, LockFile on
//! Windows). A file-backed store holds an exclusive lock on `<path>.lock`
//! for its whole lifetime, so two handles can never write the same file.

use crate::error::KVStoreError;
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exclusive lock next to a store file, released on drop.
#[derive(Debug)]
pub struct StoreLock {
    /// The lock file handle (kept open to maintain the lock)
    file: File,
    /// Path to the lock file
    path: PathBuf,
}

impl StoreLock {
    /// Lock file path for a store file.
    pub fn lock_path(store_path: &Path) -> PathBuf {
        let mut name = store_path.as_os_str().to_os_string();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Try once to take the lock. Does not wait.
    ///
    /// # Errors
    ///
    /// `KVStoreError::Locked` if another handle holds it, `IOError` if the
    /// lock file cannot be created.
    pub fn acquire(store_path: &Path) -> Result<Self, KVStoreError> {
        let path = Self::lock_path(store_path);

        // Not truncated before locking: the holder's PID must survive a
        // failed attempt.
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        if file.try_lock_exclusive().is_err() {
            let holder = std::fs::read_to_string(&path).unwrap_or_default();
            let holder = holder.trim();
            return Err(KVStoreError::Locked {
                path: if holder.is_empty() {
                    path.display().to_string()
                } else {
                    format!("{}, pid {holder}", path.display())
                },
            });
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        file.sync_all()?;

        Ok(Self { file, path })
    }

    /// Path to the lock file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        #[allow(clippy::incompatible_msrv)]
        let _ = FileExt::unlock(&self.file);
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_path_appends_suffix() {
        assert_eq!(
            StoreLock::lock_path(Path::new("/data/blocked.db")),
            PathBuf::from("/data/blocked.db.lock")
        );
    }

    #[test]
    fn test_lock_contains_pid() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("blocked.db");

        let lock = StoreLock::acquire(&store).expect("Should acquire lock");
        let content = std::fs::read_to_string(lock.path()).unwrap();
        let stored_pid: u32 = content.trim().parse().unwrap();
        assert_eq!(stored_pid, std::process::id());
    }

    #[test]
    fn test_double_lock_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("blocked.db");

        let first = StoreLock::acquire(&store).expect("First lock should succeed");
        let second = StoreLock::acquire(&store);
        assert!(matches!(second, Err(KVStoreError::Locked { .. })));

        drop(first);
        assert!(StoreLock::acquire(&store).is_ok());
    }
}
