use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";

/// Advisory lock held across a load-mutate-save cycle so that two writers
/// never interleave their full-list rewrites.
/// The lock file is never removed, so every process locks the same inode.
pub struct DataLock {
    // flock is released when the descriptor closes
    _file: File,
}

#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not lock {path}: another taskmate process is writing")]
    Timeout { path: PathBuf },
}

impl DataLock {
    /// Lock the data directory, waiting up to `timeout`.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let create_err = |source| LockError::Create {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(data_dir).map_err(create_err)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(create_err)?;

        let start = Instant::now();
        while try_lock(&file).is_err() {
            if start.elapsed() >= timeout {
                log::warn!("lock wait on {} timed out", path.display());
                return Err(LockError::Timeout { path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        log::debug!("acquired {}", path.display());
        Ok(DataLock { _file: file })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> std::io::Result<()> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_is_released_on_drop_and_file_kept() {
        let tmp = TempDir::new().unwrap();
        let lock = DataLock::acquire_default(tmp.path()).unwrap();
        drop(lock);
        assert!(tmp.path().join(LOCK_FILE).exists());
        assert!(DataLock::acquire(tmp.path(), Duration::from_millis(50)).is_ok());
    }

    #[test]
    fn waiter_on_kept_file_still_excludes() {
        let tmp = TempDir::new().unwrap();
        let first = DataLock::acquire_default(tmp.path()).unwrap();
        drop(first);
        let _second = DataLock::acquire_default(tmp.path()).unwrap();
        let third = DataLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(third, Err(LockError::Timeout { .. })));
    }

    #[test]
    fn second_writer_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = DataLock::acquire_default(tmp.path()).unwrap();
        let second = DataLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Timeout { .. })));
    }

    #[test]
    fn creates_missing_data_dir() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b");
        let _lock = DataLock::acquire_default(&nested).unwrap();
        assert!(nested.join(LOCK_FILE).exists());
    }
}
