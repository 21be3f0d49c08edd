//! File-backed apply lock.
//!
//! One lock file per lock key, created with `create_new` and holding the
//! owner PID. A file whose PID is no longer running is treated as stale and
//! removed, as is a file that never got a PID once it is older than the
//! retry delay (at least one second). The guard deletes the file on drop.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::ApplyError;

pub struct ApplyLockGuard {
    path: PathBuf,
}

impl ApplyLockGuard {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ApplyLockGuard {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// Lock file path for `key` inside `dir`.
#[must_use]
pub fn lock_path(dir: &Path, key: &str) -> PathBuf {
    let name: String = key
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    dir.join(format!("{name}.lock"))
}

/// A lock file without a PID younger than this may still be mid-creation.
const MIN_PID_GRACE: Duration = Duration::from_secs(1);

/// Wait for the lock of `key`, polling every `retry_delay` up to `wait_timeout`.
///
/// # Errors
///
/// Returns [`ApplyError::LockBusy`] when the lock is still held after
/// `wait_timeout`.
pub async fn acquire(
    dir: &Path,
    key: &str,
    wait_timeout: Duration,
    retry_delay: Duration,
) -> Result<ApplyLockGuard, ApplyError> {
    let path = lock_path(dir, key);
    let grace = retry_delay.max(MIN_PID_GRACE);
    let started = Instant::now();

    loop {
        let holder = match try_acquire(&path, grace) {
            Ok(guard) => {
                debug!(key, path = %path.display(), "apply lock acquired");
                return Ok(guard);
            }
            Err(LockState::Stale) => {
                warn!(key, path = %path.display(), "removing stale apply lock");
                if fs::remove_file(&path).is_ok() {
                    continue;
                }
                None
            }
            Err(LockState::HeldBy(pid)) => Some(pid),
            Err(LockState::Contended) => None,
        };
        if started.elapsed() >= wait_timeout {
            return Err(ApplyError::LockBusy {
                key: key.to_string(),
                holder,
            });
        }
        tokio::time::sleep(retry_delay).await;
    }
}

#[derive(Debug)]
enum LockState {
    HeldBy(u32),
    Stale,
    /// Held, owner unknown.
    Contended,
}

fn try_acquire(path: &Path, grace: Duration) -> Result<ApplyLockGuard, LockState> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match OpenOptions::new().create_new(true).write(true).open(path) {
        Ok(file) => claim(file, path),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(inspect(path, grace)),
        Err(_) => Err(LockState::Contended),
    }
}

/// Record our PID in a freshly created lock file; a lock we cannot sign is
/// given back.
fn claim(mut file: File, path: &Path) -> Result<ApplyLockGuard, LockState> {
    let signed = writeln!(file, "{}", std::process::id()).and_then(|()| file.sync_all());
    if signed.is_err() {
        drop(file);
        let _ = fs::remove_file(path);
        return Err(LockState::Contended);
    }
    Ok(ApplyLockGuard {
        path: path.to_path_buf(),
    })
}

fn inspect(path: &Path, grace: Duration) -> LockState {
    let Ok(owner) = fs::read_to_string(path) else {
        return LockState::Contended;
    };
    match owner.trim().parse::<u32>() {
        Ok(pid) if is_process_running(pid) => LockState::HeldBy(pid),
        Ok(_) => LockState::Stale,
        Err(_) if older_than(path, grace) => LockState::Stale,
        Err(_) => LockState::Contended,
    }
}

fn older_than(path: &Path, age: Duration) -> bool {
    fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| modified.elapsed().ok())
        .is_some_and(|elapsed| elapsed > age)
}

fn is_process_running(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    let proc_root = Path::new("/proc");
    if proc_root.join("self").exists() {
        return proc_root.join(pid.to_string()).exists();
    }
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .status()
        .is_ok_and(|status| status.success())
}
