//! Best-effort persistence of the call window
//!
//! A restarted process that starts from an empty window can burst past a
//! registry's true rate limit. To avoid that, the retained timestamps can
//! be saved on exit and merged back in on startup. The snapshot is a flat
//! JSON array of epoch-second floats, written atomically (temp file plus
//! rename) so a concurrent reader never sees a truncated file.
//!
//! The snapshot is advisory: it provides across-restart continuity for a
//! single logical process, not cross-process coordination. Both operations
//! are best-effort; a missing or corrupt file degrades to an empty state
//! with a logged warning, never an error.

use std::io::{self, ErrorKind};
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;
use tracing::warn;

use crate::RateLimiter;

#[cfg(test)]
mod tests;

impl RateLimiter {
    /// Merge a persisted snapshot into the window.
    ///
    /// Entries that have already aged out of the window, sit in the
    /// future, or cannot be represented as a timestamp are discarded. Returns the number of timestamps merged;
    /// a missing or corrupt file merges nothing and leaves the limiter
    /// exactly as it was.
    pub fn load(&self, path: &Path) -> usize {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read rate limit state");
                return 0;
            }
        };
        let stamps: Vec<f64> = match serde_json::from_slice(&bytes) {
            Ok(stamps) => stamps,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding corrupt rate limit state");
                return 0;
            }
        };
        let now = SystemTime::now();
        // Reject anything a hand-edited or garbage file could hold:
        // try_from_secs_f64 drops NaN, negative and overflowing values,
        // checked_add drops whatever the platform clock cannot represent.
        let stamps = stamps
            .into_iter()
            .filter_map(|s| Duration::try_from_secs_f64(s).ok())
            .filter_map(|d| UNIX_EPOCH.checked_add(d));
        self.inner.lock().merge(stamps, now)
    }

    /// Write the retained timestamps to `path`, pruning first.
    ///
    /// Creates parent directories as needed and replaces the file
    /// atomically. Failures are logged and swallowed; persistence is never
    /// allowed to take the process down.
    pub fn save(&self, path: &Path) {
        let snapshot = self.inner.lock().snapshot(SystemTime::now());
        let stamps: Vec<f64> = snapshot
            .iter()
            .map(|t| {
                t.duration_since(UNIX_EPOCH)
                    .unwrap_or(Duration::ZERO)
                    .as_secs_f64()
            })
            .collect();
        if let Err(e) = write_atomic(path, &stamps) {
            warn!(path = %path.display(), error = %e, "could not persist rate limit state");
        }
    }
}

fn write_atomic(path: &Path, stamps: &[f64]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    // The temp file lives in the target directory so the rename stays on
    // one filesystem and remains atomic.
    let tmp = NamedTempFile::new_in(dir)?;
    serde_json::to_writer(tmp.as_file(), stamps).map_err(io::Error::from)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
