//! Cross-process exclusive locking for the shared ledger files.
//!
//! Every ledger append is a read-check-append sequence, and the ledgers are
//! shared by every invocation on the crew network. The sequence runs under
//! a blocking whole-file POSIX advisory lock so two invocations can never
//! both decide a line is absent.
//!
//! POSIX fcntl locks are per-process, not per-fd: a second handle opened by
//! the same process is granted the lock immediately. A process-local mutex
//! table keyed by canonical path serializes same-process callers before the
//! advisory lock serializes processes.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use tracing::trace;

use crate::error::NoderecError;

fn lock_table() -> &'static Mutex<HashMap<PathBuf, Arc<Mutex<()>>>> {
    static TABLE: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Blocking exclusive advisory lock over the whole file via `fcntl(F_SETLKW)`.
fn posix_lock_exclusive(file: &File) -> Result<(), NoderecError> {
    let lock_type = i16::try_from(libc::F_WRLCK).expect("fcntl lock type must fit in i16");
    let whence = i16::try_from(libc::SEEK_SET).expect("SEEK_SET must fit in i16");
    let flock = libc::flock {
        l_type: lock_type,
        l_whence: whence,
        l_start: 0,
        l_len: 0, // whole file
        l_pid: 0,
    };

    nix::fcntl::fcntl(file.as_raw_fd(), nix::fcntl::FcntlArg::F_SETLKW(&flock))
        .map_err(|e| NoderecError::Io(e.into()))?;
    Ok(())
}

/// Run `f` with the ledger at `path` exclusively locked across processes.
///
/// The file is opened for read + append, created if absent. The advisory
/// lock is released when the handle closes on return; the process-local
/// mutex guard is held for the same span.
pub fn with_ledger_lock<T>(
    path: &Path,
    f: impl FnOnce(&mut File) -> Result<T, NoderecError>,
) -> Result<T, NoderecError> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    // The file exists by now, so canonicalization only fails on exotic
    // filesystems; fall back to the spelled path in that case.
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let entry = {
        let mut table = lock_table()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        Arc::clone(table.entry(key).or_default())
    };

    let _process_guard = entry.lock().unwrap_or_else(PoisonError::into_inner);
    posix_lock_exclusive(&file)?;
    trace!(path = %path.display(), "ledger locked");

    f(&mut file)
}
