//! Process hardening for a binary that holds secrets in memory
//!
//! Disables core dumps via `setrlimit(RLIMIT_CORE, 0)` so a crash never
//! writes the secret or a share to disk. Best-effort: failure is logged
//! and the program carries on, since containers and unprivileged users may
//! not permit it.

use std::sync::atomic::{AtomicBool, Ordering};

static CORE_DUMPS_DISABLED: AtomicBool = AtomicBool::new(false);

/// Disable core dumps for the current process.
///
/// Returns `true` if core dumps are now disabled.
pub fn disable_core_dumps() -> bool {
    if CORE_DUMPS_DISABLED.load(Ordering::SeqCst) {
        return true; // Already disabled
    }

    #[cfg(unix)]
    {
        let disabled = unix::disable_core_dumps_impl();
        if disabled {
            CORE_DUMPS_DISABLED.store(true, Ordering::SeqCst);
        }
        disabled
    }

    #[cfg(not(unix))]
    {
        log::warn!("core dump prevention not supported on this platform");
        false
    }
}

#[cfg(unix)]
mod unix {
    pub fn disable_core_dumps_impl() -> bool {
        let rlim = libc::rlimit {
            rlim_cur: 0,
            rlim_max: 0,
        };
        // SAFETY: setrlimit only reads the struct we pass
        let result = unsafe { libc::setrlimit(libc::RLIMIT_CORE, &rlim) };
        if result != 0 {
            log::warn!(
                "failed to disable core dumps: {}",
                std::io::Error::last_os_error()
            );
            return false;
        }
        true
    }
}
