// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Real-time scheduling for the wattage meter.

use std::io;
use tracing::{info, warn};

/// Moves the calling thread to `SCHED_FIFO` at the highest priority and
/// returns that priority. Threads it spawns afterwards inherit the policy.
///
/// # Errors
/// The OS error, usually `PermissionDenied` without root or `CAP_SYS_NICE`.
#[cfg(target_os = "linux")]
pub fn request_realtime_priority() -> io::Result<i32> {
    // SAFETY: no pointers are involved.
    let priority = unsafe { libc::sched_get_priority_max(libc::SCHED_FIFO) };
    if priority < 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: sched_param is plain old data; zero is a valid value for every field.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = priority;

    // SAFETY: pid 0 targets the calling thread and `param` outlives the call.
    if unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) } != 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(priority)
}

/// # Errors
/// Always `Unsupported` outside Linux.
#[cfg(not(target_os = "linux"))]
pub fn request_realtime_priority() -> io::Result<i32> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "real-time scheduling is only available on Linux",
    ))
}

/// Best effort: logs the outcome and returns whether the thread is now real-time.
pub fn promote_current_thread() -> bool {
    match request_realtime_priority() {
        Ok(priority) => {
            info!(priority, "running with SCHED_FIFO real-time priority");
            true
        }
        Err(err) => {
            warn!(error = %err, "could not set real-time priority (are you root?), using normal scheduling");
            false
        }
    }
}
