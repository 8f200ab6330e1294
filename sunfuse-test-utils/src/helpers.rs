// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Upper bound for anything a test waits on.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Awaits `future`, panicking if it does not finish within [`TEST_TIMEOUT`].
pub async fn within_timeout<F>(future: F) -> F::Output
where
    F: Future,
{
    timeout(TEST_TIMEOUT, future)
        .await
        .expect("operation did not complete in time")
}

/// Asserts that `future` is still pending after `millis`.
pub async fn assert_pending_for<F>(future: F, millis: u64)
where
    F: Future,
{
    if timeout(Duration::from_millis(millis), future).await.is_ok() {
        panic!("Unexpected completion, expected the operation to stay pending.");
    }
}
