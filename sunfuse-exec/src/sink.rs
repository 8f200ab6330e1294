// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use std::sync::Arc;
use sunfuse_core::{CombinedRecord, RecordId};
use sunfuse_error::Result;

/// Persistence sink for combined records.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Stores `record` under the collection at `path` and returns the id the
    /// store assigned to it.
    ///
    /// # Errors
    /// Returns [`SunfuseError::SinkWrite`](sunfuse_error::SunfuseError::SinkWrite)
    /// when the store is unreachable or rejects the record.
    async fn post(&self, path: &str, record: &CombinedRecord) -> Result<RecordId>;
}

#[async_trait]
impl<S> Sink for Arc<S>
where
    S: Sink + ?Sized,
{
    async fn post(&self, path: &str, record: &CombinedRecord) -> Result<RecordId> {
        (**self).post(path, record).await
    }
}
