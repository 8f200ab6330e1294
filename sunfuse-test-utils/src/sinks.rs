// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use sunfuse_core::{CombinedRecord, RecordId};
use sunfuse_error::{Result, SunfuseError};
use sunfuse_exec::Sink;
use tokio::sync::Notify;

/// Sink that keeps every posted record in memory.
///
/// Ids are `rec-1`, `rec-2`, ... in posting order. Clones share storage.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    posted: Arc<Mutex<Vec<(String, CombinedRecord)>>>,
    notify: Arc<Notify>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(path, record)` pairs in posting order.
    pub fn posted(&self) -> Vec<(String, CombinedRecord)> {
        self.posted.lock().clone()
    }

    pub fn records(&self) -> Vec<CombinedRecord> {
        self.posted.lock().iter().map(|(_, record)| *record).collect()
    }

    pub fn len(&self) -> usize {
        self.posted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves once at least `count` records have been posted.
    pub async fn wait_for(&self, count: usize) {
        loop {
            let notified = self.notify.notified();
            if self.len() >= count {
                return;
            }
            notified.await;
        }
    }
}

#[async_trait]
impl Sink for RecordingSink {
    async fn post(&self, path: &str, record: &CombinedRecord) -> Result<RecordId> {
        let id = {
            let mut posted = self.posted.lock();
            posted.push((path.to_string(), *record));
            RecordId::new(format!("rec-{}", posted.len()))
        };
        self.notify.notify_waiters();
        Ok(id)
    }
}

/// Sink whose every post fails, counting the attempts.
#[derive(Debug, Clone, Default)]
pub struct FailingSink {
    attempts: Arc<Mutex<usize>>,
}

impl FailingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock()
    }
}

#[async_trait]
impl Sink for FailingSink {
    async fn post(&self, path: &str, _record: &CombinedRecord) -> Result<RecordId> {
        *self.attempts.lock() += 1;
        Err(SunfuseError::sink_write(path, "503 Service Unavailable"))
    }
}
