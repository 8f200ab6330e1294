// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Firebase Realtime Database sink, over the REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use sunfuse_core::{CombinedRecord, RecordId};
use sunfuse_error::{Result, ResultExt, SunfuseError};
use sunfuse_exec::Sink;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Response body of a push (POST) request.
#[derive(Deserialize)]
struct PushResponse {
    name: String,
}

/// Pushes each record as a new child of `{base_url}/{path}`.
///
/// The database generates the child key, which is returned as the record id.
#[derive(Debug, Clone)]
pub struct FirebaseSink {
    client: Client,
    base_url: String,
}

impl FirebaseSink {
    /// # Errors
    /// Returns [`SunfuseError::Config`] if the base URL is not http(s) or the
    /// HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("https://") || base_url.starts_with("http://")) {
            return Err(SunfuseError::config(format!(
                "database url {base_url:?} must start with http:// or https://"
            )));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SunfuseError::config(format!("http client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// REST endpoint of the collection at `path`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}.json", self.base_url, path.trim_matches('/'))
    }
}

#[async_trait]
impl Sink for FirebaseSink {
    async fn post(&self, path: &str, record: &CombinedRecord) -> Result<RecordId> {
        let endpoint = self.endpoint(path);
        debug!(%endpoint, "posting combined record");

        let response = self
            .client
            .post(&endpoint)
            .json(record)
            .send()
            .await
            .or_sink_write(path)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SunfuseError::sink_write(
                path,
                format!("server responded {status}"),
            ));
        }

        let body: PushResponse = response.json().await.or_sink_write(path)?;
        Ok(RecordId::new(body.name))
    }
}
