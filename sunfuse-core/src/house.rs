// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt::{self, Display};
use core::str::FromStr;
use sunfuse_error::{Result, SunfuseError};

// Characters the document store refuses in a path segment.
const FORBIDDEN: &[char] = &['.', '$', '#', '[', ']', '/'];

/// Opaque identifier of the house whose telemetry is being stored.
///
/// It only ever appears in the storage path, never in the record body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HouseId(String);

impl HouseId {
    /// Keeps `id` exactly as given.
    ///
    /// # Errors
    /// Returns [`SunfuseError::Config`] for a blank id or one that cannot be
    /// used as a single path segment.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();

        if id.trim().is_empty() {
            return Err(SunfuseError::config("house id must not be blank"));
        }
        if let Some(bad) = id.chars().find(|c| FORBIDDEN.contains(c)) {
            return Err(SunfuseError::config(format!(
                "house id {id:?} contains forbidden character {bad:?}"
            )));
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Collection the combined records of this house are posted to.
    pub fn storage_path(&self) -> String {
        format!("houses/{}", self.0)
    }
}

impl FromStr for HouseId {
    type Err = SunfuseError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier the sink assigned to a stored record. Only used for logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
