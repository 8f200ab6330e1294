// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions)]
//! Error types for the sunfuse telemetry pipeline
//!
//! Every failure mode of the pipeline maps onto one [`SunfuseError`] variant.
//! None of them is fatal to a running process: decode failures drop a single
//! message, publish and sink failures lose a single record, and transport
//! connection failures are retried by the transport's own event loop.
//!
//! # Examples
//!
//! ```
//! use sunfuse_error::{Result, SunfuseError};
//!
//! fn store() -> Result<()> {
//!     Err(SunfuseError::sink_write("houses/HOUSE_123", "503 Service Unavailable"))
//! }
//!
//! let err = store().unwrap_err();
//! assert!(!err.is_recoverable());
//! ```

use std::fmt::Display;
use std::time::Duration;

/// Root error type for all sunfuse operations
#[derive(Debug, thiserror::Error)]
pub enum SunfuseError {
    /// A payload did not match the shape expected for its channel
    ///
    /// The message is dropped; fusion state is left untouched.
    #[error("Failed to decode {channel} payload: {reason}")]
    Decode {
        /// Channel the payload arrived on
        channel: String,
        /// Parser diagnostic
        reason: String,
    },

    /// The transport could not establish (or lost) its broker connection
    #[error("Transport connection failed: {context}")]
    TransportConnect {
        /// Broker address and underlying cause
        context: String,
    },

    /// A generator failed to publish a sample
    #[error("Failed to publish on {topic}: {reason}")]
    Publish {
        /// Destination topic
        topic: String,
        /// Underlying cause
        reason: String,
    },

    /// The persistence sink rejected or failed to store a combined record
    #[error("Failed to write record to {path}: {reason}")]
    SinkWrite {
        /// Storage path the record was posted to
        path: String,
        /// Underlying cause
        reason: String,
    },

    /// Invalid process configuration
    #[error("Invalid configuration: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// No hardware sensor is present on this host
    #[error("Hardware sensor unavailable: {reason}")]
    HardwareUnavailable {
        /// Why the sensor could not be read
        reason: String,
    },

    /// A background task panicked or was aborted
    #[error("Task {task} failed: {reason}")]
    TaskFailed {
        /// Which task
        task: String,
        /// Panic or abort diagnostic
        reason: String,
    },

    /// An operation did not complete in time
    #[error("Operation timed out after {duration:?}: {operation}")]
    Timeout {
        /// The operation that timed out
        operation: String,
        /// How long we waited
        duration: Duration,
    },
}

impl SunfuseError {
    /// Create a decode error for the given channel
    pub fn decode(channel: impl Display, reason: impl Display) -> Self {
        Self::Decode {
            channel: channel.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a transport connection error with the given context
    pub fn transport_connect(context: impl Into<String>) -> Self {
        Self::TransportConnect {
            context: context.into(),
        }
    }

    /// Create a publish error for the given topic
    pub fn publish(topic: impl Into<String>, reason: impl Display) -> Self {
        Self::Publish {
            topic: topic.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a sink write error for the given storage path
    pub fn sink_write(path: impl Into<String>, reason: impl Display) -> Self {
        Self::SinkWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a hardware unavailable error
    pub fn hardware_unavailable(reason: impl Display) -> Self {
        Self::HardwareUnavailable {
            reason: reason.to_string(),
        }
    }

    /// Create a task failure error
    pub fn task_failed(task: impl Into<String>, reason: impl Display) -> Self {
        Self::TaskFailed {
            task: task.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Check if the pipeline can simply carry on with the next message or tick
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. }
                | Self::TransportConnect { .. }
                | Self::Publish { .. }
                | Self::HardwareUnavailable { .. }
                | Self::Timeout { .. }
        )
    }

    /// Check if this error indicates data that is gone for good, or a process
    /// that cannot start
    #[must_use]
    pub const fn is_permanent(&self) -> bool {
        matches!(
            self,
            Self::SinkWrite { .. } | Self::Config { .. } | Self::TaskFailed { .. }
        )
    }
}

/// Specialized Result type for sunfuse operations
pub type Result<T> = std::result::Result<T, SunfuseError>;

/// Helper trait for tagging foreign errors with the pipeline stage they hit
///
/// ```
/// use sunfuse_error::{ResultExt, SunfuseError};
///
/// let raw: std::result::Result<(), std::io::Error> = Err(std::io::Error::other("broken pipe"));
/// let err = raw.or_publish("sensor/solar_panel_rpi").unwrap_err();
/// assert!(matches!(err, SunfuseError::Publish { .. }));
/// ```
pub trait ResultExt<T> {
    /// Map the error into [`SunfuseError::Publish`]
    ///
    /// # Errors
    /// Returns `Err(SunfuseError)` if the underlying result is `Err`.
    fn or_publish(self, topic: &str) -> Result<T>;

    /// Map the error into [`SunfuseError::SinkWrite`]
    ///
    /// # Errors
    /// Returns `Err(SunfuseError)` if the underlying result is `Err`.
    fn or_sink_write(self, path: &str) -> Result<T>;

    /// Map the error into [`SunfuseError::TransportConnect`], prefixed with `context`
    ///
    /// # Errors
    /// Returns `Err(SunfuseError)` if the underlying result is `Err`.
    fn or_transport(self, context: &str) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Display,
{
    fn or_publish(self, topic: &str) -> Result<T> {
        self.map_err(|e| SunfuseError::publish(topic, e))
    }

    fn or_sink_write(self, path: &str) -> Result<T> {
        self.map_err(|e| SunfuseError::sink_write(path, e))
    }

    fn or_transport(self, context: &str) -> Result<T> {
        self.map_err(|e| SunfuseError::transport_connect(format!("{context}: {e}")))
    }
}
