// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Test utilities for the sunfuse workspace.
//!
//! - [`fixtures`]: canned samples and their wire payloads
//! - [`RecordingSink`] / [`FailingSink`]: in-memory [`Sink`](sunfuse_exec::Sink)s
//! - [`FixedClock`]: an emission clock that only moves when advanced
//! - [`helpers`]: async waiting helpers for task-based tests

pub mod clock;
pub mod fixtures;
pub mod helpers;
pub mod sinks;

pub use clock::FixedClock;
pub use sinks::{FailingSink, RecordingSink};
