// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(clippy::multiple_crate_versions, clippy::doc_markdown)]
//! Message handling side of sunfuse.
//!
//! [`EmissionPolicy`] owns the fusion state and decides, per incoming message,
//! whether a combined record can be emitted to the [`Sink`].
//! [`FusionSubscriber`] drives a [`Transport`] subscription into the policy
//! until cancelled.

pub mod emission;
pub mod sink;
pub mod subscriber;
pub mod transport;

pub use emission::{EmissionPolicy, Ingest, Outcome};
pub use sink::Sink;
pub use subscriber::FusionSubscriber;
pub use transport::{Message, Transport};
