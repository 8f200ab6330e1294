// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! MQTT transport.
//!
//! The `rumqttc` event loop runs on a background task. It reconnects on its
//! own after every connection error, re-subscribes after each reconnect,
//! forwards incoming publishes to [`Transport::next_message`] and resolves
//! pending publish acknowledgments by packet id.

use async_trait::async_trait;
use parking_lot::Mutex;
use rumqttc::{
    AsyncClient, Event, EventLoop, MqttOptions, Outgoing, Packet, QoS, SubscribeReasonCode,
};
use serde::Deserialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use sunfuse_error::{Result, ResultExt, SunfuseError};
use sunfuse_exec::{Message, Transport};
use tokio::select;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep, timeout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Broker connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    pub host: String,
    pub port: u16,
    #[serde(with = "secs")]
    pub keep_alive: Duration,
    /// Falls back to [`TransportConfig::DEFAULT_CLIENT_ID`] when unset
    pub client_id: Option<String>,
    /// How long a publish waits for the broker's acknowledgment
    #[serde(with = "secs")]
    pub ack_timeout: Duration,
    /// Outgoing request queue length
    pub capacity: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            keep_alive: Duration::from_secs(60),
            client_id: None,
            ack_timeout: Duration::from_secs(5),
            capacity: 64,
        }
    }
}

impl TransportConfig {
    pub const DEFAULT_CLIENT_ID: &'static str = "sunfuse";

    pub fn client_id(&self) -> &str {
        self.client_id.as_deref().unwrap_or(Self::DEFAULT_CLIENT_ID)
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

mod secs {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}

/// Publish waiters, matched to broker acknowledgments by packet id.
///
/// rumqttc assigns the packet id when it dequeues a request, in request order,
/// and reports it as [`Outgoing::Publish`]. Unacknowledged publishes are
/// resent with their original id after a reconnect, before any new request.
#[derive(Default)]
struct AckTracker {
    /// Requests handed to the client that have no packet id yet
    unassigned: VecDeque<oneshot::Sender<()>>,
    in_flight: HashMap<u16, oneshot::Sender<()>>,
    /// In-flight ids not yet resent since the last ConnAck
    awaiting_resend: HashSet<u16>,
}

impl AckTracker {
    fn queue(&mut self, waiter: oneshot::Sender<()>) {
        self.unassigned.push_back(waiter);
    }

    fn unqueue_last(&mut self) {
        self.unassigned.pop_back();
    }

    fn on_outgoing(&mut self, pkid: u16) {
        if self.awaiting_resend.remove(&pkid) {
            return;
        }
        // A fresh publish ends the resend phase; whatever was not resent is gone.
        for stale in self.awaiting_resend.drain() {
            self.in_flight.remove(&stale);
        }
        if let Some(waiter) = self.unassigned.pop_front() {
            self.in_flight.insert(pkid, waiter);
        }
    }

    fn on_ack(&mut self, pkid: u16) -> bool {
        match self.in_flight.remove(&pkid) {
            Some(waiter) => {
                let _ = waiter.send(());
                true
            }
            None => false,
        }
    }

    fn on_connected(&mut self) {
        self.awaiting_resend = self.in_flight.keys().copied().collect();
    }
}

type PendingAcks = Arc<Mutex<AckTracker>>;

/// [`Transport`] over an MQTT broker.
///
/// Subscriptions and publishes use QoS 1 (at least once).
pub struct MqttTransport {
    client: AsyncClient,
    inbox: tokio::sync::Mutex<mpsc::UnboundedReceiver<Message>>,
    topics: Arc<Mutex<Vec<String>>>,
    pending_acks: PendingAcks,
    publish_order: tokio::sync::Mutex<()>,
    ack_timeout: Duration,
    cancel_token: CancellationToken,
    event_loop: Mutex<Option<JoinHandle<()>>>,
}

impl MqttTransport {
    /// Starts connecting to the broker in the background.
    ///
    /// Connection failures are logged and retried for as long as the transport
    /// lives; they never surface here.
    pub fn connect(config: &TransportConfig) -> Self {
        let mut options = MqttOptions::new(config.client_id(), &config.host, config.port);
        options.set_keep_alive(config.keep_alive);

        let (client, event_loop) = AsyncClient::new(options, config.capacity);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let topics = Arc::new(Mutex::new(Vec::new()));
        let pending_acks = PendingAcks::default();
        let cancel_token = CancellationToken::new();

        info!(address = %config.address(), client_id = config.client_id(), "connecting to MQTT broker");

        let driver = EventLoopDriver {
            client: client.clone(),
            inbox: inbox_tx,
            topics: Arc::clone(&topics),
            pending_acks: Arc::clone(&pending_acks),
            address: config.address(),
        };
        let handle = tokio::spawn(driver.run(event_loop, cancel_token.clone()));

        Self {
            client,
            inbox: tokio::sync::Mutex::new(inbox_rx),
            topics,
            pending_acks,
            publish_order: tokio::sync::Mutex::new(()),
            ack_timeout: config.ack_timeout,
            cancel_token,
            event_loop: Mutex::new(Some(handle)),
        }
    }
}

#[async_trait]
impl Transport for MqttTransport {
    async fn subscribe(&self, topic: &str) -> Result<()> {
        {
            let mut topics = self.topics.lock();
            if !topics.iter().any(|t| t == topic) {
                topics.push(topic.to_string());
            }
        }
        self.client
            .subscribe(topic, QoS::AtLeastOnce)
            .await
            .or_transport(&format!("subscribe to {topic}"))
    }

    async fn publish(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();

        {
            // Waiters must be queued in the order requests reach the client.
            let _order = self.publish_order.lock().await;
            self.pending_acks.lock().queue(ack_tx);
            if let Err(err) = self
                .client
                .publish(topic, QoS::AtLeastOnce, false, payload)
                .await
            {
                self.pending_acks.lock().unqueue_last();
                return Err(SunfuseError::publish(topic, err));
            }
        }

        match timeout(self.ack_timeout, ack_rx).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(SunfuseError::publish(
                topic,
                "transport stopped before acknowledgment",
            )),
            Err(_) => Err(SunfuseError::timeout(
                format!("acknowledgment of publish on {topic}"),
                self.ack_timeout,
            )),
        }
    }

    async fn next_message(&self) -> Option<Message> {
        self.inbox.lock().await.recv().await
    }

    async fn disconnect(&self) -> Result<()> {
        let result = self.client.disconnect().await.or_transport("disconnect");
        self.cancel_token.cancel();

        let handle = self.event_loop.lock().take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }

        info!("disconnected from MQTT broker");
        result
    }
}

impl Drop for MqttTransport {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

struct EventLoopDriver {
    client: AsyncClient,
    inbox: mpsc::UnboundedSender<Message>,
    topics: Arc<Mutex<Vec<String>>>,
    pending_acks: PendingAcks,
    address: String,
}

impl EventLoopDriver {
    async fn run(self, mut event_loop: EventLoop, cancel_token: CancellationToken) {
        let mut connected_before = false;

        loop {
            let event = select! {
                _ = cancel_token.cancelled() => break,
                event = event_loop.poll() => event,
            };

            match event {
                Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                    info!(code = ?ack.code, session_present = ack.session_present, "connected");
                    self.pending_acks.lock().on_connected();
                    if connected_before {
                        self.resubscribe();
                    }
                    connected_before = true;
                }
                Ok(Event::Incoming(Packet::SubAck(ack))) => {
                    for code in ack.return_codes {
                        match code {
                            SubscribeReasonCode::Success(qos) => {
                                info!(?qos, "broker granted subscription");
                            }
                            SubscribeReasonCode::Failure => {
                                warn!("broker rejected subscription");
                            }
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let message = Message::new(publish.topic, publish.payload.to_vec());
                    if self.inbox.send(message).is_err() {
                        debug!("inbox closed, dropping incoming message");
                    }
                }
                Ok(Event::Outgoing(Outgoing::Publish(pkid))) => {
                    self.pending_acks.lock().on_outgoing(pkid);
                }
                Ok(Event::Incoming(Packet::PubAck(ack))) => {
                    if self.pending_acks.lock().on_ack(ack.pkid) {
                        debug!(pkid = ack.pkid, "publish acknowledged");
                    } else {
                        debug!(pkid = ack.pkid, "acknowledgment without a waiting publish");
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    let err = SunfuseError::transport_connect(format!("{}: {err}", self.address));
                    // In-flight publishes are resent after the reconnect and keep their waiters.
                    error!(error = %err, "MQTT event loop error, retrying");

                    select! {
                        _ = cancel_token.cancelled() => break,
                        _ = sleep(RECONNECT_DELAY) => {}
                    }
                }
            }
        }

        debug!("MQTT event loop stopped");
    }

    fn resubscribe(&self) {
        let topics = self.topics.lock().clone();
        for topic in topics {
            // The event loop is this task, so the request must not wait for queue space.
            if let Err(err) = self.client.try_subscribe(topic.as_str(), QoS::AtLeastOnce) {
                warn!(%topic, error = %err, "failed to re-subscribe");
            }
        }
    }
}
