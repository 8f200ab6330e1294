// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::sync::Arc;
use sunfuse_core::{Channel, CombinedRecord, RecordId, ENVIRONMENTAL_TOPIC, POWER_TOPIC};
use sunfuse_exec::{EmissionPolicy, Ingest, Outcome};
use sunfuse_test_utils::fixtures::{
    environmental, environmental_payload, house, power, power_payload, MALFORMED_PAYLOAD,
};
use sunfuse_test_utils::{FailingSink, FixedClock, RecordingSink};

fn policy(sink: RecordingSink, clock: FixedClock) -> EmissionPolicy<RecordingSink, FixedClock> {
    EmissionPolicy::with_clock(&house(), sink, clock)
}

#[tokio::test]
async fn test_first_message_waits_for_other_channel() {
    // Arrange
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1_700_000_000));

    // Act
    let outcome = policy
        .on_message(Channel::Environmental, &environmental_payload(55.0, 21.0))
        .await;

    // Assert
    assert_eq!(
        outcome,
        Outcome::Waiting {
            missing: Channel::Power
        }
    );
    assert!(sink.is_empty());
    assert!(policy.state().is_pending(Channel::Environmental));
}

#[tokio::test]
async fn test_second_channel_emits_combined_record() {
    // Arrange
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1_700_000_000));
    policy
        .on_message(Channel::Environmental, &environmental_payload(55.0, 21.0))
        .await;

    // Act
    let outcome = policy
        .on_message(Channel::Power, &power_payload(300.0, 150.0))
        .await;

    // Assert
    let expected = CombinedRecord {
        humidity: 55.0,
        temperature: 21.0,
        consumption_wattage: 300.0,
        production_wattage: 150.0,
        timestamp: 1_700_000_000,
    };
    assert_eq!(
        outcome,
        Outcome::Stored {
            id: RecordId::new("rec-1"),
            record: expected
        }
    );
    assert_eq!(
        sink.posted(),
        vec![("houses/HOUSE_123".to_string(), expected)]
    );
    assert!(policy.state().is_empty());
}

#[tokio::test]
async fn test_timestamp_is_taken_at_emission_time() {
    // Arrange
    let clock = FixedClock::at(100);
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), clock.clone());
    policy
        .on_message(Channel::Power, &power_payload(300.0, 150.0))
        .await;

    // Act
    clock.advance(42);
    policy
        .on_message(Channel::Environmental, &environmental_payload(55.0, 21.0))
        .await;

    // Assert
    assert_eq!(sink.records()[0].timestamp, 142);
}

#[tokio::test]
async fn test_malformed_payload_is_dropped_without_emission() {
    // Arrange
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1));
    policy
        .on_message(Channel::Environmental, &environmental_payload(55.0, 21.0))
        .await;
    let before = policy.state();

    // Act
    let outcome = policy.on_message(Channel::Power, MALFORMED_PAYLOAD).await;

    // Assert
    assert_eq!(outcome, Outcome::Dropped);
    assert_eq!(policy.state(), before);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_malformed_payload_on_empty_state_emits_nothing() {
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1));

    assert_eq!(
        policy.on_message(Channel::Power, MALFORMED_PAYLOAD).await,
        Outcome::Dropped
    );
    assert!(policy.state().is_empty());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_latest_sample_wins() {
    // Arrange
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1));

    // Act
    policy
        .on_message(Channel::Power, &power_payload(100.0, 10.0))
        .await;
    policy
        .on_message(Channel::Power, &power_payload(400.0, 250.0))
        .await;
    policy
        .on_message(Channel::Environmental, &environmental_payload(60.0, 19.0))
        .await;

    // Assert
    let records = sink.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].power(), power(400.0, 250.0));
    assert_eq!(records[0].environmental(), environmental(60.0, 19.0));
}

#[tokio::test]
async fn test_each_pair_is_emitted_once() {
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1));

    for round in 0..3 {
        let value = f64::from(round);
        policy
            .on_message(Channel::Environmental, &environmental_payload(value, value))
            .await;
        policy
            .on_message(Channel::Power, &power_payload(value, value))
            .await;
    }

    let records = sink.records();
    assert_eq!(records.len(), 3);
    for (round, record) in records.iter().enumerate() {
        assert_eq!(record.humidity, round as f64);
        assert_eq!(record.production_wattage, round as f64);
    }
    assert!(policy.state().is_empty());
}

#[tokio::test]
async fn test_sink_failure_is_swallowed_and_state_reset() {
    // Arrange
    let sink = FailingSink::new();
    let policy = EmissionPolicy::with_clock(&house(), sink.clone(), FixedClock::at(7));
    policy
        .on_message(Channel::Environmental, &environmental_payload(55.0, 21.0))
        .await;

    // Act
    let outcome = policy
        .on_message(Channel::Power, &power_payload(300.0, 150.0))
        .await;

    // Assert
    assert!(matches!(outcome, Outcome::SinkFailed { record } if record.timestamp == 7));
    assert_eq!(sink.attempts(), 1);
    assert!(policy.state().is_empty());

    // The next message starts a fresh pairing.
    assert_eq!(
        policy
            .on_message(Channel::Power, &power_payload(1.0, 1.0))
            .await,
        Outcome::Waiting {
            missing: Channel::Environmental
        }
    );
}

#[tokio::test]
async fn test_topic_routing() {
    let sink = RecordingSink::new();
    let policy = policy(sink.clone(), FixedClock::at(1));

    assert_eq!(
        policy
            .on_topic_message("sensor/unknown", &power_payload(1.0, 1.0))
            .await,
        Outcome::Ignored
    );
    assert!(policy.state().is_empty());

    policy
        .on_topic_message(ENVIRONMENTAL_TOPIC, &environmental_payload(55.0, 21.0))
        .await;
    let outcome = policy
        .on_topic_message(POWER_TOPIC, &power_payload(300.0, 150.0))
        .await;
    assert!(matches!(outcome, Outcome::Stored { .. }));
}

#[test]
fn test_ingest_is_synchronous_and_pure_of_io() {
    let policy = policy(RecordingSink::new(), FixedClock::at(9));

    assert_eq!(
        policy.ingest(Channel::Power, &power_payload(300.0, 150.0)),
        Ingest::Waiting {
            missing: Channel::Environmental
        }
    );
    assert_eq!(
        policy.ingest(Channel::Environmental, b"not json"),
        Ingest::Dropped
    );
    assert_eq!(
        policy.ingest(Channel::Environmental, &environmental_payload(55.0, 21.0)),
        Ingest::Ready(CombinedRecord {
            humidity: 55.0,
            temperature: 21.0,
            consumption_wattage: 300.0,
            production_wattage: 150.0,
            timestamp: 9,
        })
    );
    assert_eq!(policy.storage_path(), "houses/HOUSE_123");
}

#[test]
fn test_shared_policy_never_emits_a_pair_twice() {
    // Four threads hammer the same policy; every drained record must be unique.
    let policy = Arc::new(policy(RecordingSink::new(), FixedClock::at(1)));
    let threads: Vec<_> = (0..4)
        .map(|thread| {
            let policy = Arc::clone(&policy);
            std::thread::spawn(move || {
                let mut ready = Vec::new();
                for i in 0..250 {
                    let value = f64::from(thread * 1000 + i);
                    let (channel, payload) = if (thread + i) % 2 == 0 {
                        (Channel::Environmental, environmental_payload(value, value))
                    } else {
                        (Channel::Power, power_payload(value, value))
                    };
                    if let Ingest::Ready(record) = policy.ingest(channel, &payload) {
                        ready.push(record);
                    }
                }
                ready
            })
        })
        .collect();

    let mut humidities: Vec<f64> = threads
        .into_iter()
        .flat_map(|handle| handle.join().unwrap())
        .map(|record| record.humidity)
        .collect();
    let emitted = humidities.len();
    humidities.sort_by(f64::total_cmp);
    humidities.dedup();

    assert!(emitted > 0);
    assert_eq!(humidities.len(), emitted);
}
