// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::channel::Channel;
use crate::record::{ChannelRecord, EnvironmentalSample, PowerSample};

/// Latest pending record per channel.
///
/// Each slot is either empty or holds the newest record decoded for its
/// channel; an update replaces whatever was there. [`try_drain`](Self::try_drain)
/// is the only way to read the pair out, and it empties both slots in the same
/// call, so a pair is handed out at most once.
///
/// Pairing is latest-available: a slot can hold a sample of any age until the
/// other channel catches up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FusionState {
    environmental: Option<EnvironmentalSample>,
    power: Option<PowerSample>,
}

impl FusionState {
    pub const fn new() -> Self {
        Self {
            environmental: None,
            power: None,
        }
    }

    /// Overwrites the slot of the record's channel.
    pub fn update(&mut self, record: ChannelRecord) {
        match record {
            ChannelRecord::Environmental(sample) => self.environmental = Some(sample),
            ChannelRecord::Power(sample) => self.power = Some(sample),
        }
    }

    /// Takes both samples if both slots are filled, leaving the state empty.
    ///
    /// Returns `None` and leaves the state untouched otherwise.
    pub fn try_drain(&mut self) -> Option<(EnvironmentalSample, PowerSample)> {
        match (self.environmental, self.power) {
            (Some(environmental), Some(power)) => {
                self.environmental = None;
                self.power = None;
                Some((environmental, power))
            }
            _ => None,
        }
    }

    pub const fn is_pending(&self, channel: Channel) -> bool {
        match channel {
            Channel::Environmental => self.environmental.is_some(),
            Channel::Power => self.power.is_some(),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.environmental.is_none() && self.power.is_none()
    }

    /// First channel (environmental before power) whose slot is still empty.
    pub fn missing(&self) -> Option<Channel> {
        Channel::ALL
            .into_iter()
            .find(|channel| !self.is_pending(*channel))
    }

    pub const fn environmental(&self) -> Option<&EnvironmentalSample> {
        self.environmental.as_ref()
    }

    pub const fn power(&self) -> Option<&PowerSample> {
        self.power.as_ref()
    }
}
