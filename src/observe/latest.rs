// Latest values per channel, as the control loop sees them

use super::config::ObserverConfig;
use super::observer::Observation;
use crate::codec::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
struct Entry {
    values: Vec<Value>,
    rssi: i8,
    received: Instant,
}

/// Most recent broadcast on each channel.
///
/// `observe` returns nothing for a channel whose last broadcast is older than
/// `max_age`, the same way a hub stops reporting a sender that went quiet.
#[derive(Debug, Clone)]
pub struct LatestValues {
    max_age: Duration,
    entries: HashMap<u8, Entry>,
}

impl LatestValues {
    pub fn new(max_age: Duration) -> Self {
        Self {
            max_age,
            entries: HashMap::new(),
        }
    }

    pub fn from_config(config: &ObserverConfig) -> Self {
        Self::new(config.max_age())
    }

    /// Replace the channel's values with a fresh observation
    pub fn update(&mut self, observation: Observation, now: Instant) {
        self.entries.insert(
            observation.channel,
            Entry {
                values: observation.values,
                rssi: observation.rssi,
                received: now,
            },
        );
    }

    fn fresh(&self, channel: u8, now: Instant) -> Option<&Entry> {
        self.entries
            .get(&channel)
            .filter(|e| now.saturating_duration_since(e.received) <= self.max_age)
    }

    /// Values last broadcast on `channel`, if still fresh at `now`
    pub fn observe(&self, channel: u8, now: Instant) -> Option<&[Value]> {
        self.fresh(channel, now).map(|e| e.values.as_slice())
    }

    /// Signal strength of the last broadcast on `channel`, if still fresh
    pub fn rssi(&self, channel: u8, now: Instant) -> Option<i8> {
        self.fresh(channel, now).map(|e| e.rssi)
    }

    /// Channels seen so far, sorted
    pub fn channels(&self) -> Vec<u8> {
        let mut channels: Vec<u8> = self.entries.keys().copied().collect();
        channels.sort_unstable();
        channels
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Drain observations into `table` until every observer handle is dropped.
///
/// `on_update` runs after each update with the channel that changed.
/// Returns the number of observations processed.
pub async fn run_control_loop<F>(
    mut rx: mpsc::Receiver<Observation>,
    table: &mut LatestValues,
    mut on_update: F,
) -> usize
where
    F: FnMut(u8, &LatestValues),
{
    let mut processed = 0;

    while let Some(observation) = rx.recv().await {
        let channel = observation.channel;
        table.update(observation, Instant::now());
        on_update(channel, table);
        processed += 1;
    }

    processed
}
