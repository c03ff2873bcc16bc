// Hand-off from the BLE scan callback to the control loop
//
// The scan side never blocks: observations go out with try_send and are
// dropped when the control loop falls behind.

use super::config::ObserverConfig;
use crate::codec::{self, CodecError, Value};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

#[derive(Error, Debug, PartialEq)]
pub enum ObserveError {
    #[error("Control loop receiver was dropped")]
    Closed,
}

/// One scan result as delivered by the BLE stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanReport {
    pub address: [u8; 6],
    pub rssi: i8,
    pub data: Vec<u8>,
}

impl ScanReport {
    pub fn new(address: [u8; 6], rssi: i8, data: impl Into<Vec<u8>>) -> Self {
        Self {
            address,
            rssi,
            data: data.into(),
        }
    }
}

/// Decoded broadcast handed to the control loop
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub channel: u8,
    pub address: [u8; 6],
    pub rssi: i8,
    pub values: Vec<Value>,
}

/// Why a scan result produced no observation
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    ForeignManufacturer,
    MissingChannel,
    ChannelNotObserved(u8),
    Malformed(CodecError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Queued for the control loop on this channel
    Delivered(u8),
    Ignored(IgnoreReason),
    /// Queue full; the control loop is behind
    Dropped(u8),
}

/// Scan-side handle; cheap to clone into a BLE callback
#[derive(Clone)]
pub struct Observer {
    config: Arc<ObserverConfig>,
    tx: mpsc::Sender<Observation>,
}

impl Observer {
    /// Create an observer and the receiver the control loop reads from
    pub fn new(config: ObserverConfig) -> (Self, mpsc::Receiver<Observation>) {
        let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
        let observer = Self {
            config: Arc::new(config),
            tx,
        };
        (observer, rx)
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Filter, decode and queue one scan result.
    ///
    /// Only fails once the control loop is gone; everything else is reported
    /// through the outcome so the scan loop keeps running.
    pub fn on_scan_result(&self, report: &ScanReport) -> Result<ScanOutcome, ObserveError> {
        let outcome = match self.observe(report) {
            Ok(observation) => {
                let channel = observation.channel;
                match self.tx.try_send(observation) {
                    Ok(()) => ScanOutcome::Delivered(channel),
                    Err(TrySendError::Full(_)) => {
                        tracing::debug!("Observation queue full, dropping channel {}", channel);
                        ScanOutcome::Dropped(channel)
                    }
                    Err(TrySendError::Closed(_)) => return Err(ObserveError::Closed),
                }
            }
            Err(reason) => {
                if let IgnoreReason::Malformed(e) = &reason {
                    tracing::debug!("Ignoring advertisement from {:02X?}: {}", report.address, e);
                }
                ScanOutcome::Ignored(reason)
            }
        };

        Ok(outcome)
    }

    fn observe(&self, report: &ScanReport) -> Result<Observation, IgnoreReason> {
        if !codec::has_expected_manufacturer(&report.data) {
            return Err(IgnoreReason::ForeignManufacturer);
        }

        let channel = codec::channel(&report.data).ok_or(IgnoreReason::MissingChannel)?;
        if !self.config.accepts(channel) {
            return Err(IgnoreReason::ChannelNotObserved(channel));
        }

        let values = codec::decode(&report.data).map_err(IgnoreReason::Malformed)?;

        Ok(Observation {
            channel,
            address: report.address,
            rssi: report.rssi,
            values,
        })
    }
}
