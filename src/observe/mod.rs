// Observing Pybricks broadcasts: scan callback -> channel -> control loop
pub mod config;
pub mod latest;
pub mod observer;

pub use config::{ConfigError, ObserverConfig};
pub use latest::{run_control_loop, LatestValues};
pub use observer::{IgnoreReason, ObserveError, Observation, Observer, ScanOutcome, ScanReport};
