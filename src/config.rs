//! Machine configuration.

use crate::builder::BuildError;
use serde::{Deserialize, Serialize};

/// Default per-subscriber buffer of the state stream.
pub const DEFAULT_STREAM_CAPACITY: usize = 64;

/// Default number of published transitions kept in history.
pub const DEFAULT_HISTORY_LIMIT: usize = 128;

/// Tunables for an [`ActionStateMachine`](crate::machine::ActionStateMachine).
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use action_machine::MachineConfig;
///
/// let config = MachineConfig::from_json(r#"{ "verbose": true }"#).unwrap();
/// assert!(config.verbose);
/// assert_eq!(config.stream_capacity, 64);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Emit an `info` event for every lifecycle milestone
    pub verbose: bool,

    /// Buffered states per subscriber before a slow subscriber starts skipping
    pub stream_capacity: usize,

    /// Published transitions kept in history; 0 disables recording
    pub history_limit: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            stream_capacity: DEFAULT_STREAM_CAPACITY,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl MachineConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json(json: &str) -> Result<Self, BuildError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_stream_capacity(mut self, capacity: usize) -> Self {
        self.stream_capacity = capacity;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Check the configuration can back a machine.
    pub fn validate(&self) -> Result<(), BuildError> {
        if self.stream_capacity == 0 {
            return Err(BuildError::ZeroStreamCapacity);
        }
        Ok(())
    }
}
