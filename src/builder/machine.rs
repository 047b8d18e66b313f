//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::config::MachineConfig;
use crate::dispatcher::Dispatcher;
use crate::machine::ActionStateMachine;

/// Builder for constructing [`ActionStateMachine`]s with a fluent API.
pub struct StateMachineBuilder<D: Dispatcher> {
    dispatcher: D,
    config: MachineConfig,
}

impl<D: Dispatcher> StateMachineBuilder<D> {
    /// Create a new builder around the dispatcher the machine will own.
    pub fn new(dispatcher: D) -> Self {
        Self {
            dispatcher,
            config: MachineConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Log every lifecycle milestone at `info`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Per-subscriber buffer of the state stream (must be at least 1).
    pub fn stream_capacity(mut self, capacity: usize) -> Self {
        self.config.stream_capacity = capacity;
        self
    }

    /// Number of published transitions kept in history (0 disables it).
    pub fn history_limit(mut self, limit: usize) -> Self {
        self.config.history_limit = limit;
        self
    }

    /// Build the machine.
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<ActionStateMachine<D>, BuildError> {
        self.config.validate()?;
        Ok(ActionStateMachine::from_parts(self.dispatcher, self.config))
    }
}
