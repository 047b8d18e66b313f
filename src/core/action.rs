//! Action trait for intents submitted to a machine.

use std::fmt::Debug;

/// An immutable intent to move the machine forward.
///
/// Actions are cloned into the task that processes them and handed to the
/// dispatcher's admission and cancellation decisions, so they should be cheap
/// to clone.
///
/// # Example
///
/// ```rust
/// use action_machine::core::Action;
///
/// #[derive(Clone, Debug, PartialEq)]
/// enum TransferAction {
///     Send { amount: u64 },
///     Refresh,
/// }
///
/// impl Action for TransferAction {
///     fn name(&self) -> &str {
///         match self {
///             Self::Send { .. } => "Send",
///             Self::Refresh => "Refresh",
///         }
///     }
/// }
///
/// assert_eq!(TransferAction::Send { amount: 5 }.name(), "Send");
/// ```
pub trait Action: Clone + Debug + Send + Sync + 'static {
    /// Get the action's name for display/logging.
    fn name(&self) -> &str;
}
