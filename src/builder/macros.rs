//! Macros for declaring simple states.

/// Generate a `State` implementation for a fieldless enum.
///
/// # Example
///
/// ```
/// use action_machine::state_enum;
/// use action_machine::core::State;
///
/// state_enum! {
///     pub enum PaymentState {
///         Idle,
///         Sending,
///         Completed,
///         Failed,
///     }
///     initial: Idle
///     final: [Completed, Failed]
///     error: [Failed]
/// }
///
/// assert_eq!(PaymentState::initial(), PaymentState::Idle);
/// assert!(PaymentState::Failed.is_error());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        initial: $initial:ident
        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn initial() -> Self {
                Self::$initial
            }

            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
