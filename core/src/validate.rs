use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome of checking a runner input.
///
/// Invalid input is surfaced as an `Err` value carrying a descriptive
/// message; it is never raised as a panic and never reaches
/// [`Runner::generate`](crate::Runner::generate) under the caller contract.
pub type Validation = Result<(), InputError>;

/// A rejected runner input, with a message fit for direct display.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct InputError {
    /// What was wrong with the input, e.g. `"N must be between 1 and 8"`.
    pub message: String,
}

impl InputError {
    /// Build an error from a display-ready message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Guard helper for `validate` implementations: passes when `condition`
/// holds, rejects with `message` otherwise.
///
/// ```
/// use zoetrope_core::{Validation, ensure};
///
/// fn validate(n: usize) -> Validation {
///     ensure(n >= 1 && n <= 8, "N must be between 1 and 8")?;
///     Ok(())
/// }
/// assert!(validate(4).is_ok());
/// assert_eq!(validate(9).unwrap_err().message, "N must be between 1 and 8");
/// ```
pub fn ensure(condition: bool, message: impl Into<String>) -> Validation {
    if condition {
        Ok(())
    } else {
        Err(InputError::new(message))
    }
}
