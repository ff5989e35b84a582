//! Core error types for the Billfolio application.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the bill-tracking core.
///
/// The UI-feedback coordinator itself never fails (misuse is absorbed and
/// self-healed, see the feedback module); errors here cover parsing and
/// validation of domain input.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(String),
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
