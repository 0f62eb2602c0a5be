//! Tap Request Decoding and Validation
//!
//! Turns the JSON request payload into typed tap data: numeric-string
//! coercion for intervals, optional positions, and range checking.

mod error;
mod request;
mod validator;

pub use error::ValidationError;
pub use request::TapRequest;
pub use validator::{Validator, ValidationConfig};
