//! Static checks that find configuration gaps before any instance is mapped.
pub use self::error::{ValidationError, ValidationErrorType};
pub use self::validator::Validator;

mod error;
mod validator;
