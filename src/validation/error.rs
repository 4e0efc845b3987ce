//! Defines the error types for the validation module.

/// The specific category of a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// A writable destination field that no rule writes and that is not skipped.
    UnmappedField,
    /// A nested destination record that a rule writes through but the engine
    /// cannot create.
    NotInstantiable,
}

/// A structured finding from checking a type map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The checked pair, e.g. `Person -> PersonDto`.
    pub type_pair: String,
    /// The destination field or path the finding is about.
    pub field: String,
    pub error_type: ValidationErrorType,
    /// A human-readable message explaining the error.
    pub message: String,
}
