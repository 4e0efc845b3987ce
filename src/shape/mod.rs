//! The contract a record type fulfils to take part in mapping.
//!
//! The engine never inspects a type at runtime. A record instead declares its
//! fields as explicit accessor closures (used by the convention layer and by
//! string property paths) and says whether it can be created without arguments.
//! Types mapped purely through typed paths and closures can implement `Shape`
//! with an empty body.
pub use self::field::Field;

pub(crate) mod field;

pub trait Shape: Sized + 'static {
    /// The record's field table. Defaults to no declared fields.
    fn fields() -> Vec<Field> {
        Vec::new()
    }

    /// Creates an empty instance, the equivalent of a no-argument constructor.
    /// `None` means the type cannot be created by the engine.
    fn construct() -> Option<Self> {
        None
    }

    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// The type name without its module path, for messages and plan listings.
pub(crate) fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}
