//! The explicit mapping context: one type map per (source, destination) pair.
pub use self::engine::Registry;
pub use self::entry::TypeMapEntry;

mod engine;
mod entry;
