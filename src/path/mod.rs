//! Property paths: typed accessor chains on both sides of a mapping.
pub use self::destination::{DestinationPath, NestedTarget};
pub use self::source::PropertyPath;

mod destination;
mod source;

use crate::error::ConfigurationError;
use smallvec::SmallVec;

/// Segment names of a path; most paths are one to three links deep.
pub(crate) type Segments = SmallVec<[&'static str; 4]>;

pub(crate) fn join_segments(segments: &[&'static str]) -> String {
    segments.join(".")
}

/// Splits a dotted path, rejecting empty input and empty segments.
pub(crate) fn split_path(path: &str) -> Result<Vec<&str>, ConfigurationError> {
    let names: Vec<&str> = path.split('.').map(str::trim).collect();
    if names.iter().any(|name| name.is_empty()) {
        return Err(ConfigurationError::InvalidPath(path.to_string()));
    }
    Ok(names)
}
