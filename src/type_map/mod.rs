pub use self::group::MappingGroup;
pub use self::map::TypeMap;

mod group;
mod map;
