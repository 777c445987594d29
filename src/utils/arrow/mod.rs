//! Arrow array helpers shared by the loader, pipeline and dashboard.

pub mod array_utils;

pub use array_utils::{downcast_array, get_column, string_values, to_string_array};
