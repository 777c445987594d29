//! Shared helpers: Arrow column access, logging and timestamps

pub mod arrow;
pub mod logging;
pub mod time;
