//! CLI command implementations.

pub mod common;
pub mod drive;
pub mod interaction;
pub mod rotation;
pub mod version;
