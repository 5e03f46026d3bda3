//! CLI command implementations.

pub mod common;
pub mod inspect;
pub mod kinds;
pub mod patches;
pub mod render;
pub mod validate;
