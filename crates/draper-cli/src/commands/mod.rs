//! CLI command implementations.

pub mod add;
pub mod common;
pub mod noisy;
pub mod sweep;
pub mod version;
pub mod zne;
