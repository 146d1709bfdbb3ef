//! Parse and validate `chisel.toml` and `chisel.properties`.

pub mod manifest;
pub mod properties;

pub use manifest::Manifest;
pub use properties::FeatureFlags;
