//! Variant resolution: toolchain policy, packaging rules, and the step
//! executor that applies them to a build-output tree.

pub mod apply;
pub mod error;
pub mod packaging;
pub mod toolchain;

pub use apply::{apply_rule, write_archive_manifest, ApplyReport};
pub use error::EngineError;
pub use packaging::{archive_attributes, resolve_packaging_rule, PackagingRule, RewriteStep};
pub use toolchain::{resolve_toolchain, JAVA_HIGHER, JAVA_LOWER};
