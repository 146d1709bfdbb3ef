//! Error types for chisel-engine.

/// Errors produced by the packaging executor.
///
/// All filesystem failures arrive through the `Util` bridge; the executor
/// itself performs no raw I/O.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A utility operation failed.
    #[error("{0}")]
    Util(#[from] chisel_util::error::UtilError),

    /// A rewrite pattern failed to compile.
    #[error("invalid rewrite pattern `{pattern}`: {message}")]
    Pattern { pattern: String, message: String },

    /// Metadata serialization failed.
    #[error("cannot serialize pack metadata: {message}")]
    Metadata { message: String },
}
