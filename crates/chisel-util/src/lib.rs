#![forbid(unsafe_code)]
//! Filesystem helpers for Chisel.

pub mod error;
pub mod fs;
