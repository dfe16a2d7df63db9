//! Filesystem and process helpers shared by the build stages.

pub mod exec;
pub mod fs;
