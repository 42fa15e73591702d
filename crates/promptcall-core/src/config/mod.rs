//! Log-target configuration source
//!
//! The log handler looks up files by "environment component" pairs against
//! a read-only list supplied by the host. Tests and embedders use
//! `MemoryLogConfig`; standalone use reads a YAML file via `FileLogConfig`.

mod file;
mod memory;
mod traits;

pub use file::FileLogConfig;
pub use memory::MemoryLogConfig;
pub use traits::{LogConfigSource, LogTarget};
