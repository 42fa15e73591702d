//! Logging abstractions
//!
//! Diagnostic logging is an implementation convenience here, not part of
//! the pipeline's contract: nothing is persisted and no failure path
//! depends on a logger being present.

mod console;
mod noop;
mod traits;

pub use console::ConsoleLogger;
pub use noop::NoOpLogger;
pub use traits::{Logger, SharedLogger};
