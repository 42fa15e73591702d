//! Response sink abstractions
//!
//! Handlers render their results as incremental markdown fragments written
//! to a sink. Writes are append-only and order-preserving; there is no
//! acknowledgment and no way to retract a fragment, so handlers emit
//! status lines first and the final result last.

mod console;
mod memory;
mod traits;

pub use console::ConsoleSink;
pub use memory::MemorySink;
pub use traits::ResponseSink;
