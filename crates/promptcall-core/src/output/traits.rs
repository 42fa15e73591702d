//! Response sink trait definition

/// Append-only sink for streamed markdown output
///
/// Implementations:
/// - `MemorySink`: buffers fragments for tests and embedding
/// - `ConsoleSink`: writes fragments to stdout
/// - Host adapter: the embedding chat UI's response stream
pub trait ResponseSink: Send + Sync {
    /// Append a markdown fragment to the response
    fn write(&self, fragment: &str);
}
