//! In-memory response sink

use parking_lot::Mutex;

use super::traits::ResponseSink;

/// A sink that buffers every fragment in memory
///
/// The visible response is the concatenation of fragments in write order.
#[derive(Debug, Default)]
pub struct MemorySink {
    buffer: Mutex<String>,
    fragments: Mutex<Vec<String>>,
}

impl MemorySink {
    /// Create a new empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// The full response accumulated so far
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    /// Individual fragments in write order
    pub fn fragments(&self) -> Vec<String> {
        self.fragments.lock().clone()
    }

    /// Number of fragments written
    pub fn fragment_count(&self) -> usize {
        self.fragments.lock().len()
    }
}

impl ResponseSink for MemorySink {
    fn write(&self, fragment: &str) {
        self.buffer.lock().push_str(fragment);
        self.fragments.lock().push(fragment.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragments_preserve_order() {
        let sink = MemorySink::new();
        sink.write("first ");
        sink.write("second ");
        sink.write("third");

        assert_eq!(sink.contents(), "first second third");
        assert_eq!(sink.fragments(), vec!["first ", "second ", "third"]);
        assert_eq!(sink.fragment_count(), 3);
    }
}
