//! Language model collaborator seam
//!
//! The pipeline depends on exactly one model operation: send a prompt, get
//! back a stream of text fragments. Callers must drain the full stream and
//! concatenate before interpreting the content as JSON or prose.
//!
//! `MockModel` provides deterministic responses for tests;
//! `OpenAiCompatModel` talks to any OpenAI-compatible chat endpoint.

mod error;
mod mock;
mod openai;
mod traits;

pub use error::{ModelError, ModelResult};
pub use mock::{MockMode, MockModel};
pub use openai::OpenAiCompatModel;
pub use traits::{drain, LanguageModel, TextStream};
