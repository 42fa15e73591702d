//! Core types for the function-call pipeline
//!
//! This module contains the shared types used across the resolver,
//! dispatcher and handlers.

mod call;
mod cancellation;

pub use call::{FunctionCategory, FunctionSpec, ResolvedCall};
pub use cancellation::CancellationToken;
