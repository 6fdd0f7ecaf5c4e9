//! Gradle invocation: executable resolution and subprocess execution

pub mod exec;
pub mod resolve;

pub use exec::{classify, execute, ExecutionResult};
