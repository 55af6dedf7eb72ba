//! Core traits for memoir.

mod llm;
mod oracle;

pub use llm::*;
pub use oracle::*;
