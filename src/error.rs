//! Typed errors raised at the boundary between ingestion and the profiling engine.
//!
//! The engine itself is total; these variants describe inputs that a caller's
//! policy refuses before profiling starts.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("'{input}' contains no data rows")]
    EmptyInput { input: String },
    #[error("'{input}' is not valid {encoding} text")]
    Decode {
        input: String,
        encoding: &'static str,
    },
}
