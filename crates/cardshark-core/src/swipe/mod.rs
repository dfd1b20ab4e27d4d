//! Swipe frame decoding.
//!
//! The decoder follows a layered structure:
//! - `layout`: byte offsets and device constants (source of truth)
//! - `reader`: safe byte access and reader-frame conventions
//! - `parser`: domain-level decoding (no direct byte indexing)
//! - `error`: explicit, actionable errors
//!
//! Decoding is pure and contains no I/O; transports and the accumulator
//! handle device access and buffer assembly.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use error::DecodeError;
pub use parser::decode_swipe;
