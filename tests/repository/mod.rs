//! Repository Tests Module
//!
//! Every operation against a private in-memory SQLite database per test.

pub mod aggregate;
pub mod joins;
pub mod ordering;
