//! Query Builder Tests Module
//!
//! Rendering tests for the backend-neutral statement builders, both with
//! inlined literals and with bound placeholders.

pub mod builder;
pub mod joins;
pub mod pagination;
