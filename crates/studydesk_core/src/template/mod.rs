//! Read-only template catalog.
//!
//! # Responsibility
//! - Define the curated blueprint shape for bulk workspace creation.
//! - Provide the builtin in-process catalog implementation.

pub mod catalog;
