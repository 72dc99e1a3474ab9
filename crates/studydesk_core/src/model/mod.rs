//! Domain model for the study-tracking hierarchy.
//!
//! # Responsibility
//! - Define canonical records for workspaces, folders, items, and todos.
//! - Keep variant fields closed sum types so consumers match exhaustively.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - Referential fields (`workspace_uuid`, `folder_uuid`, `item_uuid`) are
//!   id lookups, never object links; existence is validated at write time.

pub mod folder;
pub mod item;
pub mod todo;
pub mod workspace;
