//! Persistent records for notes, action items and tags.
//!
//! # Invariants
//! - Identity is an SQLite integer rowid, never reused.
//! - Timestamps are Unix epoch milliseconds assigned by storage.
//! - Tag names are lowercase.

pub mod action_item;
pub mod note;
pub mod tag;
