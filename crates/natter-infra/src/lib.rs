//! Infrastructure layer for Natter.
//!
//! Contains the SQLite implementations of the repository traits defined
//! in `natter-core`: message store, users, contacts, and groups.

pub mod sqlite;
