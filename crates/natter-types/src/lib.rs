//! Shared domain types for Natter.
//!
//! This crate contains the types used across the chat backend: users,
//! groups, direct and group messages, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod error;
pub mod group;
pub mod message;
pub mod user;
