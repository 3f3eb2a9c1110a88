//! Presence tracking, fan-out routing, and storage ports for Natter.
//!
//! This crate defines the "ports" (repository traits and transport seams)
//! that the infrastructure and API layers implement. It depends only on
//! `natter-types` -- never on `natter-infra` or any database/IO crate.

pub mod fanout;
pub mod presence;
pub mod repository;
pub mod service;
