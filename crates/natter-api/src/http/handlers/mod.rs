pub mod auth;
pub mod contact;
pub mod group;
pub mod message;
pub mod ws;
