//! services/api/src/lib.rs
//!
//! The API service: configuration, adapters for the core crate's ports, the
//! axum web layer and a typed client for it.

pub mod adapters;
pub mod client;
pub mod config;
pub mod error;
pub mod web;
