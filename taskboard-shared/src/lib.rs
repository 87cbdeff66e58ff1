//! # Taskboard Shared Library
//!
//! This crate contains shared types and business logic used by the Taskboard
//! API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Authentication primitives and the task access policy
//! - `db`: Connection pool and migration utilities

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the Taskboard shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
