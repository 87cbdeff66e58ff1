//! # Taskboard API Server Library
//!
//! This library provides the core functionality for the Taskboard API server.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `response`: Success response envelope
//! - `validation`: Request validation rule sets
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod response;
pub mod routes;
pub mod validation;
