//! # Siteloft API Server Library
//!
//! This library provides the HTTP surface for Siteloft's authorization and
//! membership-lifecycle core.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder, and session middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
