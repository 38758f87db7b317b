//! Foundation types and traits for Glimpse.
//!
//! This crate contains the platform-agnostic types shared by all Glimpse
//! crates: the error type, input events, backend trait definitions, the
//! TLS provider seam, and browser configuration.

pub mod backend;
pub mod config;
pub mod error;
pub mod input;
pub mod tls;
