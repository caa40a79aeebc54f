//! # Middleware
//!
//! HTTP tracing.

pub mod tracing_layer;
