//! Upstream transport.
//!
//! # Responsibilities
//! - Perform the actual HTTP call for a breaker (`RequestExecutor`)
//! - Apply connect and per-attempt timeouts
//! - Report every HTTP status as a response; only transport faults are errors
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` shared by every breaker
//! - Bodies are decoded as JSON when possible, otherwise kept as text

pub mod client;

pub use client::HttpExecutor;
