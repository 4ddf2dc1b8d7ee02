//! Network Module
//!
//! HTTP server and client for the item API.
//!
//! ## Architecture
//! - axum router with a single `POST /` route
//! - Operation selected by the `X-Amz-Target` header
//! - Commands routed through the Dispatcher
//! - reqwest-based client for the CLI and tests

mod client;
mod handler;
mod server;

pub use client::Client;
pub use server::{Server, ShutdownHandle};

/// Header naming the requested operation
pub const TARGET_HEADER: &str = "x-amz-target";
