//! # locktable
//!
//! An in-memory emulation of the DynamoDB item API subset that lock clients
//! (such as Terraform's state locking) rely on:
//! - PutItem with `attribute_not_exists(LockID)` to acquire a lock
//! - GetItem to read the current holder
//! - DeleteItem to release
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      HTTP Server                             │
//! │              (POST /, X-Amz-Target routing)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Dispatcher                               │
//! │        (key extraction, condition check, outcomes)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!                       ▼
//!               ┌───────────────┐
//!               │  Table Store  │
//!               │ (one Mutex)   │
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod dispatcher;
pub mod network;
pub mod protocol;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use dispatcher::Dispatcher;
pub use error::{ErrorKind, LockTableError, Result};
pub use store::{Attributes, InMemoryStore, TableStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of locktable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
