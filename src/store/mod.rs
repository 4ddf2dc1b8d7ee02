//! Store Module
//!
//! In-process registry of named tables, each mapping a lock key to the
//! attributes recorded for it.
//!
//! ## Responsibilities
//! - Conditional insert ("only if absent"), point lookup, point delete
//! - Lazy table creation on first write
//! - Hand out copies of attribute data, never references into live state
//!
//! ## Concurrency Model
//! One mutex guards the whole store. Every operation, including the
//! check-then-write of a conditional put and the table creation it may
//! trigger, runs inside that single critical section. Sharding per table or per
//! key would allow more parallelism; the work under the lock is a couple of
//! hash map operations, so the single lock is kept.

mod memory;
mod table;

pub use memory::InMemoryStore;
pub use table::Table;

use std::collections::BTreeMap;

use crate::error::Result;

/// Attribute name to attribute value, both opaque strings
pub type Attributes = BTreeMap<String, String>;

/// Storage backend for lock tables
///
/// All methods must be linearizable: in particular `put` with
/// `require_absent = true` must check and write atomically with respect to
/// every other call on the same store.
pub trait TableStore: Send + Sync {
    /// Copy of the attributes stored at `key`
    ///
    /// Fails with `TableNotFound` if the table was never written, and with
    /// `EntryNotFound` if the table exists but holds no entry at `key`.
    fn get(&self, table: &str, key: &str) -> Result<Attributes>;

    /// Store `attributes` at `key`, replacing any previous entry
    ///
    /// Creates the table if needed. With `require_absent`, fails with
    /// `EntryAlreadyExists` and leaves the existing entry untouched when `key`
    /// is already present.
    fn put(
        &self,
        table: &str,
        key: &str,
        attributes: Attributes,
        require_absent: bool,
    ) -> Result<()>;

    /// Remove the entry at `key`
    ///
    /// The table itself stays, even when it becomes empty.
    fn delete(&self, table: &str, key: &str) -> Result<()>;
}
