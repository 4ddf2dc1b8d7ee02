//! In-memory store
//!
//! The only backend: tables live for the lifetime of the process.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{Attributes, Table, TableStore};
use crate::error::{LockTableError, Result};

/// Process-local table store
///
/// ## Concurrency Model: one exclusive lock
///
/// - `get`, `put` and `delete` each hold `tables` for their whole duration
/// - The absence check and the write of a conditional put happen under the
///   same guard, so two racing acquirers can never both observe absence
/// - Nothing under the lock blocks or awaits
pub struct InMemoryStore {
    tables: Mutex<HashMap<String, Table>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(HashMap::new()),
        }
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Number of tables created so far
    pub fn table_count(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.lock().contains_key(table)
    }

    /// Number of entries in `table`, or None if it was never created
    pub fn entry_count(&self, table: &str) -> Option<usize> {
        self.tables.lock().get(table).map(Table::len)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TableStore for InMemoryStore {
    fn get(&self, table: &str, key: &str) -> Result<Attributes> {
        let tables = self.tables.lock();

        let store_table = tables
            .get(table)
            .ok_or_else(|| LockTableError::TableNotFound(table.to_string()))?;

        store_table
            .get(key)
            .cloned()
            .ok_or_else(|| LockTableError::EntryNotFound {
                table: table.to_string(),
                key: key.to_string(),
            })
    }

    fn put(
        &self,
        table: &str,
        key: &str,
        attributes: Attributes,
        require_absent: bool,
    ) -> Result<()> {
        let mut tables = self.tables.lock();

        // Table creation shares the critical section with the write
        let store_table = tables.entry(table.to_string()).or_default();

        if require_absent {
            if !store_table.insert_if_absent(key, attributes) {
                return Err(LockTableError::EntryAlreadyExists {
                    table: table.to_string(),
                    key: key.to_string(),
                });
            }
        } else {
            store_table.insert(key.to_string(), attributes);
        }

        Ok(())
    }

    fn delete(&self, table: &str, key: &str) -> Result<()> {
        let mut tables = self.tables.lock();

        let store_table = tables
            .get_mut(table)
            .ok_or_else(|| LockTableError::TableNotFound(table.to_string()))?;

        match store_table.remove(key) {
            Some(_) => Ok(()),
            None => Err(LockTableError::EntryNotFound {
                table: table.to_string(),
                key: key.to_string(),
            }),
        }
    }
}
