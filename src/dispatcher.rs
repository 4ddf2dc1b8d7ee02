//! Dispatcher Module
//!
//! Turns item requests into table store calls.
//!
//! ## Responsibilities
//! - Validate the lock key attribute and the condition expression
//! - Strip the lock key from stored and returned attributes
//! - Decide which store failures are errors for each operation

use std::sync::Arc;

use crate::config::Config;
use crate::error::{LockTableError, Result};
use crate::protocol::{
    AttributeValue, Command, Condition, DeleteItemRequest, GetItemRequest, Item,
    PutItemRequest, Response,
};
use crate::store::{Attributes, InMemoryStore, TableStore};

/// Stateless request dispatcher over a shared table store
///
/// Outcomes per operation:
///
/// | Operation  | Store failure                      | Dispatcher result       |
/// |------------|------------------------------------|-------------------------|
/// | PutItem    | `EntryAlreadyExists`               | conflict error          |
/// | GetItem    | `TableNotFound` / `EntryNotFound`  | empty response          |
/// | DeleteItem | `TableNotFound` / `EntryNotFound`  | not-found error         |
///
/// Validation failures are reported before the store is touched.
#[derive(Clone)]
pub struct Dispatcher {
    store: Arc<dyn TableStore>,

    /// Attribute carrying the lock key (`LockID` by default)
    key_attribute: String,
}

impl Dispatcher {
    /// Create a dispatcher over `store`
    pub fn new(store: Arc<dyn TableStore>, key_attribute: impl Into<String>) -> Self {
        Self {
            store,
            key_attribute: key_attribute.into(),
        }
    }

    /// Create a dispatcher over a fresh in-memory store
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), config.key_attribute.clone())
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::PutItem(req) => {
                self.put_item(&req)?;
                Ok(Response::empty())
            }
            Command::GetItem(req) => Ok(match self.get_item(&req)? {
                Some(item) => Response::item(item),
                None => Response::empty(),
            }),
            Command::DeleteItem(req) => {
                self.delete_item(&req)?;
                Ok(Response::empty())
            }
        }
    }

    /// Write an item, honoring an `attribute_not_exists` condition
    pub fn put_item(&self, req: &PutItemRequest) -> Result<()> {
        let condition = Condition::parse(req.condition_expression.as_deref())?;
        if let Condition::RequireAbsent { attribute } = &condition {
            if *attribute != self.key_attribute {
                return Err(LockTableError::validation(format!(
                    "Condition expression must be on {}",
                    self.key_attribute
                )));
            }
        }

        let lock_id = self.lock_id(&req.item)?;
        let attributes = self.strip_key(&req.item);

        match self.store.put(
            &req.table_name,
            lock_id,
            attributes,
            condition.requires_absent(),
        ) {
            Ok(()) => {
                if condition.requires_absent() {
                    tracing::debug!("Lock {} acquired in {}", lock_id, req.table_name);
                } else {
                    tracing::debug!("Item {} written in {}", lock_id, req.table_name);
                }
                Ok(())
            }
            Err(e) => {
                if e.is_conflict() {
                    tracing::debug!("Lock {} already held in {}", lock_id, req.table_name);
                }
                Err(e)
            }
        }
    }

    /// Read an item; absence is `None`, not an error
    pub fn get_item(&self, req: &GetItemRequest) -> Result<Option<Item>> {
        let lock_id = self.lock_id(&req.key)?;

        match self.store.get(&req.table_name, lock_id) {
            Ok(attributes) => Ok(Some(self.to_item(attributes))),
            Err(e) if e.is_not_found() => {
                tracing::trace!("GetItem miss: {}", e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Remove an item; absence is reported as not found
    pub fn delete_item(&self, req: &DeleteItemRequest) -> Result<()> {
        let lock_id = self.lock_id(&req.key)?;

        self.store.delete(&req.table_name, lock_id)?;
        tracing::debug!("Lock {} released in {}", lock_id, req.table_name);
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn lock_id<'a>(&self, record: &'a Item) -> Result<&'a str> {
        record
            .get(&self.key_attribute)
            .map(|value| value.s.as_str())
            .ok_or_else(|| {
                LockTableError::validation(format!("{} is missing", self.key_attribute))
            })
    }

    fn strip_key(&self, item: &Item) -> Attributes {
        item.iter()
            .filter(|(name, _)| **name != self.key_attribute)
            .map(|(name, value)| (name.clone(), value.s.clone()))
            .collect()
    }

    fn to_item(&self, attributes: Attributes) -> Item {
        attributes
            .into_iter()
            .filter(|(name, _)| *name != self.key_attribute)
            .map(|(name, value)| (name, AttributeValue::string(value)))
            .collect()
    }
}
