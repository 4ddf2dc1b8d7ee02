//! Command definitions
//!
//! Represents item requests from clients.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LockTableError, Result};

/// A typed attribute value; only the string form is supported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttributeValue {
    #[serde(rename = "S")]
    pub s: String,
}

impl AttributeValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self { s: value.into() }
    }
}

/// Attribute name to typed value, as carried on the wire
pub type Item = BTreeMap<String, AttributeValue>;

/// Operation named by the `X-Amz-Target` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    PutItem,
    GetItem,
    DeleteItem,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::PutItem => "PutItem",
            Operation::GetItem => "GetItem",
            Operation::DeleteItem => "DeleteItem",
        }
    }

    /// Parse a `<prefix>.<Operation>` target token
    pub fn from_target(target: &str, prefix: &str) -> Result<Self> {
        let unknown = || LockTableError::UnknownOperation(target.to_string());

        let (target_prefix, name) = target.split_once('.').ok_or_else(unknown)?;
        if target_prefix != prefix {
            return Err(unknown());
        }

        match name {
            "PutItem" => Ok(Operation::PutItem),
            "GetItem" => Ok(Operation::GetItem),
            "DeleteItem" => Ok(Operation::DeleteItem),
            _ => Err(unknown()),
        }
    }

    /// Format as a target token
    pub fn target(&self, prefix: &str) -> String {
        format!("{}.{}", prefix, self.name())
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// PutItem request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutItemRequest {
    pub table_name: String,

    pub item: Item,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_expression: Option<String>,
}

/// GetItem request body
///
/// Fields such as `ConsistentRead` and `ProjectionExpression` are accepted
/// and ignored: every read is consistent and returns the whole entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetItemRequest {
    pub table_name: String,

    pub key: Item,
}

/// DeleteItem request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteItemRequest {
    pub table_name: String,

    pub key: Item,
}

/// A parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Write an item, optionally only if absent
    PutItem(PutItemRequest),

    /// Read an item by key
    GetItem(GetItemRequest),

    /// Remove an item by key
    DeleteItem(DeleteItemRequest),
}

impl Command {
    /// Get the operation
    pub fn operation(&self) -> Operation {
        match self {
            Command::PutItem(_) => Operation::PutItem,
            Command::GetItem(_) => Operation::GetItem,
            Command::DeleteItem(_) => Operation::DeleteItem,
        }
    }

    pub fn table_name(&self) -> &str {
        match self {
            Command::PutItem(req) => &req.table_name,
            Command::GetItem(req) => &req.table_name,
            Command::DeleteItem(req) => &req.table_name,
        }
    }
}
