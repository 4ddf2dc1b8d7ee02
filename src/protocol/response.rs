//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use super::Item;

/// A successful response
///
/// Serializes to `{}` unless it carries an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "Item", default, skip_serializing_if = "Option::is_none")]
    pub item: Option<Item>,
}

impl Response {
    /// Create an empty response
    pub fn empty() -> Self {
        Self { item: None }
    }

    /// Create a response carrying an item
    pub fn item(item: Item) -> Self {
        Self { item: Some(item) }
    }
}

/// Error body in the emulated API's format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(rename = "__type")]
    pub error_type: String,

    pub message: String,
}
