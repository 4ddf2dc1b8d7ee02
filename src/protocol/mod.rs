//! Protocol Module
//!
//! Wire shapes of the emulated DynamoDB item API.
//!
//! ## Request Format
//! ```text
//! POST /
//! X-Amz-Target: DynamoDB_20120810.PutItem
//! Content-Type: application/x-amz-json-1.0
//!
//! {"TableName":"locks","Item":{"LockID":{"S":"state/prod"},"Info":{"S":"..."}},
//!  "ConditionExpression":"attribute_not_exists(LockID)"}
//! ```
//!
//! ### Operations
//! - PutItem:    TableName + Item + optional ConditionExpression
//! - GetItem:    TableName + Key
//! - DeleteItem: TableName + Key
//!
//! ## Response Format
//! - Success: `{}` or `{"Item":{...}}` (GetItem with a match)
//! - Failure: `{"__type":"com.amazonaws.dynamodb.v20120810#<Name>","message":"..."}`

mod codec;
mod command;
mod condition;
mod response;

pub use codec::{decode_command, encode_error, encode_response, error_type, JSON_CONTENT_TYPE};
pub use command::{
    AttributeValue, Command, DeleteItemRequest, GetItemRequest, Item, Operation,
    PutItemRequest,
};
pub use condition::Condition;
pub use response::{ErrorBody, Response};
