//! HTTP Client
//!
//! Speaks the item API to a running server.

use serde::Serialize;

use super::TARGET_HEADER;
use crate::error::{LockTableError, Result};
use crate::protocol::{
    DeleteItemRequest, ErrorBody, GetItemRequest, Item, Operation, PutItemRequest, Response,
    JSON_CONTENT_TYPE,
};

/// Client for a locktable (or any compatible) endpoint
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,

    /// Base URL, e.g. `http://127.0.0.1:8000`
    endpoint: String,

    target_prefix: String,

    key_attribute: String,
}

impl Client {
    /// Create a client with the default target prefix and key attribute
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let defaults = crate::Config::default();
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            endpoint: endpoint.into(),
            target_prefix: defaults.target_prefix,
            key_attribute: defaults.key_attribute,
        })
    }

    pub fn with_target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.target_prefix = prefix.into();
        self
    }

    pub fn with_key_attribute(mut self, name: impl Into<String>) -> Self {
        self.key_attribute = name.into();
        self
    }

    /// Write an item
    ///
    /// A failed `attribute_not_exists` condition comes back as
    /// `EntryAlreadyExists`.
    pub async fn put_item(&self, req: &PutItemRequest) -> Result<()> {
        let key = self.lock_id(&req.item);
        self.call(Operation::PutItem, &req.table_name, key, req)
            .await?;
        Ok(())
    }

    /// Read an item; `None` if there is none
    pub async fn get_item(&self, req: &GetItemRequest) -> Result<Option<Item>> {
        let key = self.lock_id(&req.key);
        let response = self
            .call(Operation::GetItem, &req.table_name, key, req)
            .await?;
        Ok(response.item)
    }

    /// Remove an item
    pub async fn delete_item(&self, req: &DeleteItemRequest) -> Result<()> {
        let key = self.lock_id(&req.key);
        self.call(Operation::DeleteItem, &req.table_name, key, req)
            .await?;
        Ok(())
    }

    pub fn key_attribute(&self) -> &str {
        &self.key_attribute
    }

    fn lock_id<'a>(&self, record: &'a Item) -> &'a str {
        record
            .get(&self.key_attribute)
            .map(|value| value.s.as_str())
            .unwrap_or_default()
    }

    async fn call<T: Serialize>(
        &self,
        operation: Operation,
        table: &str,
        key: &str,
        body: &T,
    ) -> Result<Response> {
        let payload = serde_json::to_vec(body)?;

        let response = self
            .http
            .post(&self.endpoint)
            .header(TARGET_HEADER, operation.target(&self.target_prefix))
            .header(reqwest::header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&bytes)?);
        }

        let message = match serde_json::from_slice::<ErrorBody>(&bytes) {
            Ok(error) => error.message,
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        };

        tracing::debug!("{} returned {}: {}", operation, status, message);

        Err(match status.as_u16() {
            400 => LockTableError::Validation(message),
            404 => LockTableError::EntryNotFound {
                table: table.to_string(),
                key: key.to_string(),
            },
            409 => LockTableError::EntryAlreadyExists {
                table: table.to_string(),
                key: key.to_string(),
            },
            code => LockTableError::UnexpectedResponse {
                status: code,
                message,
            },
        })
    }
}
