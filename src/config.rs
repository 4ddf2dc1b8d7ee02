//! Configuration for locktable
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{LockTableError, Result};

/// Main configuration for a locktable server
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// HTTP listen address
    pub listen_addr: String,

    /// Largest accepted request body (in bytes)
    pub max_request_bytes: usize,

    /// Server certificate (PEM); HTTPS is served when this and `tls_key` are set
    pub tls_cert: Option<PathBuf>,

    /// Private key for `tls_cert` (PEM)
    pub tls_key: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// Attribute naming the lock key in items and key records
    pub key_attribute: String,

    /// API version prefix expected in the `X-Amz-Target` header
    pub target_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            max_request_bytes: 16 * 1024 * 1024, // 16 MB
            tls_cert: None,
            tls_key: None,
            key_attribute: "LockID".to_string(),
            target_prefix: "DynamoDB_20120810".to_string(),
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Whether the server terminates TLS itself
    pub fn is_tls_configured(&self) -> bool {
        self.tls_cert.is_some() && self.tls_key.is_some()
    }

    /// Check the values a server cannot start without
    pub fn validate(&self) -> Result<()> {
        if self.key_attribute.is_empty() {
            return Err(LockTableError::Config(
                "key attribute must not be empty".to_string(),
            ));
        }
        if self.target_prefix.is_empty() || self.target_prefix.contains('.') {
            return Err(LockTableError::Config(format!(
                "invalid target prefix: {:?}",
                self.target_prefix
            )));
        }
        if self.max_request_bytes == 0 {
            return Err(LockTableError::Config(
                "max request size must be greater than zero".to_string(),
            ));
        }
        if self.tls_cert.is_some() != self.tls_key.is_some() {
            return Err(LockTableError::Config(
                "TLS needs both a certificate and a private key".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the HTTP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the request body limit (in bytes)
    pub fn max_request_bytes(mut self, size: usize) -> Self {
        self.config.max_request_bytes = size;
        self
    }

    /// Serve HTTPS with the given PEM certificate and private key
    pub fn tls(mut self, cert: impl Into<PathBuf>, key: impl Into<PathBuf>) -> Self {
        self.config.tls_cert = Some(cert.into());
        self.config.tls_key = Some(key.into());
        self
    }

    /// Set the lock key attribute name
    pub fn key_attribute(mut self, name: impl Into<String>) -> Self {
        self.config.key_attribute = name.into();
        self
    }

    /// Set the `X-Amz-Target` prefix
    pub fn target_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.target_prefix = prefix.into();
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
