//! Condition expressions
//!
//! Only one form is understood: `attribute_not_exists(<attribute>)`.

use crate::error::{LockTableError, Result};

const NOT_EXISTS_FUNCTION: &str = "attribute_not_exists";

/// Precondition attached to a put
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Unconditional write
    None,

    /// Write only if no entry exists; `attribute` is the one named in the
    /// expression
    RequireAbsent { attribute: String },
}

impl Condition {
    /// Parse an optional condition expression
    ///
    /// A missing or blank expression means no condition. Anything that is not
    /// a single `attribute_not_exists(name)` call is rejected.
    pub fn parse(expression: Option<&str>) -> Result<Self> {
        let expression = match expression.map(str::trim) {
            None | Some("") => return Ok(Condition::None),
            Some(expr) => expr,
        };

        let invalid =
            || LockTableError::validation(format!("Invalid condition expression: {}", expression));

        let arguments = expression
            .strip_prefix(NOT_EXISTS_FUNCTION)
            .map(str::trim_start)
            .and_then(|rest| rest.strip_prefix('('))
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(invalid)?;

        let attribute = arguments.trim();
        if !is_attribute_name(attribute) {
            return Err(invalid());
        }

        Ok(Condition::RequireAbsent {
            attribute: attribute.to_string(),
        })
    }

    pub fn requires_absent(&self) -> bool {
        matches!(self, Condition::RequireAbsent { .. })
    }
}

/// Bare attribute name; document paths (`a.b`, `a[0]`) and placeholders
/// (`#name`) are not understood
fn is_attribute_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
