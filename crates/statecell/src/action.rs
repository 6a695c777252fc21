//! Action trait
//!
//! Actions are the only way to change the state held by a store. A store
//! accepts any type implementing [`Action`], as long as the value is a plain
//! record and carries a type discriminator.
//!
//! Typed enums satisfy the shape check by construction and usually return
//! their variant name as the discriminator. Dynamically-shaped actions are
//! supported through the `serde_json::Value` implementation.

use crate::error::StoreError;
use serde_json::{json, Value};
use std::borrow::Cow;
use std::fmt::Debug;

/// Discriminator of the action passed to the reducer when a store bootstraps
pub const INIT_ACTION_TYPE: &str = "@@statecell/INIT";

/// A message describing a state change
pub trait Action: Debug {
    /// The no-op action used for the bootstrap reducer call
    fn init() -> Self
    where
        Self: Sized;

    /// Whether the value is a plain structured record
    ///
    /// Typed actions always are. Only dynamic representations need to
    /// override this.
    fn is_plain_record(&self) -> bool {
        true
    }

    /// The type discriminator, `None` when absent
    fn action_type(&self) -> Option<Cow<'_, str>>;

    /// Check the action shape before it is handed to a reducer
    fn validate(&self) -> Result<(), StoreError> {
        if !self.is_plain_record() {
            return Err(StoreError::NotPlainRecord);
        }
        if self.action_type().is_none() {
            return Err(StoreError::MissingActionType);
        }
        Ok(())
    }
}

impl Action for Value {
    fn init() -> Self {
        json!({ "type": INIT_ACTION_TYPE })
    }

    fn is_plain_record(&self) -> bool {
        self.is_object()
    }

    fn action_type(&self) -> Option<Cow<'_, str>> {
        match self.get("type")? {
            Value::String(kind) => Some(Cow::Borrowed(kind.as_str())),
            other => Some(Cow::Owned(other.to_string())),
        }
    }
}
