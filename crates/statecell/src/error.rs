//! Errors raised by the store

use std::fmt;
use thiserror::Error;

/// Store operation that was attempted while a reducer was executing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GetState,
    Subscribe,
    Unsubscribe,
    Dispatch,
    ReplaceReducer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::GetState => "getState",
            Operation::Subscribe => "subscribe",
            Operation::Unsubscribe => "unsubscribe",
            Operation::Dispatch => "dispatch",
            Operation::ReplaceReducer => "replaceReducer",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while using a [`Store`](crate::Store).
///
/// Every error is returned to the immediate caller. The store never retries
/// or recovers on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{}", reentrant_message(*operation))]
    Reentrant { operation: Operation },

    #[error("Actions must be plain objects. Use custom middleware for async actions.")]
    NotPlainRecord,

    #[error("Actions may not have an undefined \"type\" property. Have you misspelled a constant?")]
    MissingActionType,
}

impl StoreError {
    pub(crate) fn reentrant(operation: Operation) -> Self {
        StoreError::Reentrant { operation }
    }

    /// True for errors caused by calling into the store from a reducer
    pub fn is_reentrant(&self) -> bool {
        matches!(self, StoreError::Reentrant { .. })
    }

    /// True for errors caused by a malformed action
    pub fn is_action_shape(&self) -> bool {
        matches!(
            self,
            StoreError::NotPlainRecord | StoreError::MissingActionType
        )
    }
}

fn reentrant_message(operation: Operation) -> &'static str {
    match operation {
        Operation::GetState => {
            "You may not call store.getState() while the reducer is executing. \
             The reducer has already received the state as an argument."
        }
        Operation::Subscribe => {
            "You may not call store.subscribe() while the reducer is executing. \
             Subscribe from outside the reducer and read the state in the listener."
        }
        Operation::Unsubscribe => {
            "You may not unsubscribe from a store listener while the reducer is executing."
        }
        Operation::Dispatch => "Reducers may not dispatch actions.",
        Operation::ReplaceReducer => {
            "You may not replace the reducer while the reducer is executing."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reentrant_messages() {
        let err = StoreError::reentrant(Operation::Dispatch);
        assert_eq!(err.to_string(), "Reducers may not dispatch actions.");
        assert!(err.is_reentrant());
        assert!(!err.is_action_shape());

        let err = StoreError::reentrant(Operation::GetState);
        assert!(err.to_string().contains("store.getState()"));
    }

    #[test]
    fn test_action_shape_errors() {
        assert!(StoreError::NotPlainRecord.is_action_shape());
        assert!(StoreError::MissingActionType.is_action_shape());
        assert!(StoreError::MissingActionType
            .to_string()
            .contains("undefined \"type\""));
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::ReplaceReducer.to_string(), "replaceReducer");
        assert_eq!(Operation::Unsubscribe.to_string(), "unsubscribe");
    }
}
