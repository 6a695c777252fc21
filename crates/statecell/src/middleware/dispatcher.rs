//! Dispatcher allows middleware to queue actions back into the store

use std::fmt;
use std::sync::mpsc::Sender;

/// Dispatcher for sending actions through the middleware chain
///
/// Actions dispatched here are not reduced immediately. They are queued and
/// re-enter the middleware chain from the beginning once the current
/// dispatch has finished, so middleware never recurses into the store.
pub struct Dispatcher<A> {
    action_tx: Sender<A>,
}

impl<A> Dispatcher<A> {
    /// Create a new dispatcher with the action channel
    pub fn new(action_tx: Sender<A>) -> Self {
        Self { action_tx }
    }

    /// Queue an action to be processed after the current dispatch
    pub fn dispatch(&self, action: A) {
        if let Err(e) = self.action_tx.send(action) {
            log::error!("Dispatcher: failed to send action: {}", e);
        }
    }
}

impl<A> Clone for Dispatcher<A> {
    fn clone(&self) -> Self {
        Self {
            action_tx: self.action_tx.clone(),
        }
    }
}

impl<A> fmt::Debug for Dispatcher<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher").finish_non_exhaustive()
    }
}
