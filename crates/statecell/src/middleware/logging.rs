//! LoggingMiddleware - logs all actions for debugging

use super::{Dispatcher, Middleware};
use crate::action::Action;

/// LoggingMiddleware - logs every action passing through the chain
///
/// The store's own bootstrap action never reaches middleware, so everything
/// logged here was dispatched by a caller.
#[derive(Debug, Default)]
pub struct LoggingMiddleware {
    logged: usize,
}

impl LoggingMiddleware {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions logged so far
    pub fn logged(&self) -> usize {
        self.logged
    }
}

impl<S, A: Action> Middleware<S, A> for LoggingMiddleware {
    fn handle(&mut self, action: &A, _state: &S, _dispatcher: &Dispatcher<A>) -> bool {
        self.logged += 1;
        match action.action_type() {
            Some(kind) => log::debug!("Action #{} {}: {:?}", self.logged, kind, action),
            None => log::debug!("Action #{}: {:?}", self.logged, action),
        }
        // Always continue to next middleware
        true
    }
}
