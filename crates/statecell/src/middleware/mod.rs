//! Middleware system
//!
//! Middleware sits between action dispatch and reducer execution, allowing
//! logging and other cross-cutting concerns to be layered onto a store
//! without the store knowing about them.
//!
//! ## Design
//!
//! ```text
//! Action → Middleware Chain → Reducer → State → Listeners
//! ```
//!
//! Each middleware can:
//! - Inspect actions and the state snapshot taken before the chain runs
//! - Queue new actions through the [`Dispatcher`]
//! - Block actions from reaching the reducer
//!
//! Middleware is attached with the [`apply_middleware`] enhancer.
//!
//! ## Example
//!
//! ```rust
//! use statecell::middleware::{apply_middleware, Dispatcher, LoggingMiddleware, Middleware};
//! use statecell::StoreBuilder;
//! use serde_json::{json, Value};
//!
//! struct DropPings;
//!
//! impl Middleware<i64, Value> for DropPings {
//!     fn handle(&mut self, action: &Value, _state: &i64, _dispatcher: &Dispatcher<Value>) -> bool {
//!         action["type"] != "PING"
//!     }
//! }
//!
//! let middleware: Vec<Box<dyn Middleware<i64, Value>>> =
//!     vec![Box::new(LoggingMiddleware::new()), Box::new(DropPings)];
//!
//! let store = StoreBuilder::new(|n: Option<&i64>, _action: &Value| n.copied().unwrap_or(0) + 1)
//!     .enhancer(apply_middleware(middleware))
//!     .build();
//!
//! store.dispatch(json!({ "type": "PING" })).unwrap();
//! assert_eq!(*store.get_state().unwrap(), 1);
//! ```

use crate::action::Action;
use crate::error::{Operation, StoreError};
use crate::factory::{StoreEnhancer, StoreFactory};
use crate::store::{BoxedReducer, Store};
use std::cell::RefCell;
use std::sync::mpsc::{self, Receiver};

mod dispatcher;
mod logging;

pub use dispatcher::Dispatcher;
pub use logging::LoggingMiddleware;

/// Middleware trait - handles actions before they reach the reducer
///
/// Middleware is called in order for each action. Each middleware can:
/// - Inspect the action and current state
/// - Queue follow-up actions via the Dispatcher
/// - Block the action from continuing (return false)
pub trait Middleware<S, A> {
    /// Handle an action before it reaches the reducer
    ///
    /// # Parameters
    /// - `action`: The action being dispatched
    /// - `state`: Current state (read-only)
    /// - `dispatcher`: Queues actions to run after this dispatch
    ///
    /// # Returns
    /// - `true`: Continue to next middleware/reducer
    /// - `false`: Block this action from continuing
    fn handle(&mut self, action: &A, state: &S, dispatcher: &Dispatcher<A>) -> bool;
}

impl<S, A, F> Middleware<S, A> for F
where
    F: FnMut(&A, &S, &Dispatcher<A>) -> bool,
{
    fn handle(&mut self, action: &A, state: &S, dispatcher: &Dispatcher<A>) -> bool {
        self(action, state, dispatcher)
    }
}

/// Ordered middleware in front of a store
pub(crate) struct MiddlewareChain<S, A> {
    middleware: Vec<RefCell<Box<dyn Middleware<S, A>>>>,
    dispatcher: Dispatcher<A>,
    pending: Receiver<A>,
    next: Store<S, A>,
}

impl<S: 'static, A: Action + 'static> MiddlewareChain<S, A> {
    fn new(middleware: Vec<Box<dyn Middleware<S, A>>>, next: Store<S, A>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            middleware: middleware.into_iter().map(RefCell::new).collect(),
            dispatcher: Dispatcher::new(tx),
            pending: rx,
            next,
        }
    }

    /// Process an action through the chain, then the wrapped store
    ///
    /// `store` is the outer handle, queued actions re-enter the full chain
    /// through it once this dispatch is done.
    pub(crate) fn dispatch(&self, store: &Store<S, A>, action: A) -> Result<A, StoreError> {
        action.validate()?;
        if store.is_dispatching() {
            return Err(StoreError::reentrant(Operation::Dispatch));
        }
        let state = store.get_state()?;
        let pending = PendingQueue::new(&self.pending);

        let mut should_reduce = true;
        for middleware in &self.middleware {
            let Ok(mut middleware) = middleware.try_borrow_mut() else {
                log::warn!("Middleware re-entered while handling {:?}, skipping it", action);
                continue;
            };
            if !middleware.handle(&action, &state, &self.dispatcher) {
                should_reduce = false;
                break;
            }
        }

        let action = if should_reduce {
            self.next.dispatch(action)?
        } else {
            log::trace!("Action consumed by middleware: {:?}", action);
            action
        };

        // Actions queued by middleware re-enter the chain from the beginning
        while let Some(queued) = pending.pop() {
            if let Err(e) = store.dispatch(queued) {
                log::warn!("Queued action rejected: {}", e);
            }
        }

        Ok(action)
    }
}

/// Follow-up actions queued during one dispatch
///
/// Whatever is still queued when this drops belongs to a dispatch that
/// failed or unwound, and is discarded.
struct PendingQueue<'a, A> {
    rx: &'a Receiver<A>,
}

impl<'a, A> PendingQueue<'a, A> {
    fn new(rx: &'a Receiver<A>) -> Self {
        Self { rx }
    }

    fn pop(&self) -> Option<A> {
        self.rx.try_recv().ok()
    }
}

impl<A> Drop for PendingQueue<'_, A> {
    fn drop(&mut self) {
        let mut discarded = 0;
        while self.rx.try_recv().is_ok() {
            discarded += 1;
        }
        if discarded > 0 {
            log::debug!("Discarded {} queued actions of an aborted dispatch", discarded);
        }
    }
}

/// Enhancer returned by [`apply_middleware`]
pub struct ApplyMiddleware<S, A> {
    middleware: Vec<Box<dyn Middleware<S, A>>>,
}

/// Build an enhancer that runs `middleware`, in order, in front of the store
pub fn apply_middleware<S, A>(middleware: Vec<Box<dyn Middleware<S, A>>>) -> ApplyMiddleware<S, A> {
    ApplyMiddleware { middleware }
}

impl<S: 'static, A: Action + 'static> StoreEnhancer<S, A> for ApplyMiddleware<S, A> {
    fn enhance(self: Box<Self>, next: Box<dyn StoreFactory<S, A>>) -> Box<dyn StoreFactory<S, A>> {
        let middleware = self.middleware;
        Box::new(
            move |reducer: BoxedReducer<S, A>, preloaded_state: Option<S>| {
                let store = next.create(reducer, preloaded_state);
                store.with_middleware(MiddlewareChain::new(middleware, store.clone()))
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StoreBuilder;
    use serde_json::{json, Value};
    use std::cell::Cell;
    use std::panic::{self, AssertUnwindSafe};
    use std::rc::Rc;

    fn counter(state: Option<&i64>, action: &Value) -> i64 {
        let count = state.copied().unwrap_or(0);
        match action["type"].as_str() {
            Some("INCREMENT") => count + 1,
            Some("DOUBLE") => count * 2,
            _ => count,
        }
    }

    fn chain(middleware: Vec<Box<dyn Middleware<i64, Value>>>) -> ApplyMiddleware<i64, Value> {
        apply_middleware(middleware)
    }

    struct TestMiddleware {
        called: Rc<Cell<usize>>,
        pass: bool,
    }

    impl Middleware<i64, Value> for TestMiddleware {
        fn handle(&mut self, _action: &Value, _state: &i64, _dispatcher: &Dispatcher<Value>) -> bool {
            self.called.set(self.called.get() + 1);
            self.pass
        }
    }

    #[test]
    fn test_middleware_passes_action_to_reducer() {
        let called = Rc::new(Cell::new(0));
        let store = StoreBuilder::new(counter)
            .enhancer(chain(vec![Box::new(TestMiddleware {
                called: Rc::clone(&called),
                pass: true,
            })]))
            .build();

        store.dispatch(json!({ "type": "INCREMENT" })).unwrap();

        assert_eq!(called.get(), 1);
        assert_eq!(*store.get_state().unwrap(), 1);
    }

    #[test]
    fn test_middleware_can_consume_action() {
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));
        let store = StoreBuilder::new(counter)
            .enhancer(chain(vec![
                Box::new(TestMiddleware {
                    called: Rc::clone(&first),
                    pass: false,
                }),
                Box::new(TestMiddleware {
                    called: Rc::clone(&second),
                    pass: true,
                }),
            ]))
            .build();
        let notified = Rc::new(Cell::new(0));
        let _unsubscribe = {
            let notified = Rc::clone(&notified);
            store.subscribe(move || notified.set(notified.get() + 1)).unwrap()
        };

        let returned = store.dispatch(json!({ "type": "INCREMENT" })).unwrap();

        assert_eq!(returned, json!({ "type": "INCREMENT" }));
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);
        assert_eq!(*store.get_state().unwrap(), 0);
        assert_eq!(notified.get(), 0);
    }

    #[test]
    fn test_queued_actions_run_after_dispatch() {
        let seen_states = Rc::new(RefCell::new(Vec::new()));
        let doubler = {
            let seen_states = Rc::clone(&seen_states);
            move |action: &Value, state: &i64, dispatcher: &Dispatcher<Value>| {
                seen_states.borrow_mut().push(*state);
                if action["type"] == "INCREMENT" {
                    dispatcher.dispatch(json!({ "type": "DOUBLE" }));
                }
                true
            }
        };
        let store = StoreBuilder::new(counter)
            .preloaded_state(1)
            .enhancer(chain(vec![Box::new(doubler)]))
            .build();

        store.dispatch(json!({ "type": "INCREMENT" })).unwrap();

        // 1 -> INCREMENT -> 2 -> DOUBLE -> 4
        assert_eq!(*store.get_state().unwrap(), 4);
        assert_eq!(*seen_states.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_queued_actions_dropped_when_reducer_panics() {
        let reducer = |state: Option<&i64>, action: &Value| {
            let count = state.copied().unwrap_or(0);
            match action["type"].as_str() {
                Some("BOOM") => panic!("reducer failed"),
                Some("INCREMENT") => count + 1,
                Some("FOLLOW_UP") => count + 100,
                _ => count,
            }
        };
        let follow_up = |action: &Value, _state: &i64, dispatcher: &Dispatcher<Value>| {
            if action["type"] == "BOOM" {
                dispatcher.dispatch(json!({ "type": "FOLLOW_UP" }));
            }
            true
        };
        let store = StoreBuilder::new(reducer)
            .enhancer(chain(vec![Box::new(follow_up)]))
            .build();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            store.dispatch(json!({ "type": "BOOM" }))
        }));
        assert!(result.is_err());
        assert_eq!(*store.get_state().unwrap(), 0);

        store.dispatch(json!({ "type": "INCREMENT" })).unwrap();
        assert_eq!(*store.get_state().unwrap(), 1);
    }

    #[test]
    fn test_middleware_does_not_see_invalid_actions() {
        let called = Rc::new(Cell::new(0));
        let store = StoreBuilder::new(counter)
            .enhancer(chain(vec![Box::new(TestMiddleware {
                called: Rc::clone(&called),
                pass: true,
            })]))
            .build();

        assert_eq!(store.dispatch(json!(42)), Err(StoreError::NotPlainRecord));
        assert_eq!(store.dispatch(json!({})), Err(StoreError::MissingActionType));
        assert_eq!(called.get(), 0);
    }

    #[test]
    fn test_nested_enhancers_both_run() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let tagger = |tag: &'static str| {
            let order = Rc::clone(&order);
            move |_action: &Value, _state: &i64, _dispatcher: &Dispatcher<Value>| {
                order.borrow_mut().push(tag);
                true
            }
        };
        let inner = chain(vec![Box::new(tagger("inner"))]);
        let outer = chain(vec![Box::new(tagger("outer"))]);
        let store = StoreBuilder::new(counter)
            .enhancer(move |next: Box<dyn StoreFactory<i64, Value>>| {
                Box::new(outer).enhance(Box::new(inner).enhance(next))
            })
            .build();

        store.dispatch(json!({ "type": "INCREMENT" })).unwrap();

        assert_eq!(*order.borrow(), vec!["outer", "inner"]);
        assert_eq!(*store.get_state().unwrap(), 1);
    }
}
