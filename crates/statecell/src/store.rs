use crate::action::Action;
use crate::error::{Operation, StoreError};
use crate::middleware::MiddlewareChain;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::{Rc, Weak};

/// Shared, type-erased reducer held by a store
pub type BoxedReducer<S, A> = Rc<dyn Fn(Option<&S>, &A) -> S>;

type Listener = Rc<dyn Fn()>;

/// Key a listener is registered under
///
/// Ids are handed out from a per-store counter and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

/// Store - holds the current state and runs the reducer loop
///
/// The store follows the Redux pattern:
/// - A single current state, replaced (never mutated) on each dispatch
/// - Pure reducers compute the next state from the current one and an action
/// - Listeners are notified after every successful dispatch
///
/// `Store` is a cheap handle: clones share the same state, reducer and
/// listeners. It is meant for a single thread of control, and the
/// reentrancy rules (no `get_state`, `subscribe`, `unsubscribe`, `dispatch`
/// or `replace_reducer` while a reducer runs) are enforced by rejecting the
/// call rather than by locking.
///
/// # Example
///
/// ```rust
/// use statecell::Store;
/// use serde_json::{json, Value};
///
/// let store = Store::new(|count: Option<&i64>, action: &Value| {
///     let count = count.copied().unwrap_or(0);
///     match action["type"].as_str() {
///         Some("INCREMENT") => count + 1,
///         _ => count,
///     }
/// });
///
/// store.dispatch(json!({ "type": "INCREMENT" })).unwrap();
/// assert_eq!(*store.get_state().unwrap(), 1);
/// ```
pub struct Store<S, A> {
    core: Rc<StoreCore<S, A>>,
    middleware: Option<Rc<MiddlewareChain<S, A>>>,
}

impl<S: 'static, A: Action + 'static> Store<S, A> {
    /// Create a store, bootstrapping the state with `reducer(None, &A::init())`
    pub fn new(reducer: impl Fn(Option<&S>, &A) -> S + 'static) -> Self {
        Self::from_parts(Rc::new(reducer), None)
    }

    /// Create a store with a preloaded state
    ///
    /// The reducer is not called until the first dispatch.
    pub fn with_state(reducer: impl Fn(Option<&S>, &A) -> S + 'static, state: S) -> Self {
        Self::from_parts(Rc::new(reducer), Some(state))
    }

    pub(crate) fn from_parts(reducer: BoxedReducer<S, A>, preloaded_state: Option<S>) -> Self {
        Self {
            core: Rc::new(StoreCore::new(reducer, preloaded_state)),
            middleware: None,
        }
    }

    /// A handle on the same store whose dispatches run through `chain` first
    pub(crate) fn with_middleware(&self, chain: MiddlewareChain<S, A>) -> Self {
        Self {
            core: Rc::clone(&self.core),
            middleware: Some(Rc::new(chain)),
        }
    }

    /// Get the current state
    pub fn get_state(&self) -> Result<Rc<S>, StoreError> {
        self.core.get_state()
    }

    /// Register a listener, called after every successful dispatch
    ///
    /// Listeners registered or removed while a notification round is running
    /// take effect from the next dispatch on.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Result<Unsubscribe, StoreError> {
        self.core.subscribe(Rc::new(listener))
    }

    /// Dispatch an action
    ///
    /// Returns the action unchanged so calls can be chained. If the reducer
    /// panics the panic propagates, the state keeps its previous value and
    /// the store stays usable.
    pub fn dispatch(&self, action: A) -> Result<A, StoreError> {
        match &self.middleware {
            Some(chain) => chain.dispatch(self, action),
            None => self.core.dispatch(action),
        }
    }

    /// Swap the reducer used by subsequent dispatches
    ///
    /// Neither dispatches nor notifies. The current state is handed as-is to
    /// the new reducer on its first call.
    pub fn replace_reducer(
        &self,
        next_reducer: impl Fn(Option<&S>, &A) -> S + 'static,
    ) -> Result<(), StoreError> {
        self.core.replace_reducer(Rc::new(next_reducer))
    }

    /// Reader for the current state that does not keep the store alive
    ///
    /// Yields `None` once the store is gone or while a reducer is executing.
    pub(crate) fn state_reader(&self) -> impl Fn() -> Option<Rc<S>> + use<S, A> {
        let core = Rc::downgrade(&self.core);
        move || core.upgrade()?.get_state().ok()
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.core.listeners.borrow().len()
    }

    /// Whether a reducer is currently executing
    pub fn is_dispatching(&self) -> bool {
        self.core.dispatching.get()
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            core: Rc::clone(&self.core),
            middleware: self.middleware.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("listeners", &self.core.listeners.borrow().len())
            .field("dispatching", &self.core.dispatching.get())
            .field("middleware", &self.middleware.is_some())
            .finish()
    }
}

/// Capability returned by [`Store::subscribe`], removes its listener
///
/// Holds only a weak reference: it never keeps the store alive, and calling
/// it after the store is gone does nothing.
#[derive(Clone)]
pub struct Unsubscribe {
    registry: Weak<dyn ListenerRegistry>,
    id: ListenerId,
}

impl Unsubscribe {
    /// Remove the listener
    ///
    /// Idempotent, except that it fails while a reducer is executing.
    pub fn unsubscribe(&self) -> Result<(), StoreError> {
        match self.registry.upgrade() {
            Some(registry) => registry.remove_listener(self.id),
            None => Ok(()),
        }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe").field("id", &self.id).finish()
    }
}

trait ListenerRegistry {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError>;
}

struct StoreCore<S, A> {
    state: RefCell<Rc<S>>,
    reducer: RefCell<BoxedReducer<S, A>>,
    listeners: RefCell<BTreeMap<ListenerId, Listener>>,
    next_listener_id: Cell<u64>,
    dispatching: Cell<bool>,
}

impl<S: 'static, A: Action + 'static> StoreCore<S, A> {
    fn new(reducer: BoxedReducer<S, A>, preloaded_state: Option<S>) -> Self {
        let state = match preloaded_state {
            Some(state) => state,
            None => reducer(None, &A::init()),
        };

        Self {
            state: RefCell::new(Rc::new(state)),
            reducer: RefCell::new(reducer),
            listeners: RefCell::new(BTreeMap::new()),
            next_listener_id: Cell::new(0),
            dispatching: Cell::new(false),
        }
    }

    fn ensure_idle(&self, operation: Operation) -> Result<(), StoreError> {
        if self.dispatching.get() {
            return Err(StoreError::reentrant(operation));
        }
        Ok(())
    }

    fn get_state(&self) -> Result<Rc<S>, StoreError> {
        self.ensure_idle(Operation::GetState)?;
        Ok(Rc::clone(&self.state.borrow()))
    }

    fn subscribe(self: &Rc<Self>, listener: Listener) -> Result<Unsubscribe, StoreError> {
        self.ensure_idle(Operation::Subscribe)?;

        let id = ListenerId(self.next_listener_id.get());
        self.next_listener_id.set(id.0 + 1);
        self.listeners.borrow_mut().insert(id, listener);
        log::trace!("Listener {:?} subscribed", id);

        let registry: Rc<dyn ListenerRegistry> = self.clone();
        Ok(Unsubscribe {
            registry: Rc::downgrade(&registry),
            id,
        })
    }

    fn dispatch(&self, action: A) -> Result<A, StoreError> {
        action.validate()?;
        self.ensure_idle(Operation::Dispatch)?;

        {
            let _guard = DispatchGuard::enter(&self.dispatching);
            let reducer = self.reducer.borrow().clone();
            let previous = self.state.borrow().clone();
            let next = reducer(Some(&*previous), &action);
            *self.state.borrow_mut() = Rc::new(next);
        }

        self.notify();
        Ok(action)
    }

    /// Call every listener registered at the start of the round, once each
    fn notify(&self) {
        let snapshot: Vec<Listener> = self.listeners.borrow().values().cloned().collect();
        for listener in snapshot {
            listener();
        }
    }

    fn replace_reducer(&self, next_reducer: BoxedReducer<S, A>) -> Result<(), StoreError> {
        self.ensure_idle(Operation::ReplaceReducer)?;
        *self.reducer.borrow_mut() = next_reducer;
        log::trace!("Reducer replaced");
        Ok(())
    }
}

impl<S, A> ListenerRegistry for StoreCore<S, A> {
    fn remove_listener(&self, id: ListenerId) -> Result<(), StoreError> {
        if self.dispatching.get() {
            return Err(StoreError::reentrant(Operation::Unsubscribe));
        }
        if self.listeners.borrow_mut().remove(&id).is_some() {
            log::trace!("Listener {:?} unsubscribed", id);
        }
        Ok(())
    }
}

/// Marks a dispatch as in flight and clears the mark on every exit path
struct DispatchGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> DispatchGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
