use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use parking_lot::Mutex;

type Entries<T> = RefCell<Vec<(usize, Rc<T>)>>;

/// An ordered list of tap callbacks, each identified by a unique token.
pub struct TapRegistry<T: ?Sized> {
    counter: Mutex<usize>,
    entries: Rc<Entries<T>>,
}

impl<T: ?Sized + 'static> TapRegistry<T> {
    pub fn new() -> Self {
        Self {
            counter: Mutex::new(0),
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Append a callback, returns the token to remove it again.
    pub fn register(&self, callback: Rc<T>) -> DisposeToken {
        let token = {
            let mut counter = self.counter.lock();
            *counter += 1;
            *counter
        };
        self.entries.borrow_mut().push((token, callback));

        let entries = Rc::downgrade(&self.entries);
        DisposeToken {
            token,
            on_dispose: Rc::new(move || Self::remove(&entries, token)),
        }
    }

    fn remove(entries: &Weak<Entries<T>>, token: usize) {
        let Some(entries) = entries.upgrade() else {
            return;
        };
        let mut entries = entries.borrow_mut();
        if let Some(ix) = entries.iter().position(|(id, _)| *id == token) {
            entries.remove(ix);
        }
    }

    /// The registered callbacks in registration order.
    ///
    /// Callbacks are cloned out, so they may register or dispose while being invoked.
    pub fn snapshot(&self) -> Vec<Rc<T>> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect()
    }

    pub fn tokens(&self) -> Vec<usize> {
        self.entries.borrow().iter().map(|(id, _)| *id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Drop every callback, to break cycles a callback may hold back to its owner.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<T: ?Sized + 'static> Default for TapRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Returned by `on_tap`, call [`DisposeToken::dispose`] to unregister the callback.
///
/// Dropping the token keeps the callback registered.
#[derive(Clone)]
pub struct DisposeToken {
    token: usize,
    on_dispose: Rc<dyn Fn()>,
}

impl DisposeToken {
    pub fn id(&self) -> usize {
        self.token
    }

    /// Remove the callback, it is safe to call this more than once or after the button is gone.
    pub fn dispose(&self) {
        (self.on_dispose)()
    }
}

impl fmt::Debug for DisposeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DisposeToken").field(&self.token).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress_button::{ButtonState, ProgressButtonModel};

    type Callback = dyn Fn(ButtonState);

    fn recorder(
        calls: &Rc<RefCell<Vec<(&'static str, ButtonState)>>>,
        name: &'static str,
    ) -> Rc<Callback> {
        let calls = calls.clone();
        Rc::new(move |state: ButtonState| calls.borrow_mut().push((name, state)))
    }

    fn tap(model: &mut ProgressButtonModel, registry: &TapRegistry<Callback>) {
        let state = model.tap();
        for callback in registry.snapshot() {
            callback(state);
        }
    }

    #[test]
    fn test_tokens_increase() {
        let registry = TapRegistry::<Callback>::new();
        let a = registry.register(Rc::new(|_: ButtonState| {}));
        let b = registry.register(Rc::new(|_: ButtonState| {}));
        let c = registry.register(Rc::new(|_: ButtonState| {}));
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));

        b.dispose();
        let d = registry.register(Rc::new(|_: ButtonState| {}));
        assert_eq!(d.id(), 4);
        assert_eq!(registry.tokens(), vec![1, 3, 4]);
    }

    #[test]
    fn test_dispose_first_leaves_second() {
        let calls = Rc::new(RefCell::new(vec![]));
        let registry = TapRegistry::<Callback>::new();
        let mut model = ProgressButtonModel::new();
        model.attach();

        let first = registry.register(recorder(&calls, "first"));
        let _second = registry.register(recorder(&calls, "second"));

        first.dispose();
        tap(&mut model, &registry);
        assert_eq!(*calls.borrow(), vec![("second", ButtonState::Default)]);

        // Disposing again is a no-op.
        first.dispose();
        first.clone().dispose();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dispose_is_order_independent() {
        let registry = TapRegistry::<Callback>::new();
        let tokens: Vec<_> = (0..4)
            .map(|_| registry.register(Rc::new(|_: ButtonState| {})))
            .collect();

        tokens[2].dispose();
        tokens[0].dispose();
        tokens[3].dispose();
        assert_eq!(registry.tokens(), vec![2]);

        tokens[1].dispose();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_callbacks_get_state_at_tap_time() {
        let calls = Rc::new(RefCell::new(vec![]));
        let registry = TapRegistry::<Callback>::new();
        let mut model = ProgressButtonModel::new();
        model.attach();

        let _a = registry.register(recorder(&calls, "a"));
        model.resume();
        let _b = registry.register(recorder(&calls, "b"));
        model.suspend();

        tap(&mut model, &registry);
        assert_eq!(
            *calls.borrow(),
            vec![("a", ButtonState::Suspended), ("b", ButtonState::Suspended)]
        );

        calls.borrow_mut().clear();
        model.complete();
        tap(&mut model, &registry);
        assert_eq!(
            *calls.borrow(),
            vec![("a", ButtonState::Completed), ("b", ButtonState::Completed)]
        );
    }

    #[test]
    fn test_dispose_after_registry_dropped() {
        let registry = TapRegistry::<Callback>::new();
        let token = registry.register(Rc::new(|_: ButtonState| {}));
        drop(registry);

        token.dispose();
        token.dispose();
    }

    #[test]
    fn test_dispose_while_dispatching() {
        let registry = Rc::new(TapRegistry::<Callback>::new());
        let calls = Rc::new(RefCell::new(vec![]));
        let token: Rc<RefCell<Option<DisposeToken>>> = Rc::new(RefCell::new(None));

        let disposer = {
            let token = token.clone();
            let calls = calls.clone();
            Rc::new(move |state: ButtonState| {
                calls.borrow_mut().push(("self-disposing", state));
                if let Some(token) = token.borrow().as_ref() {
                    token.dispose();
                }
            })
        };
        *token.borrow_mut() = Some(registry.register(disposer));
        let _other = registry.register(recorder(&calls, "other"));

        for callback in registry.snapshot() {
            callback(ButtonState::InProgress);
        }
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_clear() {
        let registry = TapRegistry::<Callback>::new();
        let token = registry.register(Rc::new(|_: ButtonState| {}));
        registry.clear();
        assert!(registry.is_empty());
        token.dispose();
    }
}
