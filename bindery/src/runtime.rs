//! Runtime type aliases for shared ownership and interior mutability.
//!
//! The container compiles in two modes, selected by the `thread-safe` feature:
//!
//! - With `thread-safe` (default): `Arc`, `RwLock` and `Mutex`. The registry
//!   may be shared across threads and resolved concurrently.
//! - Without `thread-safe`: `Rc` and `RefCell`, cheaper and single-threaded.
//!
//! All container code is written against these aliases so the two modes stay
//! structurally identical.

#[cfg(feature = "thread-safe")]
use std::sync::{Arc, Mutex, RwLock};

#[cfg(not(feature = "thread-safe"))]
use std::{cell::RefCell, rc::Rc};

/// Shared handle to a resolved instance.
///
/// [`Arc<T>`] in thread-safe mode, [`Rc<T>`] otherwise. Every resolution
/// returns a `Shared<S>`; singleton bindings hand out clones of one handle,
/// per-request bindings hand out a fresh handle per call.
#[cfg(feature = "thread-safe")]
pub type Shared<T> = Arc<T>;
#[cfg(not(feature = "thread-safe"))]
pub type Shared<T> = Rc<T>;

/// Interior-mutable store used for the registry's binding map.
///
/// [`RwLock<T>`] in thread-safe mode, [`RefCell<T>`] otherwise.
#[cfg(feature = "thread-safe")]
pub type Store<T> = RwLock<T>;
#[cfg(not(feature = "thread-safe"))]
pub type Store<T> = RefCell<T>;

/// Cache slot for a binding's singleton instance.
///
/// The slot is scoped to one binding, so singleton initialization of
/// unrelated bindings never contends. In thread-safe mode the mutex is held
/// across construction, making the check-or-create sequence atomic: at most
/// one thread runs the producer and every caller observes the same instance.
#[cfg(feature = "thread-safe")]
pub type InstanceCell<T> = Mutex<Option<Shared<T>>>;
#[cfg(not(feature = "thread-safe"))]
pub type InstanceCell<T> = RefCell<Option<Shared<T>>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_can_be_cloned() {
        let data = Shared::new(100);
        let clone = Shared::clone(&data);

        assert_eq!(Shared::strong_count(&data), 2);
        drop(clone);
        assert_eq!(Shared::strong_count(&data), 1);
    }

    #[test]
    fn instance_cell_starts_empty_and_holds_one_value() {
        let cell: InstanceCell<u32> = InstanceCell::new(None);

        #[cfg(feature = "thread-safe")]
        {
            assert!(cell.lock().unwrap().is_none());
            *cell.lock().unwrap() = Some(Shared::new(7));
            assert_eq!(**cell.lock().unwrap().as_ref().unwrap(), 7);
        }

        #[cfg(not(feature = "thread-safe"))]
        {
            assert!(cell.borrow().is_none());
            *cell.borrow_mut() = Some(Shared::new(7));
            assert_eq!(**cell.borrow().as_ref().unwrap(), 7);
        }
    }
}
