//! Service bindings.
//!
//! A [`Binding`] is one registered producer of a service type: the
//! construction strategy for an implementation type together with its
//! [`Lifecycle`] and, for singletons, the cache slot holding the instance.
//!
//! Bindings are created only by [`Registry`](crate::Registry) registration
//! calls and are never removed. Their only operation is
//! [`Binding::get_instance`]; lifecycle state is not exposed elsewhere.

use crate::error::{Error, ErrorKind};
use crate::lifecycle::Lifecycle;
use crate::registry::Registry;
use crate::runtime::{InstanceCell, Shared};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Construction strategy stored in a binding: given the owning registry,
/// produce one instance of the service type.
///
/// The registry argument stands in for the binding's back-reference to its
/// owner; it exists only so the producer can resolve constructor
/// dependencies recursively.
#[cfg(feature = "thread-safe")]
pub type Producer<S> =
    Box<dyn Fn(&Registry) -> Result<Shared<S>, Error> + Send + Sync + 'static>;
#[cfg(not(feature = "thread-safe"))]
pub type Producer<S> = Box<dyn Fn(&Registry) -> Result<Shared<S>, Error> + 'static>;

/// One registered producer for a service type `S`.
///
/// Invariants: the cache slot is populated at most once, and only when the
/// lifecycle is [`Lifecycle::Singleton`]. A binding wrapping a pre-built
/// instance has no producer and a pre-populated slot, so construction logic
/// is unreachable for it.
pub struct Binding<S: ?Sized + 'static> {
    lifecycle: Lifecycle,
    implementation: &'static str,
    producer: Option<Producer<S>>,
    cached: InstanceCell<S>,
}

impl<S: ?Sized + 'static> Binding<S> {
    pub(crate) fn per_request(implementation: &'static str, producer: Producer<S>) -> Self {
        Self {
            lifecycle: Lifecycle::PerRequest,
            implementation,
            producer: Some(producer),
            cached: InstanceCell::new(None),
        }
    }

    pub(crate) fn singleton(implementation: &'static str, producer: Producer<S>) -> Self {
        Self {
            lifecycle: Lifecycle::Singleton,
            implementation,
            producer: Some(producer),
            cached: InstanceCell::new(None),
        }
    }

    pub(crate) fn from_instance(implementation: &'static str, instance: Shared<S>) -> Self {
        Self {
            lifecycle: Lifecycle::Singleton,
            implementation,
            producer: None,
            cached: InstanceCell::new(Some(instance)),
        }
    }

    /// The production policy of this binding.
    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    /// Produces an instance according to the binding's lifecycle.
    ///
    /// Per-request bindings run the producer on every call. Singleton
    /// bindings construct at most once: the cache slot's lock is held across
    /// construction, so concurrent first calls agree on a single instance
    /// and later calls return the cached handle without reconstruction.
    pub fn get_instance(&self, registry: &Registry) -> Result<Shared<S>, Error> {
        match self.lifecycle {
            Lifecycle::PerRequest => self.construct(registry),

            Lifecycle::Singleton => {
                #[cfg(feature = "thread-safe")]
                {
                    let mut cached = self.cached.lock().unwrap();
                    if let Some(instance) = cached.as_ref() {
                        return Ok(instance.clone());
                    }
                    let instance = self.construct(registry)?;
                    *cached = Some(instance.clone());

                    #[cfg(feature = "tracing")]
                    debug!("cached singleton instance of {}", self.implementation);

                    Ok(instance)
                }

                #[cfg(not(feature = "thread-safe"))]
                {
                    let mut cached = self.cached.borrow_mut();
                    if let Some(instance) = cached.as_ref() {
                        return Ok(instance.clone());
                    }
                    let instance = self.construct(registry)?;
                    *cached = Some(instance.clone());

                    #[cfg(feature = "tracing")]
                    debug!("cached singleton instance of {}", self.implementation);

                    Ok(instance)
                }
            }
        }
    }

    /// Runs the construction strategy through the owning registry.
    ///
    /// A dependency miss inside the producer surfaces as
    /// [`ErrorKind::UnregisteredType`] from the inner resolve call and is
    /// rewrapped here as [`ErrorKind::UnresolvedDependency`], naming the type
    /// under construction alongside the missing type.
    fn construct(&self, registry: &Registry) -> Result<Shared<S>, Error> {
        let producer = match &self.producer {
            Some(producer) => producer,
            None => return Err(Error::no_constructor(self.implementation)),
        };

        #[cfg(feature = "tracing")]
        trace!("constructing {}", self.implementation);

        match producer(registry) {
            Err(cause) if cause.kind == ErrorKind::UnregisteredType => Err(
                Error::unresolved_dependency(self.implementation, &cause.message),
            ),
            outcome => outcome,
        }
    }
}

#[cfg(feature = "debug")]
impl<S: ?Sized + 'static> std::fmt::Debug for Binding<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binding")
            .field("lifecycle", &self.lifecycle)
            .field("implementation", &self.implementation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_request_runs_producer_every_call() {
        let registry = Registry::new();
        let binding: Binding<u32> =
            Binding::per_request("u32", Box::new(|_registry| Ok(Shared::new(5))));

        let first = binding.get_instance(&registry).unwrap();
        let second = binding.get_instance(&registry).unwrap();
        assert_eq!(*first, *second);
        assert!(!Shared::ptr_eq(&first, &second));
    }

    #[test]
    fn singleton_constructs_once_and_caches() {
        let registry = Registry::new();
        let binding: Binding<u32> =
            Binding::singleton("u32", Box::new(|_registry| Ok(Shared::new(5))));

        let first = binding.get_instance(&registry).unwrap();
        let second = binding.get_instance(&registry).unwrap();
        assert!(Shared::ptr_eq(&first, &second));
    }

    #[test]
    fn instance_binding_returns_the_wrapped_handle() {
        let registry = Registry::new();
        let existing = Shared::new(9u32);
        let binding = Binding::from_instance("u32", existing.clone());

        assert!(binding.lifecycle().is_singleton());
        let resolved = binding.get_instance(&registry).unwrap();
        assert!(Shared::ptr_eq(&existing, &resolved));
    }

    #[test]
    fn failed_construction_is_not_cached() {
        let registry = Registry::new();
        let binding: Binding<u32> = Binding::singleton(
            "u32",
            Box::new(|registry| Ok(Shared::new(*registry.resolve::<u16>()? as u32))),
        );

        let err = binding.get_instance(&registry).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnresolvedDependency));

        registry.register_transient_with::<u16, _>(|_registry| Ok(Shared::new(3u16)));
        assert_eq!(*binding.get_instance(&registry).unwrap(), 3);
    }
}
