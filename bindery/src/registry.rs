//! The dependency registry (thread-safe and single-threaded variants).
//!
//! Public API:
//! - register_transient / register_singleton: append a binding that constructs
//!   implementation `I` for service `S` through its [`Construct`] impl
//! - register_transient_self / register_singleton_self: self-registration of a
//!   concrete type under itself
//! - register_singleton_instance: wrap an already-built instance as a fixed
//!   singleton binding
//! - register_transient_with / register_singleton_with: explicit-producer
//!   registration for types without a `Construct` recipe
//! - resolve / resolve_all / has: produce from the first binding, from every
//!   binding in registration order, or probe for presence
//!
//! A service type keeps every binding ever registered for it, in insertion
//! order; re-registration appends rather than replaces, and the first entry
//! is the default used by `resolve`. Registration itself is infallible: the
//! is-a relationship between implementation and service type is the
//! [`Upcast`] coercion, which a non-subtype fails to compile.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::binding::{Binding, Producer};
use crate::construct::Construct;
use crate::error::Error;
use crate::runtime::{Shared, Store};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Maps an implementation's shared handle to the service type it is
/// registered under.
///
/// Written `|instance| instance` at the call site: for self-registrations it
/// is the identity, for trait-object services the unsized coercion applies.
/// This fn pointer is the registration-time is-a check: it only compiles
/// when `I` implements (or is) `S`.
pub type Upcast<S, I> = fn(Shared<I>) -> Shared<S>;

#[cfg(feature = "thread-safe")]
type BindingsMap = Store<HashMap<TypeId, Box<dyn Any + Send + Sync>>>;
#[cfg(not(feature = "thread-safe"))]
type BindingsMap = Store<HashMap<TypeId, Box<dyn Any>>>;

type BindingSeq<S> = Vec<Shared<Binding<S>>>;

/// The dependency-injection container.
///
/// Maps each service type to its ordered sequence of [`Binding`]s and drives
/// resolution, including the recursive construction of dependency graphs.
/// Cached singleton instances live exactly as long as the registry.
pub struct Registry {
    bindings: BindingsMap,
}

impl Registry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            bindings: Store::new(HashMap::new()),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "debug")]
impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        #[cfg(feature = "thread-safe")]
        let service_types = self.bindings.read().unwrap().len();
        #[cfg(not(feature = "thread-safe"))]
        let service_types = self.bindings.borrow().len();

        f.debug_struct("Registry")
            .field("service_types", &service_types)
            .finish()
    }
}

//////////////////////////////////////////////////////////////////////////////
// THREAD-SAFE implementation using Arc + RwLock
//////////////////////////////////////////////////////////////////////////////
#[cfg(feature = "thread-safe")]
impl Registry {
    /// Appends a per-request binding constructing `I` for service `S`.
    ///
    /// Every resolution of `S` through this binding runs `I`'s designated
    /// constructor, transitively constructing its dependencies. Missing
    /// dependencies of `I` are not checked here; they surface at resolution.
    pub fn register_transient<S, I>(&self, upcast: Upcast<S, I>)
    where
        S: ?Sized + Send + Sync + 'static,
        I: Construct + Send + Sync,
    {
        let producer: Producer<S> =
            Box::new(move |registry: &Registry| Ok(upcast(Shared::new(I::construct(registry)?))));
        self.append::<S>(Binding::per_request(std::any::type_name::<I>(), producer));
    }

    /// Appends a per-request binding for a concrete type under itself.
    pub fn register_transient_self<I>(&self)
    where
        I: Construct + Send + Sync,
    {
        self.register_transient::<I, I>(|instance| instance);
    }

    /// Appends a singleton binding constructing `I` for service `S`.
    ///
    /// Construction is deferred to the first resolution; afterwards the
    /// cached instance is returned without reconstruction.
    pub fn register_singleton<S, I>(&self, upcast: Upcast<S, I>)
    where
        S: ?Sized + Send + Sync + 'static,
        I: Construct + Send + Sync,
    {
        let producer: Producer<S> =
            Box::new(move |registry: &Registry| Ok(upcast(Shared::new(I::construct(registry)?))));
        self.append::<S>(Binding::singleton(std::any::type_name::<I>(), producer));
    }

    /// Appends a singleton binding for a concrete type under itself.
    pub fn register_singleton_self<I>(&self)
    where
        I: Construct + Send + Sync,
    {
        self.register_singleton::<I, I>(|instance| instance);
    }

    /// Appends a singleton binding wrapping an already-built instance.
    ///
    /// The binding hands out the given handle on every resolution and never
    /// invokes construction logic.
    pub fn register_singleton_instance<S>(&self, instance: Shared<S>)
    where
        S: ?Sized + Send + Sync + 'static,
    {
        self.append::<S>(Binding::from_instance(
            std::any::type_name::<S>(),
            instance,
        ));
    }

    /// Appends a per-request binding with an explicit producer.
    pub fn register_transient_with<S, F>(&self, producer: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Registry) -> Result<Shared<S>, Error> + Send + Sync + 'static,
    {
        self.append::<S>(Binding::per_request(
            std::any::type_name::<S>(),
            Box::new(producer),
        ));
    }

    /// Appends a singleton binding with an explicit producer.
    pub fn register_singleton_with<S, F>(&self, producer: F)
    where
        S: ?Sized + Send + Sync + 'static,
        F: Fn(&Registry) -> Result<Shared<S>, Error> + Send + Sync + 'static,
    {
        self.append::<S>(Binding::singleton(
            std::any::type_name::<S>(),
            Box::new(producer),
        ));
    }

    /// Produces an instance of `S` from the first registered binding.
    pub fn resolve<S>(&self) -> Result<Shared<S>, Error>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        #[cfg(feature = "tracing")]
        trace!("resolving {}", std::any::type_name::<S>());

        let bindings = self.all_bindings::<S>()?;
        let binding = bindings
            .first()
            .ok_or_else(|| Error::unregistered_type(std::any::type_name::<S>()))?;
        binding.get_instance(self)
    }

    /// Produces one instance of `S` per registered binding, in registration
    /// order, each according to its own binding's lifecycle.
    pub fn resolve_all<S>(&self) -> Result<Vec<Shared<S>>, Error>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        #[cfg(feature = "tracing")]
        trace!("resolving all bindings of {}", std::any::type_name::<S>());

        let bindings = self.all_bindings::<S>()?;
        let mut instances = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            instances.push(binding.get_instance(self)?);
        }
        Ok(instances)
    }

    /// Checks whether at least one binding exists for `S`.
    pub fn has<S>(&self) -> bool
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let map = self.bindings.read().unwrap();
        map.contains_key(&TypeId::of::<S>())
    }

    /// Clones the binding sequence for `S` out of the map.
    ///
    /// The map guard is released before any producer runs, so recursive
    /// resolution during construction re-enters the map fresh.
    fn all_bindings<S>(&self) -> Result<BindingSeq<S>, Error>
    where
        S: ?Sized + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<S>();
        let map = self.bindings.read().unwrap();
        let slot = map
            .get(&TypeId::of::<S>())
            .ok_or_else(|| Error::unregistered_type(type_name))?;
        let sequence = slot
            .downcast_ref::<BindingSeq<S>>()
            .ok_or_else(|| Error::invalid_binding(type_name))?;
        Ok(sequence.clone())
    }

    fn append<S>(&self, binding: Binding<S>)
    where
        S: ?Sized + Send + Sync + 'static,
    {
        #[cfg(feature = "tracing")]
        debug!(
            "registering {} binding for {}",
            binding.lifecycle(),
            std::any::type_name::<S>()
        );

        let mut map = self.bindings.write().unwrap();
        let slot = map
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::new(BindingSeq::<S>::new()));
        match slot.downcast_mut::<BindingSeq<S>>() {
            Some(sequence) => sequence.push(Shared::new(binding)),
            // slots are keyed by TypeId, so each holds its own sequence
            None => unreachable!("binding slot holds a foreign sequence"),
        }
    }
}

//////////////////////////////////////////////////////////////////////////////
// SINGLE-THREADED implementation using Rc + RefCell
//////////////////////////////////////////////////////////////////////////////
#[cfg(not(feature = "thread-safe"))]
impl Registry {
    /// Appends a per-request binding constructing `I` for service `S`.
    ///
    /// Every resolution of `S` through this binding runs `I`'s designated
    /// constructor, transitively constructing its dependencies. Missing
    /// dependencies of `I` are not checked here; they surface at resolution.
    pub fn register_transient<S, I>(&self, upcast: Upcast<S, I>)
    where
        S: ?Sized + 'static,
        I: Construct,
    {
        let producer: Producer<S> =
            Box::new(move |registry: &Registry| Ok(upcast(Shared::new(I::construct(registry)?))));
        self.append::<S>(Binding::per_request(std::any::type_name::<I>(), producer));
    }

    /// Appends a per-request binding for a concrete type under itself.
    pub fn register_transient_self<I>(&self)
    where
        I: Construct,
    {
        self.register_transient::<I, I>(|instance| instance);
    }

    /// Appends a singleton binding constructing `I` for service `S`.
    ///
    /// Construction is deferred to the first resolution; afterwards the
    /// cached instance is returned without reconstruction.
    pub fn register_singleton<S, I>(&self, upcast: Upcast<S, I>)
    where
        S: ?Sized + 'static,
        I: Construct,
    {
        let producer: Producer<S> =
            Box::new(move |registry: &Registry| Ok(upcast(Shared::new(I::construct(registry)?))));
        self.append::<S>(Binding::singleton(std::any::type_name::<I>(), producer));
    }

    /// Appends a singleton binding for a concrete type under itself.
    pub fn register_singleton_self<I>(&self)
    where
        I: Construct,
    {
        self.register_singleton::<I, I>(|instance| instance);
    }

    /// Appends a singleton binding wrapping an already-built instance.
    ///
    /// The binding hands out the given handle on every resolution and never
    /// invokes construction logic.
    pub fn register_singleton_instance<S>(&self, instance: Shared<S>)
    where
        S: ?Sized + 'static,
    {
        self.append::<S>(Binding::from_instance(
            std::any::type_name::<S>(),
            instance,
        ));
    }

    /// Appends a per-request binding with an explicit producer.
    pub fn register_transient_with<S, F>(&self, producer: F)
    where
        S: ?Sized + 'static,
        F: Fn(&Registry) -> Result<Shared<S>, Error> + 'static,
    {
        self.append::<S>(Binding::per_request(
            std::any::type_name::<S>(),
            Box::new(producer),
        ));
    }

    /// Appends a singleton binding with an explicit producer.
    pub fn register_singleton_with<S, F>(&self, producer: F)
    where
        S: ?Sized + 'static,
        F: Fn(&Registry) -> Result<Shared<S>, Error> + 'static,
    {
        self.append::<S>(Binding::singleton(
            std::any::type_name::<S>(),
            Box::new(producer),
        ));
    }

    /// Produces an instance of `S` from the first registered binding.
    pub fn resolve<S>(&self) -> Result<Shared<S>, Error>
    where
        S: ?Sized + 'static,
    {
        #[cfg(feature = "tracing")]
        trace!("resolving {}", std::any::type_name::<S>());

        let bindings = self.all_bindings::<S>()?;
        let binding = bindings
            .first()
            .ok_or_else(|| Error::unregistered_type(std::any::type_name::<S>()))?;
        binding.get_instance(self)
    }

    /// Produces one instance of `S` per registered binding, in registration
    /// order, each according to its own binding's lifecycle.
    pub fn resolve_all<S>(&self) -> Result<Vec<Shared<S>>, Error>
    where
        S: ?Sized + 'static,
    {
        #[cfg(feature = "tracing")]
        trace!("resolving all bindings of {}", std::any::type_name::<S>());

        let bindings = self.all_bindings::<S>()?;
        let mut instances = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            instances.push(binding.get_instance(self)?);
        }
        Ok(instances)
    }

    /// Checks whether at least one binding exists for `S`.
    pub fn has<S>(&self) -> bool
    where
        S: ?Sized + 'static,
    {
        let map = self.bindings.borrow();
        map.contains_key(&TypeId::of::<S>())
    }

    /// Clones the binding sequence for `S` out of the map.
    ///
    /// The map borrow is released before any producer runs, so recursive
    /// resolution during construction re-enters the map fresh.
    fn all_bindings<S>(&self) -> Result<BindingSeq<S>, Error>
    where
        S: ?Sized + 'static,
    {
        let type_name = std::any::type_name::<S>();
        let map = self.bindings.borrow();
        let slot = map
            .get(&TypeId::of::<S>())
            .ok_or_else(|| Error::unregistered_type(type_name))?;
        let sequence = slot
            .downcast_ref::<BindingSeq<S>>()
            .ok_or_else(|| Error::invalid_binding(type_name))?;
        Ok(sequence.clone())
    }

    fn append<S>(&self, binding: Binding<S>)
    where
        S: ?Sized + 'static,
    {
        #[cfg(feature = "tracing")]
        debug!(
            "registering {} binding for {}",
            binding.lifecycle(),
            std::any::type_name::<S>()
        );

        let mut map = self.bindings.borrow_mut();
        let slot = map
            .entry(TypeId::of::<S>())
            .or_insert_with(|| Box::new(BindingSeq::<S>::new()));
        match slot.downcast_mut::<BindingSeq<S>>() {
            Some(sequence) => sequence.push(Shared::new(binding)),
            // slots are keyed by TypeId, so each holds its own sequence
            None => unreachable!("binding slot holds a foreign sequence"),
        }
    }
}
