use crate::error::Error;
use crate::registry::Registry;

/// The designated constructor of a container-built type.
///
/// Implementing `Construct` nominates the one constructor the container
/// invokes when a binding for the type produces an instance. Constructor
/// dependencies are resolved through the registry argument, which is what
/// makes graph construction recursive:
///
/// ```
/// use bindery::{Construct, Error, Registry, Shared};
///
/// struct Clock;
///
/// impl Construct for Clock {
///     fn construct(_registry: &Registry) -> Result<Self, Error> {
///         Ok(Clock)
///     }
/// }
///
/// struct Scheduler {
///     clock: Shared<Clock>,
/// }
///
/// impl Construct for Scheduler {
///     fn construct(registry: &Registry) -> Result<Self, Error> {
///         Ok(Scheduler {
///             clock: registry.resolve::<Clock>()?,
///         })
///     }
/// }
/// ```
///
/// Trait coherence allows exactly one `Construct` impl per type, so there is
/// never an ambiguous constructor choice. Types that want a different recipe
/// for one particular binding register an explicit producer via
/// [`Registry::register_transient_with`] or
/// [`Registry::register_singleton_with`] instead.
pub trait Construct: Sized + 'static {
    fn construct(registry: &Registry) -> Result<Self, Error>;
}
