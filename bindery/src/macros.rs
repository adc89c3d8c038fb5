//! Macros for ergonomic binding registration.
//!
//! - [`register!`]: shorthand for the registration methods, including the
//!   unsized coercion needed to bind an implementation under a trait-object
//!   service type.
//! - [`registry!`]: compose a registry from multiple `register!` statements
//!   in one block.
//!
//! # Example
//! ```
//! use bindery::{registry, Construct, Error, Registry};
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct PlainGreeter;
//!
//! impl Greeter for PlainGreeter {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! impl Construct for PlainGreeter {
//!     fn construct(_registry: &Registry) -> Result<Self, Error> {
//!         Ok(PlainGreeter)
//!     }
//! }
//!
//! let registry = registry! {
//!     register(singleton dyn Greeter => PlainGreeter)
//! };
//! assert_eq!(registry.resolve::<dyn Greeter>().unwrap().greet(), "hello");
//! ```

/// Shorthand for registering bindings in a registry.
///
/// - `transient dyn Trait => Impl`: per-request binding under a trait object.
/// - `singleton dyn Trait => Impl`: singleton binding under a trait object.
/// - `instance dyn Trait => value`: wrap a pre-built value under a trait
///   object.
/// - `transient Type`: per-request self-registration of a concrete type.
/// - `singleton Type`: singleton self-registration of a concrete type.
/// - `instance value`: wrap a pre-built value under its own type.
#[macro_export]
macro_rules! register {
    ($registry:expr, transient dyn $service:path => $implementation:ty) => {{
        $registry.register_transient::<dyn $service, $implementation>(|instance| instance);
    }};

    ($registry:expr, singleton dyn $service:path => $implementation:ty) => {{
        $registry.register_singleton::<dyn $service, $implementation>(|instance| instance);
    }};

    ($registry:expr, instance dyn $service:path => $value:expr) => {{
        $registry.register_singleton_instance::<dyn $service>(
            $crate::Shared::new($value) as $crate::Shared<dyn $service>,
        );
    }};

    ($registry:expr, transient $implementation:ty) => {{
        $registry.register_transient_self::<$implementation>();
    }};

    ($registry:expr, singleton $implementation:ty) => {{
        $registry.register_singleton_self::<$implementation>();
    }};

    ($registry:expr, instance $value:expr) => {{
        $registry.register_singleton_instance($crate::Shared::new($value));
    }};
}

/// Compose a registry from multiple `register!` statements in one block.
///
/// # Example
/// ```ignore
/// let registry = registry! {
///     register(transient dyn Source => FileSource)
///     register(singleton Cache)
/// };
/// ```
#[macro_export]
macro_rules! registry {
    (
        $(
            register( $($binding:tt)* )
        )*
    ) => {{
        let registry = $crate::Registry::new();

        $(
            $crate::register!(registry, $($binding)*);
        )*

        registry
    }};
}
