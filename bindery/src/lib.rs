pub mod binding;
pub mod construct;
pub mod error;
pub mod lifecycle;
pub mod macros;
pub mod registry;
pub mod runtime;

pub use binding::*;
pub use construct::*;
pub use error::*;
pub use lifecycle::*;
pub use registry::*;
pub use runtime::*;
