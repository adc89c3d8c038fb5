use core::fmt;

/// Instance production policy of a binding.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "debug", derive(Debug))]
pub enum Lifecycle {
    /// A new instance on every resolution.
    PerRequest,
    /// One lazily constructed instance for the registry's lifetime.
    Singleton,
}

impl Lifecycle {
    pub fn is_singleton(self) -> bool {
        matches!(self, Lifecycle::Singleton)
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::PerRequest => f.write_str("per-request"),
            Lifecycle::Singleton => f.write_str("singleton"),
        }
    }
}
