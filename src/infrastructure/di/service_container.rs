//! Service container for dependency injection
//!
//! Holds the per-invocation dependencies keyed by [`Capability`]. Runners
//! declare the capabilities they need up front and the driver checks them
//! with [`Container::ensure`] before anything runs.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, Dispatch};

use crate::cli::args::Options;
use crate::infrastructure::error::{ContainerError, ContainerResult};
use crate::logging::Logger;

/// Capability tags, declared in construction order.
///
/// Later bindings may reference earlier ones, so [`Container::bind`] refuses
/// to bind a capability that sorts before one already present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Cancellation,
    Logger,
    Options,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Cancellation,
        Capability::Logger,
        Capability::Options,
    ];
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Cancellation => "cancellation",
            Capability::Logger => "logger",
            Capability::Options => "options",
        };
        f.write_str(name)
    }
}

/// A value bound in the container.
#[derive(Debug, Clone)]
pub enum Binding {
    Cancellation(CancellationToken),
    Logger(Logger),
    Options(Arc<Options>),
}

impl Binding {
    /// Capability derived from the shape of the bound value.
    pub fn capability(&self) -> Capability {
        match self {
            Binding::Cancellation(_) => Capability::Cancellation,
            Binding::Logger(_) => Capability::Logger,
            Binding::Options(_) => Capability::Options,
        }
    }
}

impl From<CancellationToken> for Binding {
    fn from(token: CancellationToken) -> Self {
        Binding::Cancellation(token)
    }
}

impl From<Logger> for Binding {
    fn from(logger: Logger) -> Self {
        Binding::Logger(logger)
    }
}

/// A bare dispatcher satisfies the logger capability.
impl From<Dispatch> for Binding {
    fn from(dispatch: Dispatch) -> Self {
        Binding::Logger(Logger::from(dispatch))
    }
}

impl From<Options> for Binding {
    fn from(options: Options) -> Self {
        Binding::Options(Arc::new(options))
    }
}

impl From<Arc<Options>> for Binding {
    fn from(options: Arc<Options>) -> Self {
        Binding::Options(options)
    }
}

/// Types that can be read back out of a [`Container`].
pub trait Resolve {
    const CAPABILITY: Capability;

    fn resolve(binding: &Binding) -> Option<&Self>;
}

impl Resolve for CancellationToken {
    const CAPABILITY: Capability = Capability::Cancellation;

    fn resolve(binding: &Binding) -> Option<&Self> {
        match binding {
            Binding::Cancellation(token) => Some(token),
            _ => None,
        }
    }
}

impl Resolve for Logger {
    const CAPABILITY: Capability = Capability::Logger;

    fn resolve(binding: &Binding) -> Option<&Self> {
        match binding {
            Binding::Logger(logger) => Some(logger),
            _ => None,
        }
    }
}

impl Resolve for Options {
    const CAPABILITY: Capability = Capability::Options;

    fn resolve(binding: &Binding) -> Option<&Self> {
        match binding {
            Binding::Options(options) => Some(options.as_ref()),
            _ => None,
        }
    }
}

/// Container holding the dependencies of one invocation.
///
/// Built once by the driver, read-only once handed to a runner.
#[derive(Debug, Default)]
pub struct Container {
    bindings: BTreeMap<Capability, Binding>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the standard container: cancellation, then logger, then options.
    pub fn assemble(
        token: CancellationToken,
        logger: Logger,
        options: impl Into<Binding>,
    ) -> ContainerResult<Self> {
        let mut container = Self::new();
        container.bind(token)?.bind(logger)?.bind(options)?;
        Ok(container)
    }

    /// Bind a value under the capability derived from its type.
    pub fn bind(&mut self, value: impl Into<Binding>) -> ContainerResult<&mut Self> {
        let binding = value.into();
        self.insert(binding.capability(), binding)
    }

    /// Bind a concrete value against an explicit capability tag.
    pub fn bind_to(
        &mut self,
        capability: Capability,
        value: impl Into<Binding>,
    ) -> ContainerResult<&mut Self> {
        let binding = value.into();
        let found = binding.capability();
        if found != capability {
            return Err(ContainerError::Mismatch {
                expected: capability,
                found,
            });
        }
        self.insert(capability, binding)
    }

    fn insert(&mut self, capability: Capability, binding: Binding) -> ContainerResult<&mut Self> {
        if self.bindings.contains_key(&capability) {
            return Err(ContainerError::AlreadyBound(capability));
        }
        if let Some((&last, _)) = self.bindings.last_key_value() {
            if last > capability {
                return Err(ContainerError::OutOfOrder {
                    capability,
                    after: last,
                });
            }
        }
        debug!(%capability, "binding");
        self.bindings.insert(capability, binding);
        Ok(self)
    }

    /// Resolve the binding for `T`.
    pub fn get<T: Resolve>(&self) -> ContainerResult<&T> {
        self.bindings
            .get(&T::CAPABILITY)
            .and_then(T::resolve)
            .ok_or(ContainerError::Unresolved(T::CAPABILITY))
    }

    /// Check whether a capability is bound.
    pub fn contains(&self, capability: Capability) -> bool {
        self.bindings.contains_key(&capability)
    }

    /// Fail fast on the first required capability that does not resolve.
    pub fn ensure(&self, required: &[Capability]) -> ContainerResult<()> {
        match required.iter().find(|c| !self.contains(**c)) {
            Some(&missing) => Err(ContainerError::Unresolved(missing)),
            None => Ok(()),
        }
    }

    /// Bound capabilities, in construction order.
    pub fn capabilities(&self) -> impl Iterator<Item = Capability> + '_ {
        self.bindings.keys().copied()
    }
}
