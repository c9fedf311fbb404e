//! Cache key generation from call arguments

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use super::argument::Argument;
use super::strategy::{DefaultKeyStrategy, StrategyRegistry};
use crate::domain::DomainError;

/// Separator placed between argument fragments
///
/// Fragments are not escaped, so a fragment containing the separator can make
/// two different argument lists produce the same key.
pub const KEY_SEPARATOR: &str = ",";

/// Trait for generating cache keys for an intercepted call
pub trait KeyGenerator: Send + Sync + Debug {
    /// Generates the composite key for one call
    ///
    /// `target` is the call's receiver and `operation` identifies the invoked
    /// operation. Implementations may ignore both.
    fn generate(
        &self,
        target: &dyn Any,
        operation: &str,
        arguments: &[Argument<'_>],
    ) -> Result<String, DomainError>;
}

/// Key generator joining one fragment per argument
///
/// Each non-null argument is rendered by the strategy registered for its exact
/// runtime type, or by [`DefaultKeyStrategy`] when none is. Null arguments
/// render as the empty fragment. The receiver and operation never contribute
/// to the key, so equal arguments yield equal keys across instances and call
/// sites; callers separate operations by namespace.
#[derive(Debug, Clone, Default)]
pub struct ArgumentKeyGenerator {
    registry: Arc<StrategyRegistry>,
    default_strategy: DefaultKeyStrategy,
}

impl ArgumentKeyGenerator {
    /// Creates a generator reading strategies from a shared registry
    pub fn new(registry: Arc<StrategyRegistry>) -> Self {
        Self {
            registry,
            default_strategy: DefaultKeyStrategy,
        }
    }

    pub fn registry(&self) -> &Arc<StrategyRegistry> {
        &self.registry
    }

    fn fragment(&self, argument: &Argument<'_>) -> Result<String, DomainError> {
        let value = match argument {
            Argument::Null => return Ok(String::new()),
            Argument::Value(value) => value,
        };

        // Cloned out of the registry so no lock is held while the strategy runs
        match self.registry.lookup(value.type_id()) {
            Some(strategy) => strategy(value.as_any()),
            None => self.default_strategy.extract(value),
        }
    }
}

impl KeyGenerator for ArgumentKeyGenerator {
    fn generate(
        &self,
        _target: &dyn Any,
        _operation: &str,
        arguments: &[Argument<'_>],
    ) -> Result<String, DomainError> {
        let fragments = arguments
            .iter()
            .map(|argument| self.fragment(argument))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(fragments.join(KEY_SEPARATOR))
    }
}
