//! Per-type key extraction strategies

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use super::argument::ArgumentValue;
use crate::domain::DomainError;

/// Type-erased extraction function turning one argument into a key fragment
pub type KeyStrategy = Arc<dyn Fn(&dyn Any) -> Result<String, DomainError> + Send + Sync>;

/// Wraps a closure into a [`KeyStrategy`]
pub fn key_strategy<F>(strategy: F) -> KeyStrategy
where
    F: Fn(&dyn Any) -> Result<String, DomainError> + Send + Sync + 'static,
{
    Arc::new(strategy)
}

/// Fallback extraction used when no strategy is registered for a type
///
/// Produces the argument's canonical string form. Arguments created with
/// [`Argument::opaque`](super::Argument::opaque) have none, which is reported
/// as an extraction failure naming the type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKeyStrategy;

impl DefaultKeyStrategy {
    pub fn extract(&self, value: &ArgumentValue<'_>) -> Result<String, DomainError> {
        match value.canonical() {
            Some(canonical) => Ok(canonical.to_string()),
            None => Err(DomainError::extraction(
                value.type_name(),
                "no key strategy registered and the value has no canonical string form",
            )),
        }
    }
}

/// An erased registration whose halves may be missing
///
/// Used where the target type and strategy are assembled separately, for
/// example from plugin wiring. [`StrategyRegistry::register_entry`] rejects
/// incomplete registrations.
#[derive(Default)]
pub struct StrategyRegistration {
    target: Option<(TypeId, &'static str)>,
    strategy: Option<KeyStrategy>,
}

impl StrategyRegistration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exact type the strategy applies to
    pub fn for_type<T: Any>(mut self) -> Self {
        self.target = Some((TypeId::of::<T>(), std::any::type_name::<T>()));
        self
    }

    /// Sets the extraction strategy
    pub fn with_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }
}

impl fmt::Debug for StrategyRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistration")
            .field("target", &self.target.map(|(_, name)| name))
            .field("has_strategy", &self.strategy.is_some())
            .finish()
    }
}

#[derive(Clone)]
struct StrategyEntry {
    type_name: &'static str,
    strategy: KeyStrategy,
}

/// Registry mapping exact runtime types to extraction strategies
///
/// Lookups never walk supertypes or trait objects: a strategy registered for
/// `T` applies to arguments whose runtime type is exactly `T`. The registry is
/// meant to be populated during setup and shared behind an `Arc`; readers and
/// the occasional writer are serialized by a read-write lock.
#[derive(Default)]
pub struct StrategyRegistry {
    strategies: RwLock<HashMap<TypeId, StrategyEntry>>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy for `T`, replacing any previous one
    pub fn register<T, F>(&self, strategy: F)
    where
        T: Any,
        F: Fn(&T) -> Result<String, DomainError> + Send + Sync + 'static,
    {
        let type_name = std::any::type_name::<T>();
        let erased = key_strategy(move |value: &dyn Any| match value.downcast_ref::<T>() {
            Some(typed) => strategy(typed),
            None => Err(DomainError::extraction(
                type_name,
                "argument does not match the registered type",
            )),
        });

        self.insert(TypeId::of::<T>(), type_name, erased);
    }

    /// Registers an erased strategy
    ///
    /// Fails with `InvalidArgument` when either the type or the strategy is missing.
    pub fn register_entry(&self, registration: StrategyRegistration) -> Result<(), DomainError> {
        let StrategyRegistration { target, strategy } = registration;

        let Some((type_id, type_name)) = target else {
            warn!("Rejected key strategy registration without a target type");
            return Err(DomainError::invalid_argument(
                "key strategy registration requires a type",
            ));
        };

        let Some(strategy) = strategy else {
            warn!(type_name, "Rejected key strategy registration without a strategy");
            return Err(DomainError::invalid_argument(format!(
                "key strategy registration for {} requires a strategy",
                type_name
            )));
        };

        self.insert(type_id, type_name, strategy);
        Ok(())
    }

    /// Returns the strategy registered for exactly this type
    pub fn lookup(&self, type_id: TypeId) -> Option<KeyStrategy> {
        let strategies = self.strategies.read().unwrap_or_else(PoisonError::into_inner);

        strategies.get(&type_id).map(|entry| entry.strategy.clone())
    }

    /// Removes the strategy for `T`, returning whether one was registered
    pub fn unregister<T: Any>(&self) -> bool {
        let mut strategies = self.strategies.write().unwrap_or_else(PoisonError::into_inner);

        strategies.remove(&TypeId::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.strategies
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all types with a registered strategy, sorted
    pub fn registered_types(&self) -> Vec<&'static str> {
        let strategies = self.strategies.read().unwrap_or_else(PoisonError::into_inner);

        let mut names: Vec<&'static str> = strategies.values().map(|e| e.type_name).collect();
        names.sort_unstable();
        names
    }

    fn insert(&self, type_id: TypeId, type_name: &'static str, strategy: KeyStrategy) {
        let mut strategies = self.strategies.write().unwrap_or_else(PoisonError::into_inner);

        let replaced = strategies
            .insert(
                type_id,
                StrategyEntry {
                    type_name,
                    strategy,
                },
            )
            .is_some();

        debug!(type_name, replaced, "Registered key strategy");
    }
}

impl fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("types", &self.registered_types())
            .finish()
    }
}
