//! Strategy registry: maps strategy names to factories.
//!
//! Candidate strategies register statically (or at startup) instead of
//! being discovered through runtime class loading; the harness looks
//! them up by name for an evaluation run.

use std::collections::BTreeMap;

use crate::strategy::StrategyFactory;

/// A name-keyed collection of strategy factories.
///
/// Names come from [`StrategyFactory::name`]; registering a second
/// factory under an existing name replaces the first.
#[derive(Default)]
pub struct StrategyRegistry {
    factories: BTreeMap<String, Box<dyn StrategyFactory>>,
}

impl StrategyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in reference
    /// strategies.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(crate::strategies::SimpleFactory::default()));
        registry.register(Box::new(crate::strategies::DataSetFactory));
        registry.register(Box::new(crate::strategies::SizeOrderedFactory::default()));
        registry.register(Box::new(crate::strategies::ClusteredFactory::default()));
        registry
    }

    /// Registers a factory under its own display name.
    pub fn register(&mut self, factory: Box<dyn StrategyFactory>) {
        self.factories.insert(factory.name().to_string(), factory);
    }

    /// Looks up a factory by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn StrategyFactory> {
        self.factories.get(name).map(Box::as_ref)
    }

    /// Returns the registered names in sorted order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Iterates over the registered factories in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn StrategyFactory> {
        self.factories.values().map(Box::as_ref)
    }

    /// Returns the number of registered factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Checks whether no factories are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl std::fmt::Debug for StrategyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRegistry")
            .field("names", &self.names())
            .finish()
    }
}
