//! Named engine instances shared within one host.
//!
//! Hosts that draw on several surfaces keep one engine per logical name here
//! and fetch it where needed, instead of holding a global.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Default engine name.
pub const DEFAULT_ENGINE: &str = "default";

/// Engines keyed by logical name.
#[derive(Debug)]
pub struct EngineRegistry<E> {
    engines: BTreeMap<String, E>,
}

impl<E> EngineRegistry<E> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engines: BTreeMap::new(),
        }
    }

    /// Fetch the engine named `name`, creating it with `create` on first use.
    ///
    /// # Errors
    ///
    /// Propagates the error of `create`. Nothing is stored then.
    pub fn get_or_create_with<Err>(
        &mut self,
        name: &str,
        create: impl FnOnce() -> Result<E, Err>,
    ) -> Result<&mut E, Err> {
        match self.engines.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                tracing::debug!("Creating engine '{name}'");
                Ok(entry.insert(create()?))
            }
        }
    }

    /// The engine named `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&E> {
        self.engines.get(name)
    }

    /// The engine named `name`, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut E> {
        self.engines.get_mut(name)
    }

    /// Remove and return the engine named `name`.
    pub fn remove(&mut self, name: &str) -> Option<E> {
        let removed = self.engines.remove(name);
        if removed.is_some() {
            tracing::debug!("Removed engine '{name}'");
        }
        removed
    }

    /// Registered names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.engines.keys().map(String::as_str)
    }

    /// Number of registered engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// Whether no engine is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl<E> Default for EngineRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Canvas2dEngine, DrawEngine};
    use crate::surface::RecordingSurface;
    use crate::DrawError;

    type Engine = Canvas2dEngine<RecordingSurface>;

    fn create() -> Result<Engine, DrawError> {
        Ok(Canvas2dEngine::with_surface(RecordingSurface::new(100.0, 100.0)))
    }

    #[test]
    fn test_create_once() {
        let mut registry = EngineRegistry::new();
        registry
            .get_or_create_with(DEFAULT_ENGINE, create)
            .and_then(|engine| engine.set_draw_condition(false).map(|_| ()))
            .expect("created");

        let mut calls = 0;
        let engine = registry
            .get_or_create_with(DEFAULT_ENGINE, || {
                calls += 1;
                create()
            })
            .expect("fetched");
        assert!(!engine.draw_condition());
        assert_eq!(calls, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failed_create_stores_nothing() {
        let mut registry: EngineRegistry<Engine> = EngineRegistry::new();
        let result = registry.get_or_create_with("broken", || Err(DrawError::NoContextBound));
        assert!(result.is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_names_and_remove() {
        let mut registry = EngineRegistry::new();
        registry.get_or_create_with("minimap", create).expect("created");
        registry.get_or_create_with("main", create).expect("created");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["main", "minimap"]);

        assert!(registry.remove("main").is_some());
        assert!(registry.remove("main").is_none());
        assert!(registry.get("main").is_none());
        assert!(registry.get_mut("minimap").is_some());
    }
}
