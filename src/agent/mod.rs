//! Session-scoped adaptation agent.
//!
//! A client-side counterpart to the adaptation service: an ordered list of
//! resolvers tried in sequence plus an explicit result cache. The primary
//! resolver produces full engine output; the fallback resolves colors
//! against the bare transform table when the primary is unavailable. The
//! cache and the resolver list are owned by the agent, so their lifetime is
//! the session that created it.

use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::models::element::element_context;
use crate::models::{
    Accessibility, AdaptedElement, ColorAdaptation, DeficiencyType, Preferences, VisualElement,
};
use crate::semantics::{engine, transform};

/// One tier of the adaptation resolution strategy.
pub trait AdaptationResolver {
    /// Diagnostic name of the resolver.
    fn name(&self) -> &'static str;

    /// Attempts to adapt the batch. An error hands over to the next tier.
    fn resolve(
        &self,
        elements: &[VisualElement],
        deficiency_type: DeficiencyType,
        preferences: &Preferences,
    ) -> Result<Vec<AdaptedElement>>;
}

/// Primary tier: the full adaptation engine.
#[derive(Debug, Default)]
pub struct EngineResolver;

impl AdaptationResolver for EngineResolver {
    fn name(&self) -> &'static str {
        "engine"
    }

    fn resolve(
        &self,
        elements: &[VisualElement],
        deficiency_type: DeficiencyType,
        preferences: &Preferences,
    ) -> Result<Vec<AdaptedElement>> {
        Ok(engine::adapt(elements, deficiency_type, preferences))
    }
}

/// Fallback tier: bare table lookups without semantic enrichment.
///
/// Produces the same element shape as the engine but with a minimal
/// description, so callers downstream need no special casing.
#[derive(Debug, Default)]
pub struct TableFallbackResolver;

impl AdaptationResolver for TableFallbackResolver {
    fn name(&self) -> &'static str {
        "local-table"
    }

    fn resolve(
        &self,
        elements: &[VisualElement],
        deficiency_type: DeficiencyType,
        _preferences: &Preferences,
    ) -> Result<Vec<AdaptedElement>> {
        Ok(elements
            .iter()
            .map(|element| {
                let adapted_color = element
                    .color
                    .as_deref()
                    .map(|color| transform::lookup(deficiency_type, color));
                AdaptedElement {
                    context: element_context(),
                    element_type: element
                        .element_type
                        .clone()
                        .unwrap_or_else(|| "VisualElement".to_string()),
                    id: element.id.clone().unwrap_or_default(),
                    name: element.label.clone().unwrap_or_default(),
                    description: element.description.clone().unwrap_or_default(),
                    color: element.color.clone(),
                    adaptation: ColorAdaptation {
                        adaptation_type: "cs:ColorAdaptation".to_string(),
                        daltonism_type: deficiency_type,
                        original_color: element.color.clone(),
                        adapted_color: adapted_color.clone(),
                        semantic_description: format!(
                            "Locally adapted for {deficiency_type} without semantic enrichment"
                        ),
                    },
                    accessibility: Accessibility {
                        text_alternative: element.text_alternative.clone(),
                        semantic_meaning: "Visual information element".to_string(),
                    },
                }
            })
            .collect())
    }
}

/// Cache key: deficiency type and batch size.
pub type CacheKey = (DeficiencyType, usize);

/// Explicit result cache for a session agent.
///
/// Deliberately coarse: a cached result is reused for any batch with the
/// same deficiency type and element count, matching the session-cache
/// contract of the adaptation protocol.
#[derive(Debug, Default)]
pub struct AdaptationCache {
    entries: HashMap<CacheKey, Vec<AdaptedElement>>,
}

impl AdaptationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetches a cached result.
    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<&Vec<AdaptedElement>> {
        self.entries.get(key)
    }

    /// Stores a result.
    pub fn insert(&mut self, key: CacheKey, value: Vec<AdaptedElement>) {
        self.entries.insert(key, value);
    }

    /// Number of cached results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops all cached results.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A session-scoped agent resolving adaptations through an ordered
/// resolver chain with caching.
pub struct SessionAgent {
    resolvers: Vec<Box<dyn AdaptationResolver>>,
    cache: AdaptationCache,
}

impl SessionAgent {
    /// Creates an agent over an explicit resolver chain and cache store.
    #[must_use]
    pub fn new(resolvers: Vec<Box<dyn AdaptationResolver>>, cache: AdaptationCache) -> Self {
        Self { resolvers, cache }
    }

    /// Creates an agent with the default two-tier strategy: engine first,
    /// bare table fallback second.
    #[must_use]
    pub fn with_default_resolvers() -> Self {
        Self::new(
            vec![
                Box::new(EngineResolver),
                Box::new(TableFallbackResolver),
            ],
            AdaptationCache::new(),
        )
    }

    /// Adapts a batch, consulting the cache first and then each resolver
    /// in order. The first successful tier's result is cached and
    /// returned; if every tier fails the last error is reported.
    pub fn adapt(
        &mut self,
        elements: &[VisualElement],
        deficiency_type: DeficiencyType,
        preferences: &Preferences,
    ) -> Result<Vec<AdaptedElement>> {
        let key = (deficiency_type, elements.len());
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached.clone());
        }

        let mut last_error = anyhow!("no resolvers configured");
        for resolver in &self.resolvers {
            match resolver.resolve(elements, deficiency_type, preferences) {
                Ok(adapted) => {
                    self.cache.insert(key, adapted.clone());
                    return Ok(adapted);
                }
                Err(error) => {
                    tracing::debug!(
                        resolver = resolver.name(),
                        %error,
                        "resolver tier failed, trying next"
                    );
                    last_error = error;
                }
            }
        }
        Err(last_error)
    }

    /// Read access to the cache, mainly for diagnostics.
    #[must_use]
    pub const fn cache(&self) -> &AdaptationCache {
        &self.cache
    }
}
