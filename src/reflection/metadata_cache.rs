//! Process-wide table of resolved property models.
//!
//! The cache is read-dominated: after warm-up every lookup is a single concurrent map read.
//! Misses resolve outside any lock, so two threads missing on the same type may both compute
//! the model. Both results are equal and the later insert simply replaces the earlier one;
//! readers always observe a complete model.
//!
//! Models are keyed by the address of the class descriptor, not its [`crate::Token`]: tokens
//! are only unique within one `ClassRegistry`, and one cache may serve several registries. A
//! cached model keeps its class alive, so the address cannot be reused while the entry exists.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use dashmap::DashMap;
use rayon::prelude::*;
use tracing::trace;

use crate::{
    metadata::typesystem::ClassRc,
    reflection::{config::ReflectionConfig, model::PropertyModel, resolver::AccessorResolver},
    Result,
};

/// Memoizing front-end to [`AccessorResolver`]
///
/// # Examples
///
/// ```rust
/// use propscope::{ClassBuilder, ClassRegistry, MetadataCache, PrimitiveKind};
///
/// #[derive(Default)]
/// struct User { name: String }
///
/// let registry = ClassRegistry::new();
/// let string = registry.primitive(PrimitiveKind::String);
/// let user = ClassBuilder::new(&registry, "app.User")?
///     .getter("getName", &string, |u: &User| u.name.clone())
///     .setter("setName", &string, |u: &mut User, name: String| u.name = name)
///     .build();
///
/// let cache = MetadataCache::new();
/// let model = cache.get(&user)?;
/// assert_eq!(model.readable_names(), ["name"]);
/// assert_eq!(model.find_property("NAME"), Some("name"));
/// # Ok::<(), propscope::Error>(())
/// ```
pub struct MetadataCache {
    models: DashMap<usize, Arc<PropertyModel>>,
    cache_enabled: AtomicBool,
    resolver: AccessorResolver,
}

impl MetadataCache {
    /// Create a cache with the default configuration
    pub fn new() -> Self {
        Self::with_config(&ReflectionConfig::default())
    }

    /// Create a cache with an explicit configuration
    pub fn with_config(config: &ReflectionConfig) -> Self {
        MetadataCache {
            models: DashMap::new(),
            cache_enabled: AtomicBool::new(config.cache_enabled),
            resolver: AccessorResolver::new(config),
        }
    }

    /// Get the property model of `class`, resolving it on first use
    ///
    /// # Errors
    /// Returns the resolution error if the class has ambiguous accessors; nothing is cached
    /// in that case.
    pub fn get(&self, class: &ClassRc) -> Result<Arc<PropertyModel>> {
        if !self.is_cache_enabled() {
            return self.resolver.resolve(class).map(Arc::new);
        }

        let key = identity(class);
        if let Some(model) = self.models.get(&key) {
            trace!(class = %class.name, "metadata cache hit");
            return Ok(model.value().clone());
        }

        trace!(class = %class.name, "metadata cache miss");
        let model = Arc::new(self.resolver.resolve(class)?);
        self.models.insert(key, model.clone());
        Ok(model)
    }

    /// Resolve and cache many classes in parallel.
    ///
    /// # Errors
    /// Returns the first resolution error encountered; models resolved before it stay cached.
    pub fn resolve_all(&self, classes: &[ClassRc]) -> Result<()> {
        classes.par_iter().try_for_each(|class| self.get(class).map(|_| ()))
    }

    /// Turn memoization on or off; existing entries are kept
    pub fn set_cache_enabled(&self, enabled: bool) {
        self.cache_enabled.store(enabled, Ordering::Release);
    }

    /// Returns true if models are memoized
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled.load(Ordering::Acquire)
    }

    /// Returns true if a model for `class` is cached
    pub fn contains(&self, class: &ClassRc) -> bool {
        self.models.contains_key(&identity(class))
    }

    /// Number of cached models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns true if no model is cached
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

fn identity(class: &ClassRc) -> usize {
    Arc::as_ptr(class) as usize
}

impl Default for MetadataCache {
    fn default() -> Self {
        Self::new()
    }
}
