//! Configuration for property resolution.

/// Configuration for [`crate::MetadataCache`] and [`crate::reflection::AccessorResolver`].
///
/// Both switches default to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionConfig {
    /// Memoize resolved models per type (default: true).
    pub cache_enabled: bool,

    /// Let non-public fields and constructors take part in resolution (default: true).
    ///
    /// When disabled, only public fields back properties and only a public zero-argument
    /// constructor counts as the default constructor.
    pub allow_private_access: bool,
}

impl Default for ReflectionConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            allow_private_access: true,
        }
    }
}

impl ReflectionConfig {
    /// Creates a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables model memoization.
    ///
    /// # Arguments
    ///
    /// * `enabled` - Whether resolved models are kept.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    /// Allows or forbids access to non-public members.
    ///
    /// # Returns
    ///
    /// The modified configuration (builder pattern).
    #[must_use]
    pub fn with_private_access(mut self, allowed: bool) -> Self {
        self.allow_private_access = allowed;
        self
    }
}
