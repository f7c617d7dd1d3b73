use thiserror::Error;

use crate::metadata::token::Token;

macro_rules! invocation_error {
    // Single string version
    ($class:expr, $member:expr, $msg:expr) => {
        crate::Error::Invocation {
            class: $class.to_string(),
            member: $member.to_string(),
            message: $msg.to_string(),
        }
    };

    // Format string with arguments version
    ($class:expr, $member:expr, $fmt:expr, $($arg:tt)*) => {
        crate::Error::Invocation {
            class: $class.to_string(),
            member: $member.to_string(),
            message: format!($fmt, $($arg)*),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Property Resolution Errors
/// - [`Error::AmbiguousAccessor`] - Conflicting getters or setters could not be resolved
/// - [`Error::PropertyNotFound`] - A getter/setter was requested for an unknown property
/// - [`Error::NoDefaultConstructor`] - A type without a reachable zero-argument constructor
/// - [`Error::Invocation`] - An accessor or constructor body failed
///
/// ## Type Registry Errors
/// - [`Error::TypeInsert`] - A type name was registered twice
/// - [`Error::TypeNotFound`] - A type reference no longer resolves
///
/// ## Blocking Cache Errors
/// - [`Error::LockTimeout`] - The configured timeout elapsed before the key lock was acquired
/// - [`Error::InterruptedWait`] - A thread waiting for a key lock was interrupted
/// - [`Error::LockError`] - Internal synchronization state was poisoned
///
/// None of these are retried internally; the caller decides whether to try again.
///
/// # Examples
///
/// ```rust
/// use propscope::{ClassRegistry, MetadataCache, Error};
///
/// let registry = ClassRegistry::new();
/// let empty = propscope::ClassBuilder::new(&registry, "demo.Empty")?.build();
/// let cache = MetadataCache::new();
///
/// match cache.get(&empty)?.getter_type("missing") {
///     Err(Error::PropertyNotFound { property, .. }) => assert_eq!(property, "missing"),
///     other => panic!("unexpected: {:?}", other.map(|t| t.name.clone())),
/// }
/// # Ok::<(), propscope::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Getter or setter candidates for one property could not be narrowed to a single member.
    ///
    /// Raised while resolving a type when two getters share a return type, when their return
    /// types are unrelated, or when overloaded setters cannot be matched against a getter type.
    /// The type's model is not cached.
    #[error("Illegal overloaded {kind} method with ambiguous type for property {property} in class {class}: [{}]", candidates.join(", "))]
    AmbiguousAccessor {
        /// `getter` or `setter`
        kind: &'static str,
        /// The derived property name
        property: String,
        /// The class on which the first candidate was declared
        class: String,
        /// Rendered signatures of all competing members
        candidates: Vec<String>,
    },

    /// A getter or setter (or its type) was requested for a property the type does not have.
    #[error("There is no {kind} for property named '{property}' in '{class}'")]
    PropertyNotFound {
        /// `getter` or `setter`
        kind: &'static str,
        /// The requested property name
        property: String,
        /// The class that was inspected
        class: String,
    },

    /// The type has no reachable zero-argument constructor.
    #[error("There is no default constructor for {0}")]
    NoDefaultConstructor(String),

    /// An accessor or constructor invocation failed.
    ///
    /// Wraps the failure with the class and member it happened on.
    #[error("Error invoking {member} on {class}: {message}")]
    Invocation {
        /// The class declaring the member
        class: String,
        /// The member that was invoked
        member: String,
        /// Description of the underlying failure
        message: String,
    },

    /// The lock for a cache key could not be acquired within the configured timeout.
    #[error("Couldn't get a lock in {timeout_ms}ms for the key {key} at the cache {cache}")]
    LockTimeout {
        /// Debug rendering of the cache key
        key: String,
        /// Identifier of the wrapped store
        cache: String,
        /// The timeout that elapsed
        timeout_ms: u64,
    },

    /// A thread waiting for a cache key lock was interrupted.
    #[error("Got interrupted while trying to acquire lock for key {key} at the cache {cache}")]
    InterruptedWait {
        /// Debug rendering of the cache key
        key: String,
        /// Identifier of the wrapped store
        cache: String,
    },

    /// Failed to lock internal state, a thread panicked while holding it.
    #[error("Failed to lock target")]
    LockError,

    /// Failed to insert new type into the `ClassRegistry`, the name is already taken.
    #[error("Failed to insert new type into ClassRegistry - {0}")]
    TypeInsert(String),

    /// A weak type reference could not be upgraded, the type is no longer registered.
    #[error("Failed to find type in ClassRegistry - {0}")]
    TypeNotFound(Token),
}
