//! # propscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the propscope library. Import this module to get quick access to the essential
//! types for declaring classes and resolving their properties.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all propscope operations
pub use crate::Error;

/// The result type used throughout propscope
pub use crate::Result;

// ================================================================================================
// Type Model
// ================================================================================================

/// Type token
pub use crate::metadata::token::Token;

/// Class descriptors, registry and builder
pub use crate::metadata::typesystem::{
    ClassBuilder, ClassDef, ClassFlags, ClassRc, ClassRef, ClassRegistry, PrimitiveKind,
};

/// Member descriptors and flags
pub use crate::metadata::member::{
    ConstructorDef, ConstructorFlags, FieldDef, FieldFlags, MethodDef, MethodFlags, Value,
};

// ================================================================================================
// Property Resolution
// ================================================================================================

/// Models, invokers and paths
pub use crate::reflection::{
    AccessorResolver, Invoker, MetaClass, MetadataCache, PropertyModel, PropertyTokenizer,
    ReflectionConfig,
};

// ================================================================================================
// Caching
// ================================================================================================

/// Store capability, in-memory store and blocking decorator
pub use crate::cache::{BlockingCache, BlockingCacheConfig, Cache, PerpetualCache};
