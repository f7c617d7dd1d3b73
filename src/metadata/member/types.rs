//! Member flags and body signatures.
//!
//! # Key Types
//! - [`MethodFlags`], [`FieldFlags`], [`ConstructorFlags`]: Modifier flags
//! - [`Value`]: Boxed dynamically typed value passed to and returned from bodies
//! - [`MethodBody`], [`FieldReader`], [`FieldWriter`], [`ConstructorBody`]: Registered callables

use std::{any::Any, sync::Arc};

use bitflags::bitflags;

use crate::Result;

/// A dynamically typed value exchanged with member bodies
pub type Value = Box<dyn Any + Send + Sync>;

/// Body of a method: receives the target instance and the arguments, returns the result
/// (`None` for `void` methods)
pub type MethodBody = Arc<dyn Fn(&mut dyn Any, Vec<Value>) -> Result<Option<Value>> + Send + Sync>;

/// Reads a field from a target instance
pub type FieldReader = Arc<dyn Fn(&dyn Any) -> Result<Value> + Send + Sync>;

/// Writes a field on a target instance
pub type FieldWriter = Arc<dyn Fn(&mut dyn Any, Value) -> Result<()> + Send + Sync>;

/// Body of a constructor: receives the arguments, returns the new instance
pub type ConstructorBody = Arc<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Method modifier flags
    pub struct MethodFlags: u32 {
        /// Accessible by anyone
        const PUBLIC = 0x0001;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0002;
        /// Method does not take an instance
        const STATIC = 0x0004;
        /// Method has no body (interface declarations, abstract classes)
        const ABSTRACT = 0x0008;
        /// Compiler-generated forwarding stub for a covariant or generic override
        const BRIDGE = 0x0010;
        /// Generated by tooling rather than declared in source
        const SYNTHETIC = 0x0020;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Field modifier flags
    pub struct FieldFlags: u32 {
        /// Accessible by anyone
        const PUBLIC = 0x0001;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0002;
        /// Field belongs to the type rather than an instance
        const STATIC = 0x0004;
        /// Field cannot be reassigned after initialization
        const FINAL = 0x0008;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Constructor modifier flags
    pub struct ConstructorFlags: u32 {
        /// Accessible by anyone
        const PUBLIC = 0x0001;
        /// Accessible only by the declaring type
        const PRIVATE = 0x0002;
    }
}

impl FieldFlags {
    /// A `static final` field is a type-wide constant and never writable as a property
    #[must_use]
    pub fn is_class_constant(&self) -> bool {
        self.contains(FieldFlags::STATIC | FieldFlags::FINAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_constant() {
        assert!((FieldFlags::STATIC | FieldFlags::FINAL | FieldFlags::PUBLIC).is_class_constant());
        assert!(!FieldFlags::FINAL.is_class_constant());
        assert!(!FieldFlags::STATIC.is_class_constant());
    }
}
