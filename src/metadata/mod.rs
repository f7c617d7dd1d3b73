//! Type model for property resolution.
//!
//! This module contains the registration-based description of the types whose properties are
//! resolved: tokens identifying each type, the registry owning all type descriptors, and the
//! methods, fields and constructors declared on them.
//!
//! # Key Components
//!
//! - [`token`] - Compact identity of a registered type
//! - [`typesystem`] - Class descriptors, the registry and the builder
//! - [`member`] - Method, field and constructor descriptors with their callable bodies
//!
//! # Examples
//!
//! ```rust
//! use propscope::{ClassBuilder, ClassRegistry, PrimitiveKind};
//!
//! let registry = ClassRegistry::new();
//! let shape = ClassBuilder::interface(&registry, "geo.Shape")?
//!     .abstract_method("getArea", &registry.primitive(PrimitiveKind::F64), &[])
//!     .build();
//! let circle = ClassBuilder::new(&registry, "geo.Circle")?
//!     .implements(&shape)
//!     .build();
//!
//! assert!(shape.is_assignable_from(&circle));
//! assert_eq!(registry.get_by_name("geo.Circle").unwrap().token, circle.token);
//! # Ok::<(), propscope::Error>(())
//! ```

/// Methods, fields and constructors of registered types
pub mod member;
/// Commonly used type token
pub mod token;
/// Class descriptors, registry and builder
pub mod typesystem;
