//! Registration-based type system.
//!
//! Rust has no runtime introspection, so the types whose properties are resolved are
//! described up front: each type is a [`ClassDef`] carrying its superclass, implemented
//! interfaces, methods, fields and constructors, and all of them live in a
//! [`ClassRegistry`]. The [`ClassBuilder`] offers a fluent API for declaring them, including
//! typed helpers that turn plain closures over Rust structs into method and field bodies.
//!
//! # Key Components
//!
//! - [`ClassDef`]: Descriptor of one class, interface, array or built-in type
//! - [`ClassRegistry`]: Central registry owning every descriptor, indexed by token and name
//! - [`ClassBuilder`]: Builder for declaring classes and their members
//! - [`PrimitiveKind`]: Built-in types (`Object`, `void`, scalars, `String`)
//!
//! # Examples
//!
//! ```rust
//! use propscope::{ClassBuilder, ClassRegistry, PrimitiveKind};
//!
//! #[derive(Default)]
//! struct Item { sku: String }
//!
//! let registry = ClassRegistry::new();
//! let string = registry.primitive(PrimitiveKind::String);
//! let item = ClassBuilder::new(&registry, "shop.Item")?
//!     .getter("getSku", &string, |item: &Item| item.sku.clone())
//!     .setter("setSku", &string, |item: &mut Item, sku: String| item.sku = sku)
//!     .default_constructor::<Item>()
//!     .build();
//!
//! assert_eq!(item.methods.count(), 2);
//! assert!(registry.root().is_assignable_from(&item));
//! # Ok::<(), propscope::Error>(())
//! ```

mod base;
mod builder;
mod primitives;
mod registry;

use std::{
    collections::HashSet,
    sync::{Arc, OnceLock},
};

use bitflags::bitflags;

pub use base::{ClassRef, ClassRefList};
pub use builder::ClassBuilder;
pub use primitives::PrimitiveKind;
pub use registry::ClassRegistry;

use crate::metadata::{
    member::{ConstructorList, FieldList, MethodList},
    token::Token,
};

/// A vector that holds a list of `ClassDef`
pub type ClassList = Arc<boxcar::Vec<ClassRc>>;
/// Reference to a `ClassDef`
pub type ClassRc = Arc<ClassDef>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Kind and modifier flags of a registered type
    pub struct ClassFlags: u32 {
        /// Type is an interface, it has no superclass and its methods have no bodies
        const INTERFACE = 0x0001;
        /// Type cannot be instantiated directly
        const ABSTRACT = 0x0002;
        /// Type cannot be extended
        const FINAL = 0x0004;
        /// Scalar built-in, assignable only to itself
        const PRIMITIVE = 0x0008;
        /// The universal root type
        const ROOT = 0x0010;
        /// Array type, see [`ClassDef::element_type`]
        const ARRAY = 0x0020;
    }
}

/// Describes one type: a class, an interface, an array or a built-in.
///
/// Member lists are append-only (`boxcar::Vec`) so declarations can be pushed after the type
/// is registered, which is how self-referential signatures are built.
pub struct ClassDef {
    /// Token, the identity of this type
    pub token: Token,
    /// Fully qualified name, unique within its registry
    pub name: String,
    /// Kind and modifier flags
    pub flags: ClassFlags,
    /// This types superclass (unset for the root, interfaces and primitives)
    base: OnceLock<ClassRef>,
    /// Element type of an array type
    element: OnceLock<ClassRef>,
    /// All interfaces this type implements (for interfaces: the interfaces it extends)
    pub interfaces: ClassRefList,
    /// All methods declared by this type, in declaration order
    pub methods: MethodList,
    /// All fields declared by this type, in declaration order
    pub fields: FieldList,
    /// All constructors declared by this type
    pub constructors: ConstructorList,
}

impl ClassDef {
    /// Create a new instance of a `ClassDef` without supertypes or members
    pub fn new(token: Token, name: String, flags: ClassFlags) -> Self {
        ClassDef {
            token,
            name,
            flags,
            base: OnceLock::new(),
            element: OnceLock::new(),
            interfaces: Arc::new(boxcar::Vec::new()),
            methods: Arc::new(boxcar::Vec::new()),
            fields: Arc::new(boxcar::Vec::new()),
            constructors: Arc::new(boxcar::Vec::new()),
        }
    }

    /// Access the superclass of this type, if it exists
    pub fn base(&self) -> Option<ClassRc> {
        self.base.get().and_then(ClassRef::upgrade)
    }

    /// Set the superclass. Returns `false` if it was already set.
    pub fn set_base(&self, base: &ClassRc) -> bool {
        self.base.set(base.into()).is_ok()
    }

    /// Access the element type of an array type
    pub fn element_type(&self) -> Option<ClassRc> {
        self.element.get().and_then(ClassRef::upgrade)
    }

    pub(crate) fn set_element_type(&self, element: &ClassRc) -> bool {
        self.element.set(element.into()).is_ok()
    }

    /// Returns the unqualified name (text after the last `.`)
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Returns true if this type is an interface
    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    /// Returns true if this type is a scalar built-in
    pub fn is_primitive(&self) -> bool {
        self.flags.contains(ClassFlags::PRIMITIVE)
    }

    /// Returns true if this type is the universal root
    pub fn is_root(&self) -> bool {
        self.flags.contains(ClassFlags::ROOT)
    }

    /// Returns true if this type is an array type
    pub fn is_array(&self) -> bool {
        self.flags.contains(ClassFlags::ARRAY)
    }

    /// Determines if a value of type `other` can be used where `self` is expected.
    ///
    /// - Every type is assignable to itself
    /// - The root accepts every non-primitive type
    /// - Primitives accept only themselves
    /// - Arrays accept arrays whose element types are assignable
    /// - Otherwise `self` must appear among `other`'s superclasses or interfaces (at any depth)
    pub fn is_assignable_from(&self, other: &ClassDef) -> bool {
        if self.token == other.token {
            return true;
        }
        if self.is_root() {
            return !other.is_primitive();
        }
        if self.is_primitive() || other.is_primitive() {
            return false;
        }
        if self.is_array() && other.is_array() {
            return match (self.element_type(), other.element_type()) {
                (Some(mine), Some(theirs)) => mine.is_assignable_from(&theirs),
                _ => false,
            };
        }

        let mut visited = HashSet::new();
        let mut pending = other.supertypes();
        while let Some(candidate) = pending.pop() {
            if candidate.token == self.token {
                return true;
            }
            if visited.insert(candidate.token) {
                pending.extend(candidate.supertypes());
            }
        }
        false
    }

    /// Direct supertypes: superclass first, then interfaces in declaration order
    pub fn supertypes(&self) -> Vec<ClassRc> {
        self.base()
            .into_iter()
            .chain(self.interfaces.iter().filter_map(|(_, i)| i.upgrade()))
            .collect()
    }
}

impl std::fmt::Debug for ClassDef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassDef")
            .field("token", &self.token)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .field("methods", &self.methods.count())
            .field("fields", &self.fields.count())
            .finish()
    }
}
