//! Central class registry.
//!
//! This module provides the `ClassRegistry`, a thread-safe registry owning every
//! [`ClassDef`] declared for property resolution. It is the only strong owner of the type
//! descriptors; all links between types (supertypes, member signatures) are weak.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary index using [`Token`]s in a skip list
//! - **Name-based lookup**: Secondary index from fully qualified name to token
//! - **Primitive table**: Fixed array of the built-in types, seeded at construction
//!
//! # Thread Safety
//!
//! - Lock-free primary storage (`SkipMap`)
//! - Concurrent secondary index (`DashMap`), whose entry API makes name registration atomic
//! - Atomic token generation
//!
//! The registry never forgets a type; its size is proportional to the number of types ever
//! declared.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use strum::IntoEnumIterator;

use crate::{
    metadata::{
        token::{Token, TOKEN_KIND_ARRAY, TOKEN_KIND_CLASS},
        typesystem::{ClassDef, ClassFlags, ClassRc, PrimitiveKind},
    },
    Error::TypeInsert,
    Result,
};

/// Central registry for all declared types.
///
/// # Examples
///
/// ```rust
/// use propscope::{ClassRegistry, PrimitiveKind};
///
/// let registry = ClassRegistry::new();
/// let string = registry.primitive(PrimitiveKind::String);
/// assert_eq!(registry.get_by_name("String").unwrap().token, string.token);
/// assert!(registry.root().is_assignable_from(&string));
/// ```
pub struct ClassRegistry {
    /// Primary type storage indexed by token
    types: SkipMap<Token, ClassRc>,
    /// Secondary index: fully qualified name to token
    types_by_name: DashMap<String, Token>,
    /// Built-in types, indexed by [`PrimitiveKind::index`]
    primitives: Vec<ClassRc>,
    /// Sequence for declared classes and interfaces
    next_class: AtomicU32,
    /// Sequence for array types
    next_array: AtomicU32,
}

impl ClassRegistry {
    /// Create a new registry seeded with the built-in types
    pub fn new() -> Self {
        let primitives: Vec<ClassRc> = PrimitiveKind::iter()
            .map(|kind| {
                Arc::new(ClassDef::new(
                    kind.token(),
                    kind.name().to_string(),
                    kind.flags(),
                ))
            })
            .collect();

        let registry = ClassRegistry {
            types: SkipMap::new(),
            types_by_name: DashMap::new(),
            primitives,
            next_class: AtomicU32::new(1),
            next_array: AtomicU32::new(1),
        };

        let root = registry.root();
        for primitive in &registry.primitives {
            if primitive.name == PrimitiveKind::String.name() {
                primitive.set_base(&root);
            }
            registry
                .types_by_name
                .insert(primitive.name.clone(), primitive.token);
            registry.types.insert(primitive.token, primitive.clone());
        }

        registry
    }

    /// The universal root type `Object`
    pub fn root(&self) -> ClassRc {
        self.primitive(PrimitiveKind::Object)
    }

    /// Get one of the built-in types
    pub fn primitive(&self, kind: PrimitiveKind) -> ClassRc {
        self.primitives[kind.index()].clone()
    }

    /// Look up a type by token
    pub fn get(&self, token: &Token) -> Option<ClassRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by its fully qualified name
    pub fn get_by_name(&self, name: &str) -> Option<ClassRc> {
        let token = *self.types_by_name.get(name)?;
        self.get(&token)
    }

    /// Register a new, empty class or interface.
    ///
    /// The caller is expected to populate supertypes and members afterwards, usually through
    /// a [`crate::ClassBuilder`].
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the name is already registered.
    pub fn declare(&self, name: &str, flags: ClassFlags) -> Result<ClassRc> {
        match self.types_by_name.entry(name.to_string()) {
            Entry::Occupied(_) => Err(TypeInsert(name.to_string())),
            Entry::Vacant(vacant) => {
                let row = self.next_class.fetch_add(1, Ordering::Relaxed);
                let token = Token::from_parts(TOKEN_KIND_CLASS, row);
                let class = Arc::new(ClassDef::new(token, name.to_string(), flags));

                self.types.insert(token, class.clone());
                vacant.insert(token);
                Ok(class)
            }
        }
    }

    /// Get or create the array type whose elements are `element`.
    ///
    /// Array types are named `<element>[]`, derive from the root and are shared: asking twice
    /// for the same element type yields the same `ClassDef`.
    pub fn array_of(&self, element: &ClassRc) -> ClassRc {
        let name = format!("{}[]", element.name);
        match self.types_by_name.entry(name) {
            Entry::Occupied(mut occupied) => {
                if let Some(existing) = self.get(occupied.get()) {
                    return existing;
                }
                let class = self.new_array(occupied.key(), element);
                occupied.insert(class.token);
                class
            }
            Entry::Vacant(vacant) => {
                let class = self.new_array(vacant.key(), element);
                vacant.insert(class.token);
                class
            }
        }
    }

    fn new_array(&self, name: &str, element: &ClassRc) -> ClassRc {
        let row = self.next_array.fetch_add(1, Ordering::Relaxed);
        let token = Token::from_parts(TOKEN_KIND_ARRAY, row);
        let class = Arc::new(ClassDef::new(
            token,
            name.to_string(),
            ClassFlags::ARRAY | ClassFlags::FINAL,
        ));
        class.set_base(&self.root());
        class.set_element_type(element);

        self.types.insert(token, class.clone());
        class
    }

    /// Number of registered types, built-ins included
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if no type is registered (never the case after construction)
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All registered types in token order
    pub fn all_types(&self) -> Vec<ClassRc> {
        self.types.iter().map(|entry| entry.value().clone()).collect()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
