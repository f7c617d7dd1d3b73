use std::sync::{Arc, Weak};

use crate::{
    metadata::{
        token::Token,
        typesystem::{ClassDef, ClassRc},
    },
    Error::TypeNotFound,
    Result,
};

/// A vector that holds `ClassRef` instances (weak references)
pub type ClassRefList = Arc<boxcar::Vec<ClassRef>>;

/// A smart reference to a `ClassDef` that holds a weak reference
///
/// Member signatures and supertypes point at other classes, and classes may point at
/// themselves (`Node::getNext() -> Node`). Holding those links weakly keeps the registry the
/// single owner of every `ClassDef` and avoids reference cycles.
#[derive(Clone, Debug)]
pub struct ClassRef {
    weak_ref: Weak<ClassDef>,
    token: Token,
}

impl ClassRef {
    /// Create a new `ClassRef` from a strong reference
    pub fn new(strong_ref: &ClassRc) -> Self {
        Self {
            weak_ref: Arc::downgrade(strong_ref),
            token: strong_ref.token,
        }
    }

    /// Get a strong reference to the type, returning None if the type has been dropped
    #[must_use]
    pub fn upgrade(&self) -> Option<ClassRc> {
        self.weak_ref.upgrade()
    }

    /// Get a strong reference to the type, failing with [`crate::Error::TypeNotFound`] if the
    /// type has been dropped
    ///
    /// # Errors
    /// Returns an error if the owning registry no longer holds the type.
    pub fn resolve(&self) -> Result<ClassRc> {
        self.weak_ref.upgrade().ok_or(TypeNotFound(self.token))
    }

    /// The token of the referenced type, available even after the type was dropped
    #[must_use]
    pub fn token(&self) -> Token {
        self.token
    }

    /// Check if the referenced type is still alive
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.weak_ref.strong_count() > 0
    }

    /// Get the name of the referenced type (if still alive)
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.upgrade().map(|t| t.name.clone())
    }
}

impl From<ClassRc> for ClassRef {
    fn from(strong_ref: ClassRc) -> Self {
        Self::new(&strong_ref)
    }
}

impl From<&ClassRc> for ClassRef {
    fn from(strong_ref: &ClassRc) -> Self {
        Self::new(strong_ref)
    }
}
