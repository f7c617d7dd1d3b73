use std::collections::HashMap;

use crate::{
    metadata::{member::ConstructorRc, typesystem::ClassRc},
    reflection::invoker::Invoker,
    Error, Result,
};

/// The resolved property view of one class.
///
/// A model is built once by [`crate::reflection::AccessorResolver`] and never mutated
/// afterwards, so it can be shared freely between threads. Every readable name has a getter
/// invoker and a getter type; every writable name has a setter invoker and a setter type.
pub struct PropertyModel {
    pub(crate) class: ClassRc,
    pub(crate) readable: Vec<String>,
    pub(crate) writable: Vec<String>,
    pub(crate) getters: HashMap<String, Invoker>,
    pub(crate) setters: HashMap<String, Invoker>,
    pub(crate) getter_types: HashMap<String, ClassRc>,
    pub(crate) setter_types: HashMap<String, ClassRc>,
    pub(crate) default_constructor: Option<ConstructorRc>,
    pub(crate) case_insensitive: HashMap<String, String>,
}

impl PropertyModel {
    /// The class this model describes
    pub fn class(&self) -> &ClassRc {
        &self.class
    }

    /// Names of all readable properties, in discovery order
    pub fn readable_names(&self) -> &[String] {
        &self.readable
    }

    /// Names of all writable properties, in discovery order
    pub fn writable_names(&self) -> &[String] {
        &self.writable
    }

    /// Returns true if `name` is readable
    pub fn has_getter(&self, name: &str) -> bool {
        self.getters.contains_key(name)
    }

    /// Returns true if `name` is writable
    pub fn has_setter(&self, name: &str) -> bool {
        self.setters.contains_key(name)
    }

    /// The type a read of `name` produces
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not readable.
    pub fn getter_type(&self, name: &str) -> Result<ClassRc> {
        self.getter_types
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found("getter", name))
    }

    /// The type a write of `name` accepts
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not writable.
    pub fn setter_type(&self, name: &str) -> Result<ClassRc> {
        self.setter_types
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found("setter", name))
    }

    /// The invoker reading `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not readable.
    pub fn get_invoker(&self, name: &str) -> Result<Invoker> {
        self.getters
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found("getter", name))
    }

    /// The invoker writing `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not writable.
    pub fn set_invoker(&self, name: &str) -> Result<Invoker> {
        self.setters
            .get(name)
            .cloned()
            .ok_or_else(|| self.not_found("setter", name))
    }

    /// Case-insensitive lookup of a readable or writable property.
    ///
    /// Returns the property name with its canonical capitalisation.
    pub fn find_property(&self, name: &str) -> Option<&str> {
        self.case_insensitive
            .get(&name.to_uppercase())
            .map(String::as_str)
    }

    /// The zero-argument constructor
    ///
    /// # Errors
    /// Returns [`Error::NoDefaultConstructor`] if the class has none.
    pub fn default_constructor(&self) -> Result<ConstructorRc> {
        self.default_constructor
            .clone()
            .ok_or_else(|| Error::NoDefaultConstructor(self.class.name.clone()))
    }

    /// Returns true if the class has a usable zero-argument constructor
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    fn not_found(&self, kind: &'static str, name: &str) -> Error {
        Error::PropertyNotFound {
            kind,
            property: name.to_string(),
            class: self.class.name.clone(),
        }
    }
}

impl PartialEq for PropertyModel {
    fn eq(&self, other: &Self) -> bool {
        let same_types = |a: &HashMap<String, ClassRc>, b: &HashMap<String, ClassRc>| {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|o| o.token == v.token))
        };
        let same_ctor = match (&self.default_constructor, &other.default_constructor) {
            (Some(a), Some(b)) => std::sync::Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };

        self.class.token == other.class.token
            && self.readable == other.readable
            && self.writable == other.writable
            && self.getters == other.getters
            && self.setters == other.setters
            && same_types(&self.getter_types, &other.getter_types)
            && same_types(&self.setter_types, &other.setter_types)
            && same_ctor
            && self.case_insensitive == other.case_insensitive
    }
}

impl std::fmt::Debug for PropertyModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyModel")
            .field("class", &self.class.name)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("default_constructor", &self.default_constructor.is_some())
            .finish()
    }
}
