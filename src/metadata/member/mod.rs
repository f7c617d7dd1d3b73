//! Members declared on a [`crate::ClassDef`]: methods, fields and constructors.
//!
//! Members carry their declared types as weak [`ClassRef`]s plus an optional body. A member
//! without a body is a pure declaration (an interface method, or a field the registering
//! code chose not to expose); invoking it fails with [`crate::Error::Invocation`].
//!
//! Every failure raised by a body is re-wrapped with the declaring class and member name, so
//! callers always learn where an invocation went wrong.

mod types;

use std::{any::Any, sync::Arc};

pub use types::{
    ConstructorBody, ConstructorFlags, FieldFlags, FieldReader, FieldWriter, MethodBody,
    MethodFlags, Value,
};

use crate::{
    metadata::{
        token::Token,
        typesystem::{ClassRc, ClassRef},
    },
    Error, Result,
};

/// Reference to a `MethodDef`
pub type MethodRc = Arc<MethodDef>;
/// A vector that holds a list of `MethodDef`
pub type MethodList = Arc<boxcar::Vec<MethodRc>>;
/// Reference to a `FieldDef`
pub type FieldRc = Arc<FieldDef>;
/// A vector that holds a list of `FieldDef`
pub type FieldList = Arc<boxcar::Vec<FieldRc>>;
/// Reference to a `ConstructorDef`
pub type ConstructorRc = Arc<ConstructorDef>;
/// A vector that holds a list of `ConstructorDef`
pub type ConstructorList = Arc<boxcar::Vec<ConstructorRc>>;

/// Identity of a method across a type hierarchy.
///
/// Two declarations with the same signature are the same method: the one found first while
/// walking from the most derived type upwards overrides the others.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSignature {
    /// Token of the declared return type
    pub return_type: Token,
    /// Method name
    pub name: String,
    /// Tokens of the declared parameter types
    pub params: Vec<Token>,
}

/// A method declaration
pub struct MethodDef {
    /// Method name
    pub name: String,
    /// Name of the declaring class
    pub declaring_type: String,
    /// Declared return type (`void` for procedures)
    pub return_type: ClassRef,
    /// Declared parameter types
    pub params: Vec<ClassRef>,
    /// Modifier flags
    pub flags: MethodFlags,
    body: Option<MethodBody>,
}

impl MethodDef {
    /// Create a new method declaration
    pub fn new(
        declaring_type: &str,
        name: &str,
        return_type: &ClassRc,
        params: &[&ClassRc],
        flags: MethodFlags,
        body: Option<MethodBody>,
    ) -> Self {
        MethodDef {
            name: name.to_string(),
            declaring_type: declaring_type.to_string(),
            return_type: return_type.into(),
            params: params.iter().map(|p| ClassRef::new(p)).collect(),
            flags,
            body,
        }
    }

    /// Number of declared parameters
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// Returns true for compiler-generated forwarding stubs
    pub fn is_bridge(&self) -> bool {
        self.flags.contains(MethodFlags::BRIDGE)
    }

    /// Returns true if the method has no body to invoke
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// The signature used to detect overrides
    pub fn signature(&self) -> MethodSignature {
        MethodSignature {
            return_type: self.return_type.token(),
            name: self.name.clone(),
            params: self.params.iter().map(ClassRef::token).collect(),
        }
    }

    /// Human readable rendering, e.g. `shop.Item shop.Order.getItem()`
    pub fn describe(&self) -> String {
        let params = self
            .params
            .iter()
            .map(type_display)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{} {}.{}({})",
            type_display(&self.return_type),
            self.declaring_type,
            self.name,
            params
        )
    }

    /// Invoke this method on `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if the method has no body, the argument count does not
    /// match the declaration, or the body fails.
    pub fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>> {
        let Some(body) = &self.body else {
            return Err(invocation_error!(
                self.declaring_type,
                self.name,
                "method has no body"
            ));
        };
        if args.len() != self.params.len() {
            return Err(invocation_error!(
                self.declaring_type,
                self.name,
                "expected {} arguments, got {}",
                self.params.len(),
                args.len()
            ));
        }

        body(target, args).map_err(|e| wrap_failure(e, &self.declaring_type, &self.name))
    }
}

/// A field declaration
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Name of the declaring class
    pub declaring_type: String,
    /// Declared type
    pub field_type: ClassRef,
    /// Modifier flags
    pub flags: FieldFlags,
    reader: Option<FieldReader>,
    writer: Option<FieldWriter>,
}

impl FieldDef {
    /// Create a new field declaration
    pub fn new(
        declaring_type: &str,
        name: &str,
        field_type: &ClassRc,
        flags: FieldFlags,
        reader: Option<FieldReader>,
        writer: Option<FieldWriter>,
    ) -> Self {
        FieldDef {
            name: name.to_string(),
            declaring_type: declaring_type.to_string(),
            field_type: field_type.into(),
            flags,
            reader,
            writer,
        }
    }

    /// Returns true if the field is declared public
    pub fn is_public(&self) -> bool {
        self.flags.contains(FieldFlags::PUBLIC)
    }

    /// Read the field from `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if no reader was registered or the reader fails.
    pub fn read(&self, target: &dyn Any) -> Result<Value> {
        let Some(reader) = &self.reader else {
            return Err(invocation_error!(
                self.declaring_type,
                self.name,
                "field is not readable"
            ));
        };
        reader(target).map_err(|e| wrap_failure(e, &self.declaring_type, &self.name))
    }

    /// Write `value` into the field on `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if no writer was registered or the writer fails.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        let Some(writer) = &self.writer else {
            return Err(invocation_error!(
                self.declaring_type,
                self.name,
                "field is not writable"
            ));
        };
        writer(target, value).map_err(|e| wrap_failure(e, &self.declaring_type, &self.name))
    }
}

/// A constructor declaration
pub struct ConstructorDef {
    /// Name of the declaring class
    pub declaring_type: String,
    /// Declared parameter types
    pub params: Vec<ClassRef>,
    /// Modifier flags
    pub flags: ConstructorFlags,
    body: Option<ConstructorBody>,
}

impl ConstructorDef {
    /// Create a new constructor declaration
    pub fn new(
        declaring_type: &str,
        params: &[&ClassRc],
        flags: ConstructorFlags,
        body: Option<ConstructorBody>,
    ) -> Self {
        ConstructorDef {
            declaring_type: declaring_type.to_string(),
            params: params.iter().map(|p| ClassRef::new(p)).collect(),
            flags,
            body,
        }
    }

    /// Returns true for the zero-argument constructor
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// Returns true if the constructor is declared public
    pub fn is_public(&self) -> bool {
        self.flags.contains(ConstructorFlags::PUBLIC)
    }

    /// Create a new instance
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if the constructor has no body, the argument count does
    /// not match, or the body fails.
    pub fn new_instance(&self, args: Vec<Value>) -> Result<Value> {
        let Some(body) = &self.body else {
            return Err(invocation_error!(
                self.declaring_type,
                "<init>",
                "constructor has no body"
            ));
        };
        if args.len() != self.params.len() {
            return Err(invocation_error!(
                self.declaring_type,
                "<init>",
                "expected {} arguments, got {}",
                self.params.len(),
                args.len()
            ));
        }

        body(args).map_err(|e| wrap_failure(e, &self.declaring_type, "<init>"))
    }
}

fn type_display(class: &ClassRef) -> String {
    class
        .name()
        .unwrap_or_else(|| format!("<dropped {}>", class.token()))
}

fn wrap_failure(error: Error, class: &str, member: &str) -> Error {
    match error {
        Error::Invocation { .. } => error,
        other => invocation_error!(class, member, "{}", other),
    }
}

/// Downcast an invocation target to the registered Rust type
pub(crate) fn downcast_target<'a, T: Any>(
    target: &'a dyn Any,
    class: &str,
    member: &str,
) -> Result<&'a T> {
    target.downcast_ref::<T>().ok_or_else(|| {
        invocation_error!(
            class,
            member,
            "target is not an instance of {}",
            std::any::type_name::<T>()
        )
    })
}

/// Downcast a mutable invocation target to the registered Rust type
pub(crate) fn downcast_target_mut<'a, T: Any>(
    target: &'a mut dyn Any,
    class: &str,
    member: &str,
) -> Result<&'a mut T> {
    target.downcast_mut::<T>().ok_or_else(|| {
        invocation_error!(
            class,
            member,
            "target is not an instance of {}",
            std::any::type_name::<T>()
        )
    })
}

/// Unbox an argument to the registered Rust type
pub(crate) fn downcast_value<V: Any>(value: Value, class: &str, member: &str) -> Result<V> {
    value.downcast::<V>().map(|boxed| *boxed).map_err(|_| {
        invocation_error!(
            class,
            member,
            "argument is not a {}",
            std::any::type_name::<V>()
        )
    })
}
