use std::any::Any;

use crate::{
    metadata::member::{FieldRc, MethodRc, Value},
    Error, Result,
};

/// Reads or writes one property regardless of whether it is backed by a method or a field.
///
/// Getter variants return `Some(value)`, setter variants consume exactly one argument and
/// return `None`. Failures of the backing member surface as [`Error::Invocation`] carrying the
/// declaring class and member name.
#[derive(Clone)]
pub enum Invoker {
    /// Zero-argument accessor method
    MethodGetter(MethodRc),
    /// One-argument mutator method
    MethodSetter(MethodRc),
    /// Direct field read
    FieldReader(FieldRc),
    /// Direct field write
    FieldWriter(FieldRc),
}

impl Invoker {
    /// Invoke the underlying member on `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if the member fails, the target has the wrong type or the
    /// number of arguments does not fit the variant.
    pub fn invoke(&self, target: &mut dyn Any, mut args: Vec<Value>) -> Result<Option<Value>> {
        match self {
            Invoker::MethodGetter(method) | Invoker::MethodSetter(method) => {
                method.invoke(target, args)
            }
            Invoker::FieldReader(field) => {
                if !args.is_empty() {
                    return Err(invocation_error!(
                        field.declaring_type,
                        field.name,
                        "field read takes no arguments, got {}",
                        args.len()
                    ));
                }
                field.read(&*target).map(Some)
            }
            Invoker::FieldWriter(field) => {
                if args.len() != 1 {
                    return Err(invocation_error!(
                        field.declaring_type,
                        field.name,
                        "field write takes exactly one argument, got {}",
                        args.len()
                    ));
                }
                field.write(target, args.remove(0)).map(|()| None)
            }
        }
    }

    /// Read the property value from `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if this is a setter or the read fails.
    pub fn read(&self, target: &mut dyn Any) -> Result<Value> {
        self.invoke(target, Vec::new())?.ok_or_else(|| {
            invocation_error!(self.declaring_type(), self.member_name(), "accessor returned no value")
        })
    }

    /// Write `value` into the property on `target`
    ///
    /// # Errors
    /// Returns [`Error::Invocation`] if this is a getter or the write fails.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        self.invoke(target, vec![value]).map(|_| ())
    }

    /// Returns true for the method-backed variants
    pub fn is_method(&self) -> bool {
        matches!(self, Invoker::MethodGetter(_) | Invoker::MethodSetter(_))
    }

    /// Returns true for the field-backed variants
    pub fn is_field(&self) -> bool {
        !self.is_method()
    }

    /// Name of the backing method or field
    pub fn member_name(&self) -> &str {
        match self {
            Invoker::MethodGetter(method) | Invoker::MethodSetter(method) => &method.name,
            Invoker::FieldReader(field) | Invoker::FieldWriter(field) => &field.name,
        }
    }

    /// Name of the class declaring the backing member
    pub fn declaring_type(&self) -> &str {
        match self {
            Invoker::MethodGetter(method) | Invoker::MethodSetter(method) => {
                &method.declaring_type
            }
            Invoker::FieldReader(field) | Invoker::FieldWriter(field) => &field.declaring_type,
        }
    }
}

impl PartialEq for Invoker {
    /// Two invokers are equal when they have the same role and share the backing member
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Invoker::MethodGetter(a), Invoker::MethodGetter(b))
            | (Invoker::MethodSetter(a), Invoker::MethodSetter(b)) => std::sync::Arc::ptr_eq(a, b),
            (Invoker::FieldReader(a), Invoker::FieldReader(b))
            | (Invoker::FieldWriter(a), Invoker::FieldWriter(b)) => std::sync::Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self {
            Invoker::MethodGetter(_) => "MethodGetter",
            Invoker::MethodSetter(_) => "MethodSetter",
            Invoker::FieldReader(_) => "FieldReader",
            Invoker::FieldWriter(_) => "FieldWriter",
        };
        write!(f, "{}({}.{})", kind, self.declaring_type(), self.member_name())
    }
}
