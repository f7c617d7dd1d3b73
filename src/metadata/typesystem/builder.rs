//! Builder for declaring classes and their members.
//!
//! This module provides the [`ClassBuilder`] struct, which offers a fluent API for registering
//! a class or interface in a [`ClassRegistry`] together with its supertypes, methods, fields and
//! constructors. This registration step replaces runtime introspection: whatever is declared
//! here is exactly what property resolution sees.
//!
//! The typed helpers ([`ClassBuilder::getter`], [`ClassBuilder::setter`],
//! [`ClassBuilder::field`], [`ClassBuilder::default_constructor`]) wrap closures over a concrete
//! Rust type into dynamically typed bodies. For anything else (bridge methods, static methods,
//! multi-argument methods) use [`ClassBuilder::method`] with a hand-written [`MethodBody`].
//!
//! # Example
//!
//! ```rust
//! use propscope::{ClassBuilder, ClassRegistry, PrimitiveKind};
//!
//! #[derive(Default)]
//! struct Node { next: Option<Box<Node>> }
//!
//! let registry = ClassRegistry::new();
//! let builder = ClassBuilder::new(&registry, "demo.Node")?;
//! let node = builder.this();
//! let node = builder
//!     .setter("setNext", &node, |n: &mut Node, next: Node| n.next = Some(Box::new(next)))
//!     .default_constructor::<Node>()
//!     .build();
//!
//! assert_eq!(node.base().unwrap().token, registry.root().token);
//! # Ok::<(), propscope::Error>(())
//! ```

use std::{any::Any, sync::Arc};

use crate::{
    metadata::{
        member::{
            downcast_target, downcast_target_mut, downcast_value, ConstructorBody,
            ConstructorDef, ConstructorFlags, FieldDef, FieldFlags, FieldReader, FieldWriter,
            MethodBody, MethodDef, MethodFlags, Value,
        },
        typesystem::{ClassFlags, ClassRc, ClassRegistry},
    },
    Result,
};

/// Provides a fluent API for declaring a class
pub struct ClassBuilder<'a> {
    /// Registry owning the declared class
    registry: &'a ClassRegistry,
    /// The class being populated, already registered
    class: ClassRc,
    /// Explicit superclass, the root is used when unset
    base: Option<ClassRc>,
}

impl<'a> ClassBuilder<'a> {
    /// Start declaring a concrete class
    ///
    /// ## Arguments
    /// * 'registry' - The registry to declare the class in
    /// * 'name'     - Fully qualified class name
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the name is already taken.
    pub fn new(registry: &'a ClassRegistry, name: &str) -> Result<Self> {
        Self::with_flags(registry, name, ClassFlags::empty())
    }

    /// Start declaring an interface
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the name is already taken.
    pub fn interface(registry: &'a ClassRegistry, name: &str) -> Result<Self> {
        Self::with_flags(registry, name, ClassFlags::INTERFACE | ClassFlags::ABSTRACT)
    }

    /// Start declaring a type with explicit flags
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the name is already taken.
    pub fn with_flags(registry: &'a ClassRegistry, name: &str, flags: ClassFlags) -> Result<Self> {
        let class = registry.declare(name, flags)?;
        Ok(ClassBuilder {
            registry,
            class,
            base: None,
        })
    }

    /// The class being declared, for self-referential signatures
    pub fn this(&self) -> ClassRc {
        self.class.clone()
    }

    /// Set the superclass
    #[must_use]
    pub fn extends(mut self, base: &ClassRc) -> Self {
        self.base = Some(base.clone());
        self
    }

    /// Add an implemented interface (for interfaces: an extended interface)
    #[must_use]
    pub fn implements(self, interface: &ClassRc) -> Self {
        self.class.interfaces.push(interface.into());
        self
    }

    /// Declare a method with an explicit body
    #[must_use]
    pub fn method(
        self,
        name: &str,
        return_type: &ClassRc,
        params: &[&ClassRc],
        flags: MethodFlags,
        body: Option<MethodBody>,
    ) -> Self {
        self.class.methods.push(Arc::new(MethodDef::new(
            &self.class.name,
            name,
            return_type,
            params,
            flags,
            body,
        )));
        self
    }

    /// Declare a method without a body
    #[must_use]
    pub fn abstract_method(self, name: &str, return_type: &ClassRc, params: &[&ClassRc]) -> Self {
        self.method(
            name,
            return_type,
            params,
            MethodFlags::PUBLIC | MethodFlags::ABSTRACT,
            None,
        )
    }

    /// Declare a public zero-argument method reading from a `T`
    #[must_use]
    pub fn getter<T, V, F>(self, name: &str, return_type: &ClassRc, read: F) -> Self
    where
        T: Any,
        V: Any + Send + Sync,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let class = self.class.name.clone();
        let member = name.to_string();
        let body: MethodBody = Arc::new(move |target: &mut dyn Any, _args: Vec<Value>| {
            let instance = downcast_target::<T>(&*target, &class, &member)?;
            Ok(Some(Box::new(read(instance)) as Value))
        });
        self.method(name, return_type, &[], MethodFlags::PUBLIC, Some(body))
    }

    /// Declare a public one-argument method writing into a `T`
    #[must_use]
    pub fn setter<T, V, F>(self, name: &str, param: &ClassRc, write: F) -> Self
    where
        T: Any,
        V: Any + Send + Sync,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let class = self.class.name.clone();
        let member = name.to_string();
        let body: MethodBody = Arc::new(move |target: &mut dyn Any, mut args: Vec<Value>| {
            let instance = downcast_target_mut::<T>(target, &class, &member)?;
            let value = downcast_value::<V>(args.remove(0), &class, &member)?;
            write(instance, value);
            Ok(None)
        });
        let void = self.registry.primitive(crate::PrimitiveKind::Void);
        self.method(name, &void, &[param], MethodFlags::PUBLIC, Some(body))
    }

    /// Declare a readable and writable field of a `T`
    #[must_use]
    pub fn field<T, V, R, W>(
        self,
        name: &str,
        field_type: &ClassRc,
        flags: FieldFlags,
        read: R,
        write: W,
    ) -> Self
    where
        T: Any,
        V: Any + Send + Sync,
        R: Fn(&T) -> V + Send + Sync + 'static,
        W: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let reader = self.field_reader(name, read);
        let class = self.class.name.clone();
        let member = name.to_string();
        let writer: FieldWriter = Arc::new(move |target: &mut dyn Any, value: Value| {
            let instance = downcast_target_mut::<T>(target, &class, &member)?;
            write(instance, downcast_value::<V>(value, &class, &member)?);
            Ok(())
        });
        self.push_field(name, field_type, flags, Some(reader), Some(writer))
    }

    /// Declare a field of a `T` that can only be read, such as a constant
    #[must_use]
    pub fn read_only_field<T, V, R>(
        self,
        name: &str,
        field_type: &ClassRc,
        flags: FieldFlags,
        read: R,
    ) -> Self
    where
        T: Any,
        V: Any + Send + Sync,
        R: Fn(&T) -> V + Send + Sync + 'static,
    {
        let reader = self.field_reader(name, read);
        self.push_field(name, field_type, flags, Some(reader), None)
    }

    fn field_reader<T, V, R>(&self, name: &str, read: R) -> FieldReader
    where
        T: Any,
        V: Any + Send + Sync,
        R: Fn(&T) -> V + Send + Sync + 'static,
    {
        let class = self.class.name.clone();
        let member = name.to_string();
        Arc::new(move |target: &dyn Any| {
            let instance = downcast_target::<T>(target, &class, &member)?;
            Ok(Box::new(read(instance)) as Value)
        })
    }

    fn push_field(
        self,
        name: &str,
        field_type: &ClassRc,
        flags: FieldFlags,
        reader: Option<FieldReader>,
        writer: Option<FieldWriter>,
    ) -> Self {
        self.class.fields.push(Arc::new(FieldDef::new(
            &self.class.name,
            name,
            field_type,
            flags,
            reader,
            writer,
        )));
        self
    }

    /// Declare a public zero-argument constructor producing `T::default()`
    #[must_use]
    pub fn default_constructor<T>(self) -> Self
    where
        T: Default + Any + Send + Sync,
    {
        let body: ConstructorBody = Arc::new(|_args: Vec<Value>| Ok(Box::new(T::default()) as Value));
        self.constructor(&[], ConstructorFlags::PUBLIC, Some(body))
    }

    /// Declare a constructor with an explicit body
    #[must_use]
    pub fn constructor(
        self,
        params: &[&ClassRc],
        flags: ConstructorFlags,
        body: Option<ConstructorBody>,
    ) -> Self {
        self.class.constructors.push(Arc::new(ConstructorDef::new(
            &self.class.name,
            params,
            flags,
            body,
        )));
        self
    }

    /// Finish the declaration.
    ///
    /// Classes without an explicit superclass derive from the root; interfaces have none.
    pub fn build(self) -> ClassRc {
        match &self.base {
            Some(base) => {
                self.class.set_base(base);
            }
            None if !self.class.is_interface() => {
                self.class.set_base(&self.registry.root());
            }
            None => {}
        }
        self.class
    }
}
