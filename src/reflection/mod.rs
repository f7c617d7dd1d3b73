//! Property resolution over registered classes.
//!
//! This module turns the declarations of a [`crate::ClassDef`] into a [`PropertyModel`]: the
//! set of readable and writable property names, how to read and write each of them, their
//! types, and the default constructor. Models are memoized per type by the [`MetadataCache`],
//! and [`MetaClass`] answers the same questions for dotted property paths.
//!
//! # Key Components
//!
//! - [`AccessorResolver`]: Computes a model from a class hierarchy
//! - [`PropertyModel`]: Immutable per-type result of resolution
//! - [`MetadataCache`]: Concurrent memoization of models, keyed by type token
//! - [`Invoker`]: Uniform read/write access to method- or field-backed properties
//! - [`PropertyTokenizer`]: Splits `orders[3].item` style paths into steps
//! - [`MetaClass`]: Path-aware queries combining the tokenizer and cached models
//! - [`namer`]: Getter and setter naming rules
//!
//! # Examples
//!
//! ```rust
//! use propscope::{ClassBuilder, ClassRegistry, MetadataCache, PrimitiveKind};
//!
//! #[derive(Default)]
//! struct Order { id: i64 }
//!
//! let registry = ClassRegistry::new();
//! let long = registry.primitive(PrimitiveKind::I64);
//! let order = ClassBuilder::new(&registry, "shop.Order")?
//!     .getter("getId", &long, |o: &Order| o.id)
//!     .setter("setId", &long, |o: &mut Order, id: i64| o.id = id)
//!     .default_constructor::<Order>()
//!     .build();
//!
//! let cache = MetadataCache::new();
//! let model = cache.get(&order)?;
//!
//! let mut instance = model.default_constructor()?.new_instance(vec![])?;
//! model.set_invoker("id")?.write(&mut *instance, Box::new(7i64))?;
//! let id = model.get_invoker("id")?.read(&mut *instance)?;
//! assert_eq!(*id.downcast::<i64>().unwrap(), 7);
//! # Ok::<(), propscope::Error>(())
//! ```

mod config;
mod invoker;
mod metaclass;
mod metadata_cache;
mod model;
pub mod namer;
mod resolver;
mod tokenizer;

pub use config::ReflectionConfig;
pub use invoker::Invoker;
pub use metaclass::MetaClass;
pub use metadata_cache::MetadataCache;
pub use model::PropertyModel;
pub use resolver::AccessorResolver;
pub use tokenizer::{PropertyTokenizer, Steps};
