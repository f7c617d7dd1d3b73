// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # propscope
//!
//! Property metadata for registered types, and a blocking memoizing cache.
//!
//! `propscope` answers the questions a data-mapping layer asks about a type: which properties
//! can be read and written, what their types are, how to read or write them on an instance,
//! and how to create a fresh instance. It also ships the per-key blocking decorator such
//! layers put in front of their second-level caches.
//!
//! ## Features
//!
//! - **Registration-based type model** - Declare classes, interfaces, members and
//!   constructors once with [`ClassBuilder`]; closures over plain Rust structs become the
//!   member bodies
//! - **Bean-style resolution** - `get*`/`is*`/`set*` accessors across the whole hierarchy,
//!   covariant getter narrowing, overloaded setter disambiguation, field fallback
//! - **Concurrent memoization** - [`MetadataCache`] resolves every type once and shares the
//!   immutable result between threads
//! - **Property paths** - [`PropertyTokenizer`] and [`MetaClass`] for `orders[3].item.name`
//! - **Blocking cache** - [`BlockingCache`] makes concurrent misses on one key wait for the
//!   first caller, with timeouts and interruption
//!
//! ## Quick Start
//!
//! ```rust
//! use propscope::prelude::*;
//!
//! #[derive(Default)]
//! struct Customer { name: String, vip: bool }
//!
//! let registry = ClassRegistry::new();
//! let string = registry.primitive(PrimitiveKind::String);
//! let boolean = registry.primitive(PrimitiveKind::Bool);
//!
//! let customer = ClassBuilder::new(&registry, "crm.Customer")?
//!     .getter("getName", &string, |c: &Customer| c.name.clone())
//!     .setter("setName", &string, |c: &mut Customer, name: String| c.name = name)
//!     .getter("isVip", &boolean, |c: &Customer| c.vip)
//!     .default_constructor::<Customer>()
//!     .build();
//!
//! let cache = MetadataCache::new();
//! let model = cache.get(&customer)?;
//! assert!(model.has_getter("vip"));
//! assert!(!model.has_setter("vip"));
//! assert_eq!(model.find_property("NAME"), Some("name"));
//! # Ok::<(), propscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - Tokens, the class registry, class and member descriptors
//! - [`reflection`] - Accessor resolution, property models, paths
//! - [`cache`] - The store capability, the in-memory store and the blocking decorator
//!
//! ## Logging
//!
//! Resolution, cache misses and lock timeouts emit `tracing` events. The library never
//! installs a subscriber; applications choose their own.
//!
//! ### Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! cargo +nightly fuzz run property_path
//! ```
#[macro_use]
pub(crate) mod macros;

#[macro_use]
pub(crate) mod error;
pub(crate) mod utils;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use propscope::prelude::*;
///
/// let registry = ClassRegistry::new();
/// let cache = MetadataCache::new();
/// let model = cache.get(&registry.root())?;
/// assert!(model.readable_names().is_empty());
/// # Ok::<(), propscope::Error>(())
/// ```
pub mod prelude;

/// Type model: tokens, registry, classes and their members
pub mod metadata;

/// Property resolution over the type model
pub mod reflection;

/// Key-value stores and the blocking decorator
pub mod cache;

/// `propscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `propscope` Error type
///
/// # Examples
///
/// ```rust
/// use propscope::{ClassRegistry, Error, MetadataCache};
///
/// let registry = ClassRegistry::new();
/// let model = MetadataCache::new().get(&registry.root())?;
/// match model.set_invoker("name") {
///     Err(Error::PropertyNotFound { kind, .. }) => assert_eq!(kind, "setter"),
///     Err(e) => println!("Error: {}", e),
///     Ok(_) => unreachable!(),
/// }
/// # Ok::<(), propscope::Error>(())
/// ```
pub use error::Error;

/// Type model entry points.
pub use metadata::{
    token::Token,
    typesystem::{ClassBuilder, ClassDef, ClassFlags, ClassRc, ClassRegistry, PrimitiveKind},
};

/// Property resolution entry points.
pub use reflection::{
    Invoker, MetaClass, MetadataCache, PropertyModel, PropertyTokenizer, ReflectionConfig,
};

/// Stores and the blocking decorator.
pub use cache::{BlockingCache, BlockingCacheConfig, Cache, PerpetualCache};
