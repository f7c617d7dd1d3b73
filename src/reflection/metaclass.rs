use std::sync::Arc;

use crate::{
    metadata::typesystem::ClassRc,
    reflection::{
        invoker::Invoker, metadata_cache::MetadataCache, model::PropertyModel,
        tokenizer::PropertyTokenizer,
    },
    Result,
};

/// Property path queries over one class.
///
/// Combines [`PropertyTokenizer`] steps with the [`PropertyModel`]s of a [`MetadataCache`]:
/// every step moves to the class of the property it names. An indexed step on an array type
/// moves to the element type, so `items[0].name` asks the element class for `name`.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use propscope::{ClassBuilder, ClassRegistry, MetaClass, MetadataCache, PrimitiveKind};
///
/// #[derive(Default, Clone)]
/// struct Address { city: String }
/// #[derive(Default)]
/// struct Person { address: Address }
///
/// let registry = ClassRegistry::new();
/// let string = registry.primitive(PrimitiveKind::String);
/// let address = ClassBuilder::new(&registry, "app.Address")?
///     .getter("getCity", &string, |a: &Address| a.city.clone())
///     .build();
/// let person = ClassBuilder::new(&registry, "app.Person")?
///     .getter("getAddress", &address, |p: &Person| p.address.clone())
///     .build();
///
/// let meta = MetaClass::for_class(&person, Arc::new(MetadataCache::new()))?;
/// assert!(meta.has_getter("address.city"));
/// assert_eq!(meta.getter_type("address.city")?.token, string.token);
/// assert_eq!(meta.find_property("ADDRESS.CITY", false).as_deref(), Some("address.city"));
/// # Ok::<(), propscope::Error>(())
/// ```
#[derive(Clone)]
pub struct MetaClass {
    cache: Arc<MetadataCache>,
    model: Arc<PropertyModel>,
}

impl MetaClass {
    /// Create a `MetaClass` for `class`, resolving its model through `cache`
    ///
    /// # Errors
    /// Returns the resolution error of `class`.
    pub fn for_class(class: &ClassRc, cache: Arc<MetadataCache>) -> Result<Self> {
        let model = cache.get(class)?;
        Ok(MetaClass { cache, model })
    }

    /// The model of the described class
    pub fn model(&self) -> &Arc<PropertyModel> {
        &self.model
    }

    /// `MetaClass` of the getter type of property `name`
    ///
    /// # Errors
    /// Returns [`crate::Error::PropertyNotFound`] if `name` is not readable.
    pub fn meta_class_for_property(&self, name: &str) -> Result<MetaClass> {
        self.meta_class_for_step(&PropertyTokenizer::new(name))
    }

    fn meta_class_for_step(&self, step: &PropertyTokenizer<'_>) -> Result<MetaClass> {
        let class = self.step_type(step)?;
        MetaClass::for_class(&class, self.cache.clone())
    }

    fn step_type(&self, step: &PropertyTokenizer<'_>) -> Result<ClassRc> {
        let class = self.model.getter_type(step.name())?;
        if step.index().is_some() && class.is_array() {
            if let Some(element) = class.element_type() {
                return Ok(element);
            }
        }
        Ok(class)
    }

    /// Resolve `path` to its canonical capitalisation.
    ///
    /// Each segment is matched case-insensitively; with `use_camel_case_mapping` underscores
    /// are dropped first, so `ORDER_ID` finds `orderId`. Returns `None` unless at least the
    /// first segment is known.
    pub fn find_property(&self, path: &str, use_camel_case_mapping: bool) -> Option<String> {
        let path = if use_camel_case_mapping {
            path.replace('_', "")
        } else {
            path.to_string()
        };

        let mut found = String::new();
        self.build_property(&path, &mut found);
        if found.is_empty() {
            None
        } else {
            Some(found)
        }
    }

    fn build_property(&self, path: &str, found: &mut String) {
        let step = PropertyTokenizer::new(path);
        let Some(name) = self.model.find_property(step.name()) else {
            return;
        };

        found.push_str(name);
        if let Some(children) = step.children() {
            found.push('.');
            if let Ok(meta) = self.meta_class_for_property(name) {
                meta.build_property(children, found);
            }
        }
    }

    /// Readable property names of the described class
    pub fn getter_names(&self) -> &[String] {
        self.model.readable_names()
    }

    /// Writable property names of the described class
    pub fn setter_names(&self) -> &[String] {
        self.model.writable_names()
    }

    /// Returns true if every segment of `path` is readable
    pub fn has_getter(&self, path: &str) -> bool {
        let step = PropertyTokenizer::new(path);
        if !self.model.has_getter(step.name()) {
            return false;
        }
        match step.children() {
            Some(children) => self
                .meta_class_for_step(&step)
                .is_ok_and(|meta| meta.has_getter(children)),
            None => true,
        }
    }

    /// Returns true if the last segment of `path` is writable and every segment before it
    /// is readable
    pub fn has_setter(&self, path: &str) -> bool {
        let step = PropertyTokenizer::new(path);
        match step.children() {
            Some(children) => {
                self.model.has_getter(step.name())
                    && self
                        .meta_class_for_step(&step)
                        .is_ok_and(|meta| meta.has_setter(children))
            }
            None => self.model.has_setter(step.name()),
        }
    }

    /// Type produced by reading `path`
    ///
    /// # Errors
    /// Returns [`crate::Error::PropertyNotFound`] for the first segment that is not readable.
    pub fn getter_type(&self, path: &str) -> Result<ClassRc> {
        let step = PropertyTokenizer::new(path);
        match step.children() {
            Some(children) => self.meta_class_for_step(&step)?.getter_type(children),
            None => self.step_type(&step),
        }
    }

    /// Type accepted when writing `path`
    ///
    /// # Errors
    /// Returns [`crate::Error::PropertyNotFound`] if an intermediate segment is not readable
    /// or the last one is not writable.
    pub fn setter_type(&self, path: &str) -> Result<ClassRc> {
        let step = PropertyTokenizer::new(path);
        match step.children() {
            Some(children) => self.meta_class_for_step(&step)?.setter_type(children),
            None => self.model.setter_type(step.name()),
        }
    }

    /// Invoker reading the top-level property `name`
    ///
    /// # Errors
    /// Returns [`crate::Error::PropertyNotFound`] if `name` is not readable.
    pub fn get_invoker(&self, name: &str) -> Result<Invoker> {
        self.model.get_invoker(name)
    }

    /// Invoker writing the top-level property `name`
    ///
    /// # Errors
    /// Returns [`crate::Error::PropertyNotFound`] if `name` is not writable.
    pub fn set_invoker(&self, name: &str) -> Result<Invoker> {
        self.model.set_invoker(name)
    }

    /// Returns true if the described class has a usable zero-argument constructor
    pub fn has_default_constructor(&self) -> bool {
        self.model.has_default_constructor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{test::factories::shop_registry, Error, PrimitiveKind};

    fn order_meta() -> (crate::test::factories::Shop, MetaClass) {
        let shop = shop_registry();
        let meta = MetaClass::for_class(&shop.order, Arc::new(MetadataCache::new())).unwrap();
        (shop, meta)
    }

    #[test]
    fn test_nested_paths() {
        let (shop, meta) = order_meta();
        let string = shop.registry.primitive(PrimitiveKind::String);

        assert!(meta.has_getter("item.name"));
        assert!(meta.has_setter("item.name"));
        assert!(!meta.has_getter("item.missing"));
        assert!(!meta.has_setter("missing.name"));
        assert_eq!(meta.getter_type("item.name").unwrap().token, string.token);
        assert_eq!(meta.setter_type("item.name").unwrap().token, string.token);
    }

    #[test]
    fn test_indexed_array_step() {
        let (shop, meta) = order_meta();
        let items = shop.registry.array_of(&shop.item);

        assert_eq!(meta.getter_type("items").unwrap().token, items.token);
        assert_eq!(meta.getter_type("items[0]").unwrap().token, shop.item.token);
        assert!(meta.has_getter("items[0].price"));
        assert_eq!(
            meta.getter_type("items[0].price").unwrap().token,
            PrimitiveKind::F64.token()
        );
    }

    #[test]
    fn test_find_property() {
        let (_shop, meta) = order_meta();

        assert_eq!(meta.find_property("ITEM", false).as_deref(), Some("item"));
        assert_eq!(meta.find_property("item.NAME", false).as_deref(), Some("item.name"));
        assert_eq!(meta.find_property("ITEM_NAME", true), None);
        assert_eq!(meta.find_property("I_TEM", true).as_deref(), Some("item"));
        assert_eq!(meta.find_property("nothing", false), None);
    }

    #[test]
    fn test_missing_types_are_reported() {
        let (_shop, meta) = order_meta();
        assert!(matches!(
            meta.getter_type("nothing.name"),
            Err(Error::PropertyNotFound { kind: "getter", .. })
        ));
        assert!(matches!(
            meta.setter_type("item.unknown"),
            Err(Error::PropertyNotFound { kind: "setter", .. })
        ));
    }

    #[test]
    fn test_top_level_queries() {
        let (_shop, meta) = order_meta();
        assert!(meta.has_default_constructor());
        assert!(meta.getter_names().iter().any(|n| n == "item"));
        assert!(meta.setter_names().iter().any(|n| n == "note"));
        assert!(meta.get_invoker("item").is_ok());
        assert!(meta.set_invoker("VERSION").is_err());
        assert_eq!(
            meta.meta_class_for_property("item").unwrap().model().class().name,
            "shop.Item"
        );
    }
}
