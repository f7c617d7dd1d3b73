//! Accessor resolution: from a registered class to its [`PropertyModel`].
//!
//! # Algorithm
//!
//! 1. Collect every method of the class hierarchy, walking the class itself, then its
//!    interfaces (with their super-interfaces), then its superclass, until the root is reached.
//!    Bridge methods are skipped and a signature seen once hides all later declarations, so
//!    the most derived override wins. A class implementation still replaces an earlier
//!    abstract or interface declaration of the same signature.
//! 2. Classify getters and setters with the naming rules of [`crate::reflection::namer`] and
//!    group them by property name.
//! 3. Settle groups with more than one candidate: getters narrow to the most specific return
//!    type, setters must take exactly the resolved getter type.
//! 4. Fill in the gaps with fields of the class and its superclasses.
//! 5. Pick the default constructor and build the case-insensitive index.
//!
//! Resolution has no side effects; a failing class never yields a partial model.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::{
    metadata::{
        member::{FieldRc, MethodRc, MethodSignature},
        token::Token,
        typesystem::ClassRc,
    },
    reflection::{
        config::ReflectionConfig,
        invoker::Invoker,
        model::PropertyModel,
        namer::{is_getter, is_setter, is_valid_property_name, method_to_property},
    },
    Error, Result,
};

/// Candidate methods per property name, in first-seen order
#[derive(Default)]
struct Conflicts {
    order: Vec<String>,
    candidates: HashMap<String, Vec<MethodRc>>,
}

impl Conflicts {
    fn add(&mut self, name: String, method: MethodRc) {
        match self.candidates.get_mut(&name) {
            Some(list) => list.push(method),
            None => {
                self.order.push(name.clone());
                self.candidates.insert(name, vec![method]);
            }
        }
    }

    fn into_groups(mut self) -> Vec<(String, Vec<MethodRc>)> {
        self.order
            .into_iter()
            .filter_map(|name| {
                let list = self.candidates.remove(&name)?;
                Some((name, list))
            })
            .collect()
    }
}

/// Property table under construction, keeps insertion order of names
#[derive(Default)]
struct Side {
    names: Vec<String>,
    invokers: HashMap<String, Invoker>,
    types: HashMap<String, ClassRc>,
}

impl Side {
    fn insert(&mut self, name: &str, invoker: Invoker, property_type: ClassRc) {
        if self.invokers.insert(name.to_string(), invoker).is_none() {
            self.names.push(name.to_string());
        }
        self.types.insert(name.to_string(), property_type);
    }

    fn contains(&self, name: &str) -> bool {
        self.invokers.contains_key(name)
    }
}

/// Builds [`PropertyModel`]s from registered classes
#[derive(Debug, Clone)]
pub struct AccessorResolver {
    allow_private_access: bool,
}

impl AccessorResolver {
    /// Create a resolver honouring the access rules of `config`
    pub fn new(config: &ReflectionConfig) -> Self {
        AccessorResolver {
            allow_private_access: config.allow_private_access,
        }
    }

    /// Resolve the property model of `class`
    ///
    /// # Errors
    /// Returns [`Error::AmbiguousAccessor`] if getter or setter candidates of a property cannot
    /// be narrowed to one member, or [`Error::TypeNotFound`] if a member refers to a type that
    /// is no longer registered.
    pub fn resolve(&self, class: &ClassRc) -> Result<PropertyModel> {
        let methods = collect_methods(class);

        let mut getter_conflicts = Conflicts::default();
        let mut setter_conflicts = Conflicts::default();
        for method in &methods {
            let param_count = method.param_count();
            if is_getter(&method.name, param_count) {
                if let Some(property) = method_to_property(&method.name) {
                    getter_conflicts.add(property, method.clone());
                }
            } else if is_setter(&method.name, param_count) {
                if let Some(property) = method_to_property(&method.name) {
                    setter_conflicts.add(property, method.clone());
                }
            }
        }

        let mut getters = Side::default();
        for (property, candidates) in getter_conflicts.into_groups() {
            let (method, return_type) = resolve_getter(&property, &candidates)?;
            if is_valid_property_name(&property) {
                getters.insert(&property, Invoker::MethodGetter(method), return_type);
            }
        }

        let mut setters = Side::default();
        for (property, candidates) in setter_conflicts.into_groups() {
            let (method, param_type) = resolve_setter(&property, &candidates, &getters)?;
            if is_valid_property_name(&property) {
                setters.insert(&property, Invoker::MethodSetter(method), param_type);
            }
        }

        self.add_fields(class, &mut getters, &mut setters)?;

        let default_constructor = class
            .constructors
            .iter()
            .map(|(_, ctor)| ctor)
            .find(|ctor| ctor.is_default() && (self.allow_private_access || ctor.is_public()))
            .cloned();

        let mut case_insensitive = HashMap::new();
        for name in getters.names.iter().chain(setters.names.iter()) {
            case_insensitive.insert(name.to_uppercase(), name.clone());
        }

        debug!(
            class = %class.name,
            readable = getters.names.len(),
            writable = setters.names.len(),
            "resolved property model"
        );

        Ok(PropertyModel {
            class: class.clone(),
            readable: getters.names,
            writable: setters.names,
            getters: getters.invokers,
            setters: setters.invokers,
            getter_types: getters.types,
            setter_types: setters.types,
            default_constructor,
            case_insensitive,
        })
    }

    /// Field fallback for names no accessor method covers; the first declaration of a name
    /// (most derived class) wins.
    fn add_fields(&self, class: &ClassRc, getters: &mut Side, setters: &mut Side) -> Result<()> {
        let mut current = Some(class.clone());
        while let Some(cls) = current {
            if cls.is_root() {
                break;
            }
            for (_, field) in cls.fields.iter() {
                if !self.allow_private_access && !field.is_public() {
                    continue;
                }
                if !is_valid_property_name(&field.name) {
                    continue;
                }
                let field_type = field.field_type.resolve()?;
                if !setters.contains(&field.name) && !field.flags.is_class_constant() {
                    setters.insert(
                        &field.name,
                        Invoker::FieldWriter(FieldRc::clone(field)),
                        field_type.clone(),
                    );
                }
                if !getters.contains(&field.name) {
                    getters.insert(&field.name, Invoker::FieldReader(FieldRc::clone(field)), field_type);
                }
            }
            current = cls.base();
        }
        Ok(())
    }
}

/// Every non-bridge method visible on `class`, most derived declaration first
fn collect_methods(class: &ClassRc) -> Vec<MethodRc> {
    let mut collector = MethodCollector::default();

    let mut current = Some(class.clone());
    while let Some(cls) = current {
        if cls.is_root() {
            break;
        }
        collector.add_declared(&cls, false);
        for (_, interface) in cls.interfaces.iter() {
            if let Some(interface) = interface.upgrade() {
                collector.add_interface(&interface);
            }
        }
        current = cls.base();
    }

    collector.slots.into_iter().map(|slot| slot.method).collect()
}

/// A collected method and whether it was declared on an interface
struct Slot {
    method: MethodRc,
    on_interface: bool,
}

impl Slot {
    /// Returns true if `method` should take this slot over the stored declaration
    fn yields_to(&self, method: &MethodRc, on_interface: bool) -> bool {
        if method.is_abstract() {
            return false;
        }
        self.method.is_abstract() || (self.on_interface && !on_interface)
    }
}

/// Signature-deduplicating method accumulator
#[derive(Default)]
struct MethodCollector {
    index: HashMap<MethodSignature, usize>,
    slots: Vec<Slot>,
    visited_interfaces: HashSet<Token>,
}

impl MethodCollector {
    fn add_interface(&mut self, interface: &ClassRc) {
        if !self.visited_interfaces.insert(interface.token) {
            return;
        }
        self.add_declared(interface, true);
        for (_, parent) in interface.interfaces.iter() {
            if let Some(parent) = parent.upgrade() {
                self.add_interface(&parent);
            }
        }
    }

    /// The first declaration of a signature keeps its slot. A later implementation replaces
    /// an earlier bodiless declaration, and a class implementation replaces an interface
    /// body, as an interface method is implemented by a superclass.
    fn add_declared(&mut self, class: &ClassRc, on_interface: bool) {
        for (_, method) in class.methods.iter() {
            if method.is_bridge() {
                continue;
            }
            match self.index.get(&method.signature()) {
                Some(&slot) => {
                    if self.slots[slot].yields_to(method, on_interface) {
                        self.slots[slot] = Slot {
                            method: method.clone(),
                            on_interface,
                        };
                    }
                }
                None => {
                    self.index.insert(method.signature(), self.slots.len());
                    self.slots.push(Slot {
                        method: method.clone(),
                        on_interface,
                    });
                }
            }
        }
    }
}

fn ambiguous(kind: &'static str, property: &str, candidates: &[MethodRc]) -> Error {
    Error::AmbiguousAccessor {
        kind,
        property: property.to_string(),
        class: candidates
            .first()
            .map(|m| m.declaring_type.clone())
            .unwrap_or_default(),
        candidates: candidates.iter().map(|m| m.describe()).collect(),
    }
}

/// Narrow getter candidates to the one with the most specific return type.
///
/// `candidates` is a group built by [`Conflicts`] and never empty.
fn resolve_getter(property: &str, candidates: &[MethodRc]) -> Result<(MethodRc, ClassRc)> {
    let mut winner = candidates[0].clone();
    let mut winner_type = winner.return_type.resolve()?;
    for method in &candidates[1..] {
        let method_type = method.return_type.resolve()?;
        if method_type.token == winner_type.token {
            return Err(ambiguous("getter", property, candidates));
        } else if method_type.is_assignable_from(&winner_type) {
            // current winner is already narrower
        } else if winner_type.is_assignable_from(&method_type) {
            winner = method.clone();
            winner_type = method_type;
        } else {
            return Err(ambiguous("getter", property, candidates));
        }
    }

    Ok((winner, winner_type))
}

/// Pick the setter taking exactly the getter type when several are declared
fn resolve_setter(
    property: &str,
    candidates: &[MethodRc],
    getters: &Side,
) -> Result<(MethodRc, ClassRc)> {
    if let [only] = candidates {
        let param_type = only.params[0].resolve()?;
        return Ok((only.clone(), param_type));
    }

    let Some(expected) = getters.types.get(property) else {
        return Err(ambiguous("setter", property, candidates));
    };
    for method in candidates {
        if method.params[0].token() == expected.token {
            return Ok((method.clone(), expected.clone()));
        }
    }

    Err(ambiguous("setter", property, candidates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::member::{FieldFlags, MethodFlags},
        test::factories::shop_registry,
        ClassBuilder, ClassRegistry, PrimitiveKind,
    };

    fn resolver() -> AccessorResolver {
        AccessorResolver::new(&ReflectionConfig::default())
    }

    #[test]
    fn test_bean_pair() {
        let shop = shop_registry();
        let model = resolver().resolve(&shop.order).unwrap();

        assert!(model.has_getter("item"));
        assert!(model.has_setter("item"));
        assert_eq!(model.getter_type("item").unwrap().token, shop.item.token);
        assert_eq!(model.setter_type("item").unwrap().token, shop.item.token);
        assert!(model.get_invoker("item").unwrap().is_method());
    }

    #[test]
    fn test_interface_getters_are_inherited() {
        let shop = shop_registry();
        let model = resolver().resolve(&shop.book).unwrap();

        assert!(model.has_getter("id"));
        assert!(model.has_getter("sku"));
        assert!(model.has_getter("name"));
        assert!(model.has_getter("price"));
        assert!(model.get_invoker("price").unwrap().is_field());
        assert_eq!(model.get_invoker("id").unwrap().declaring_type(), "shop.Item");
        assert_eq!(model.get_invoker("sku").unwrap().declaring_type(), "shop.Book");

        let interface = resolver().resolve(&shop.catalogued).unwrap();
        assert_eq!(interface.readable_names(), ["sku", "id"]);
        assert!(interface.writable_names().is_empty());
    }

    #[test]
    fn test_covariant_getter_narrows() {
        let shop = shop_registry();
        let model = resolver().resolve(&shop.special_order).unwrap();

        assert_eq!(model.getter_type("item").unwrap().token, shop.book.token);
        assert_eq!(model.setter_type("item").unwrap().token, shop.item.token);
        assert_eq!(
            model.get_invoker("item").unwrap().declaring_type(),
            "shop.SpecialOrder"
        );
    }

    #[test]
    fn test_reserved_and_constant_fields() {
        let shop = shop_registry();
        let model = resolver().resolve(&shop.order).unwrap();

        assert!(!model.has_getter("serialVersionUID"));
        assert!(!model.has_getter("$jacocoData"));
        assert!(model.has_getter("VERSION"));
        assert!(!model.has_setter("VERSION"));
        assert!(model.has_getter("note"));
        assert!(model.has_setter("note"));
    }

    #[test]
    fn test_private_fields_hidden_without_private_access() {
        let shop = shop_registry();
        let config = ReflectionConfig::default().with_private_access(false);
        let model = AccessorResolver::new(&config).resolve(&shop.order).unwrap();

        assert!(!model.has_getter("note"));
        assert!(model.has_getter("VERSION"));
    }

    #[test]
    fn test_unrelated_getters_are_ambiguous() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let string = registry.primitive(PrimitiveKind::String);
        let class = ClassBuilder::new(&registry, "demo.Odd")
            .unwrap()
            .abstract_method("getValue", &long, &[])
            .abstract_method("isValue", &string, &[])
            .build();

        match resolver().resolve(&class) {
            Err(Error::AmbiguousAccessor {
                kind,
                property,
                class,
                candidates,
            }) => {
                assert_eq!(kind, "getter");
                assert_eq!(property, "value");
                assert_eq!(class, "demo.Odd");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_identical_getter_types_are_ambiguous() {
        let registry = ClassRegistry::new();
        let boolean = registry.primitive(PrimitiveKind::Bool);
        let class = ClassBuilder::new(&registry, "demo.Flag")
            .unwrap()
            .abstract_method("getOpen", &boolean, &[])
            .abstract_method("isOpen", &boolean, &[])
            .build();

        assert!(matches!(
            resolver().resolve(&class),
            Err(Error::AmbiguousAccessor { kind: "getter", .. })
        ));
    }

    #[test]
    fn test_overloaded_setters() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let string = registry.primitive(PrimitiveKind::String);
        let void = registry.primitive(PrimitiveKind::Void);

        let with_getter = ClassBuilder::new(&registry, "demo.Amount")
            .unwrap()
            .abstract_method("getValue", &long, &[])
            .abstract_method("setValue", &void, &[&string])
            .abstract_method("setValue", &void, &[&long])
            .build();
        let model = resolver().resolve(&with_getter).unwrap();
        assert_eq!(model.setter_type("value").unwrap().token, long.token);

        let without_getter = ClassBuilder::new(&registry, "demo.Sink")
            .unwrap()
            .abstract_method("setValue", &void, &[&string])
            .abstract_method("setValue", &void, &[&long])
            .build();
        assert!(matches!(
            resolver().resolve(&without_getter),
            Err(Error::AmbiguousAccessor { kind: "setter", .. })
        ));
    }

    #[test]
    fn test_setters_not_matching_getter_type_are_ambiguous() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let string = registry.primitive(PrimitiveKind::String);
        let boolean = registry.primitive(PrimitiveKind::Bool);
        let void = registry.primitive(PrimitiveKind::Void);

        let class = ClassBuilder::new(&registry, "demo.Quantity")
            .unwrap()
            .abstract_method("getValue", &long, &[])
            .abstract_method("setValue", &void, &[&string])
            .abstract_method("setValue", &void, &[&boolean])
            .build();

        match resolver().resolve(&class) {
            Err(Error::AmbiguousAccessor {
                kind,
                property,
                candidates,
                ..
            }) => {
                assert_eq!(kind, "setter");
                assert_eq!(property, "value");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_reserved_accessor_names_are_dropped() {
        let registry = ClassRegistry::new();
        let root = registry.root();
        let string = registry.primitive(PrimitiveKind::String);
        let boolean = registry.primitive(PrimitiveKind::Bool);
        let void = registry.primitive(PrimitiveKind::Void);

        let class = ClassBuilder::new(&registry, "demo.Proxy")
            .unwrap()
            .abstract_method("getClass", &root, &[])
            .abstract_method("setClass", &void, &[&root])
            .abstract_method("get$handler", &string, &[])
            .abstract_method("getName", &string, &[])
            .build();
        let model = resolver().resolve(&class).unwrap();
        assert_eq!(model.readable_names(), ["name"]);
        assert!(model.writable_names().is_empty());
        assert_eq!(model.find_property("CLASS"), None);

        let clash = ClassBuilder::new(&registry, "demo.ClassClash")
            .unwrap()
            .abstract_method("getClass", &boolean, &[])
            .abstract_method("isClass", &boolean, &[])
            .build();
        assert!(matches!(
            resolver().resolve(&clash),
            Err(Error::AmbiguousAccessor { property, .. }) if property == "class"
        ));
    }

    #[test]
    fn test_superclass_implementation_beats_interface_body() {
        #[derive(Default)]
        struct Tally {
            count: i64,
        }

        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let counted = ClassBuilder::interface(&registry, "demo.Counted")
            .unwrap()
            .getter("getCount", &long, |_: &Tally| -1i64)
            .build();
        let base = ClassBuilder::new(&registry, "demo.Base")
            .unwrap()
            .getter("getCount", &long, |t: &Tally| t.count)
            .build();
        let derived = ClassBuilder::new(&registry, "demo.Derived")
            .unwrap()
            .extends(&base)
            .implements(&counted)
            .default_constructor::<Tally>()
            .build();

        let model = resolver().resolve(&derived).unwrap();
        let getter = model.get_invoker("count").unwrap();
        assert_eq!(getter.declaring_type(), "demo.Base");

        let mut tally = Tally { count: 5 };
        let value = getter.read(&mut tally).unwrap();
        assert_eq!(value.downcast_ref::<i64>(), Some(&5));

        let interface = resolver().resolve(&counted).unwrap();
        assert_eq!(
            interface.get_invoker("count").unwrap().declaring_type(),
            "demo.Counted"
        );
    }

    #[test]
    fn test_bridge_methods_are_skipped() {
        let registry = ClassRegistry::new();
        let root = registry.root();
        let string = registry.primitive(PrimitiveKind::String);
        let class = ClassBuilder::new(&registry, "demo.Named")
            .unwrap()
            .abstract_method("getName", &string, &[])
            .method("getName", &root, &[], MethodFlags::PUBLIC | MethodFlags::BRIDGE, None)
            .method("getLabel", &root, &[], MethodFlags::PUBLIC | MethodFlags::BRIDGE, None)
            .build();

        let model = resolver().resolve(&class).unwrap();
        assert_eq!(model.getter_type("name").unwrap().token, string.token);
        assert!(!model.has_getter("label"));
    }

    #[test]
    fn test_default_constructor() {
        let shop = shop_registry();
        let order = resolver().resolve(&shop.order).unwrap();
        assert!(order.has_default_constructor());
        assert!(order.default_constructor().unwrap().new_instance(vec![]).is_ok());

        let identifiable = resolver().resolve(&shop.identifiable).unwrap();
        assert!(matches!(
            identifiable.default_constructor(),
            Err(Error::NoDefaultConstructor(name)) if name == "shop.Identifiable"
        ));
    }

    #[test]
    fn test_case_insensitive_index() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let class = ClassBuilder::new(&registry, "demo.Keyed")
            .unwrap()
            .abstract_method("getOrderId", &long, &[])
            .build();

        let model = resolver().resolve(&class).unwrap();
        assert_eq!(model.find_property("ORDERID"), Some("orderId"));
        assert_eq!(model.find_property("orderid"), Some("orderId"));
        assert_eq!(model.find_property("missing"), None);
    }

    #[test]
    fn test_case_collision_last_write_wins() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let class = ClassBuilder::new(&registry, "demo.Clash")
            .unwrap()
            .abstract_method("getUrl", &long, &[])
            .abstract_method("getURL", &long, &[])
            .build();

        let model = resolver().resolve(&class).unwrap();
        assert_eq!(model.readable_names(), ["url", "uRL"]);
        assert_eq!(model.find_property("URL"), Some("uRL"));
    }

    #[test]
    fn test_derived_field_shadows_base_field() {
        let registry = ClassRegistry::new();
        let long = registry.primitive(PrimitiveKind::I64);
        let string = registry.primitive(PrimitiveKind::String);
        let base = ClassBuilder::new(&registry, "demo.Base")
            .unwrap()
            .read_only_field("code", &long, FieldFlags::PUBLIC, |_: &String| 0i64)
            .build();
        let derived = ClassBuilder::new(&registry, "demo.Derived")
            .unwrap()
            .extends(&base)
            .read_only_field("code", &string, FieldFlags::PUBLIC, |_: &String| String::new())
            .build();

        let model = resolver().resolve(&derived).unwrap();
        assert_eq!(model.getter_type("code").unwrap().token, string.token);
    }
}
