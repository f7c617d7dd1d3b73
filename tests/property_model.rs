//! Integration tests for property resolution.
//!
//! Declares a small bean hierarchy through the public builder API and checks the resolved
//! models: bean pairs, covariant overrides, ambiguity, case-insensitive lookup, caching and
//! invocation through the returned invokers.

use std::{
    any::Any,
    sync::{Arc, Barrier},
    thread,
};

use propscope::{prelude::*, Result};

#[derive(Debug, Default, Clone, PartialEq)]
struct Address {
    city: String,
}

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    name: String,
    active: bool,
    address: Address,
    age: i32,
}

struct Fixture {
    registry: ClassRegistry,
    address: ClassRc,
    person: ClassRc,
}

fn fixture() -> Result<Fixture> {
    let registry = ClassRegistry::new();
    let string = registry.primitive(PrimitiveKind::String);
    let boolean = registry.primitive(PrimitiveKind::Bool);
    let int = registry.primitive(PrimitiveKind::I32);

    let address = ClassBuilder::new(&registry, "app.Address")?
        .getter("getCity", &string, |a: &Address| a.city.clone())
        .setter("setCity", &string, |a: &mut Address, city: String| a.city = city)
        .default_constructor::<Address>()
        .build();

    let person = ClassBuilder::new(&registry, "app.Person")?
        .getter("getName", &string, |p: &Person| p.name.clone())
        .setter("setName", &string, |p: &mut Person, name: String| p.name = name)
        .getter("isActive", &boolean, |p: &Person| p.active)
        .getter("getAddress", &address, |p: &Person| p.address.clone())
        .setter("setAddress", &address, |p: &mut Person, a: Address| p.address = a)
        .field(
            "age",
            &int,
            FieldFlags::PRIVATE,
            |p: &Person| p.age,
            |p: &mut Person, age: i32| p.age = age,
        )
        .default_constructor::<Person>()
        .build();

    Ok(Fixture {
        registry,
        address,
        person,
    })
}

#[test]
fn test_bean_pair_resolution() -> Result<()> {
    let fx = fixture()?;
    let model = MetadataCache::new().get(&fx.person)?;

    assert_eq!(model.readable_names(), ["name", "active", "address", "age"]);
    assert_eq!(model.writable_names(), ["name", "address", "age"]);
    assert_eq!(model.getter_type("address")?.token, fx.address.token);
    assert_eq!(model.setter_type("address")?.token, fx.address.token);
    assert!(model.has_getter("active"));
    assert!(!model.has_setter("active"));
    Ok(())
}

#[test]
fn test_invokers_read_and_write() -> Result<()> {
    let fx = fixture()?;
    let model = MetadataCache::new().get(&fx.person)?;

    let mut instance = model.default_constructor()?.new_instance(vec![])?;
    let target: &mut dyn Any = &mut *instance;

    model
        .set_invoker("name")?
        .write(target, Box::new("Ada".to_string()))?;
    model.set_invoker("age")?.write(target, Box::new(36i32))?;

    let name = model.get_invoker("name")?.read(target)?;
    assert_eq!(name.downcast_ref::<String>().map(String::as_str), Some("Ada"));
    let age = model.get_invoker("age")?.read(target)?;
    assert_eq!(age.downcast_ref::<i32>(), Some(&36));

    let person = instance.downcast_ref::<Person>().unwrap();
    assert_eq!(person.name, "Ada");
    assert_eq!(person.age, 36);
    Ok(())
}

#[test]
fn test_invocation_failure_names_member() -> Result<()> {
    let fx = fixture()?;
    let model = MetadataCache::new().get(&fx.person)?;

    let mut wrong_target = Address::default();
    match model.get_invoker("name")?.read(&mut wrong_target) {
        Err(Error::Invocation { class, member, .. }) => {
            assert_eq!(class, "app.Person");
            assert_eq!(member, "getName");
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
    Ok(())
}

#[test]
fn test_unrelated_getter_types_are_ambiguous() -> Result<()> {
    let registry = ClassRegistry::new();
    let long = registry.primitive(PrimitiveKind::I64);
    let string = registry.primitive(PrimitiveKind::String);
    let broken = ClassBuilder::new(&registry, "app.Broken")?
        .abstract_method("getCode", &long, &[])
        .abstract_method("isCode", &string, &[])
        .build();

    let cache = MetadataCache::new();
    match cache.get(&broken) {
        Err(Error::AmbiguousAccessor {
            property,
            candidates,
            ..
        }) => {
            assert_eq!(property, "code");
            assert!(candidates.iter().any(|c| c.contains("getCode")));
            assert!(candidates.iter().any(|c| c.contains("isCode")));
        }
        other => panic!("unexpected: {:?}", other.map(|_| ())),
    }
    assert!(!cache.contains(&broken));
    Ok(())
}

#[test]
fn test_covariant_override_narrows_getter_type() -> Result<()> {
    let registry = ClassRegistry::new();
    let animal = ClassBuilder::new(&registry, "zoo.Animal")?.build();
    let cat = ClassBuilder::new(&registry, "zoo.Cat")?.extends(&animal).build();
    let void = registry.primitive(PrimitiveKind::Void);

    let shelter = ClassBuilder::new(&registry, "zoo.Shelter")?
        .abstract_method("getResident", &animal, &[])
        .abstract_method("setResident", &void, &[&animal])
        .build();
    let cattery = ClassBuilder::new(&registry, "zoo.Cattery")?
        .extends(&shelter)
        .abstract_method("getResident", &cat, &[])
        .method(
            "getResident",
            &animal,
            &[],
            MethodFlags::PUBLIC | MethodFlags::BRIDGE,
            None,
        )
        .build();

    let model = MetadataCache::new().get(&cattery)?;
    assert_eq!(model.getter_type("resident")?.token, cat.token);
    assert_eq!(model.setter_type("resident")?.token, animal.token);
    Ok(())
}

#[test]
fn test_case_insensitive_lookup() -> Result<()> {
    let registry = ClassRegistry::new();
    let long = registry.primitive(PrimitiveKind::I64);
    let class = ClassBuilder::new(&registry, "app.Row")?
        .abstract_method("getOrderId", &long, &[])
        .build();

    let model = MetadataCache::new().get(&class)?;
    assert_eq!(model.find_property("ORDERID"), Some("orderId"));
    assert_eq!(model.find_property("orderid"), Some("orderId"));
    assert_eq!(model.find_property("unknown"), None);
    Ok(())
}

#[test]
fn test_cache_toggle_yields_equal_content() -> Result<()> {
    let fx = fixture()?;
    let cache = MetadataCache::with_config(&ReflectionConfig::new().with_cache_enabled(false));

    let fresh = cache.get(&fx.person)?;
    cache.set_cache_enabled(true);
    let cached = cache.get(&fx.person)?;
    assert_eq!(*fresh, *cached);
    assert!(Arc::ptr_eq(&cached, &cache.get(&fx.person)?));
    Ok(())
}

#[test]
fn test_concurrent_gets_share_one_model() -> Result<()> {
    let fx = fixture()?;
    let cache = Arc::new(MetadataCache::new());
    let person = fx.person.clone();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            let person = person.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                cache.get(&person)
            })
        })
        .collect();

    let models = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect::<Result<Vec<_>>>()?;

    let settled = cache.get(&person)?;
    for model in &models {
        assert_eq!(**model, *settled);
    }
    assert_eq!(cache.len(), 1);
    Ok(())
}

#[test]
fn test_resolve_all_warms_cache() -> Result<()> {
    let fx = fixture()?;
    let cache = MetadataCache::new();
    let all: Vec<ClassRc> = fx
        .registry
        .all_types()
        .into_iter()
        .filter(|t| !t.is_primitive())
        .collect();

    cache.resolve_all(&all)?;
    assert_eq!(cache.len(), all.len());
    assert!(cache.contains(&fx.address));
    Ok(())
}

#[test]
fn test_private_access_switch() -> Result<()> {
    let fx = fixture()?;
    let cache = MetadataCache::with_config(&ReflectionConfig::new().with_private_access(false));
    let model = cache.get(&fx.person)?;

    assert!(!model.has_getter("age"));
    assert!(model.has_default_constructor());
    Ok(())
}
