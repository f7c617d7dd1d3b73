//! Integration tests for property paths: tokenizing and navigating with `MetaClass`.

use std::sync::Arc;

use propscope::{prelude::*, Result};

#[derive(Debug, Default, Clone)]
struct Product {
    title: String,
}

#[derive(Debug, Default, Clone)]
struct Line {
    product: Product,
    quantity: i32,
}

#[derive(Debug, Default)]
struct Invoice {
    lines: Vec<Line>,
    customer_id: i64,
}

struct Billing {
    registry: ClassRegistry,
    product: ClassRc,
    line: ClassRc,
    invoice: ClassRc,
}

fn billing() -> Result<Billing> {
    let registry = ClassRegistry::new();
    let string = registry.primitive(PrimitiveKind::String);
    let int = registry.primitive(PrimitiveKind::I32);
    let long = registry.primitive(PrimitiveKind::I64);

    let product = ClassBuilder::new(&registry, "billing.Product")?
        .getter("getTitle", &string, |p: &Product| p.title.clone())
        .setter("setTitle", &string, |p: &mut Product, title: String| p.title = title)
        .default_constructor::<Product>()
        .build();

    let line = ClassBuilder::new(&registry, "billing.Line")?
        .getter("getProduct", &product, |l: &Line| l.product.clone())
        .field(
            "quantity",
            &int,
            FieldFlags::PUBLIC,
            |l: &Line| l.quantity,
            |l: &mut Line, quantity: i32| l.quantity = quantity,
        )
        .default_constructor::<Line>()
        .build();

    let lines = registry.array_of(&line);
    let invoice = ClassBuilder::new(&registry, "billing.Invoice")?
        .getter("getLines", &lines, |i: &Invoice| i.lines.clone())
        .getter("getCustomerId", &long, |i: &Invoice| i.customer_id)
        .setter("setCustomerId", &long, |i: &mut Invoice, id: i64| i.customer_id = id)
        .default_constructor::<Invoice>()
        .build();

    Ok(Billing {
        registry,
        product,
        line,
        invoice,
    })
}

#[test]
fn test_tokenizer_walks_indexed_path() {
    let steps: Vec<_> = PropertyTokenizer::new("orders[3].item")
        .steps()
        .map(|s| (s.name(), s.index()))
        .collect();
    assert_eq!(steps, [("orders", Some("3")), ("item", None)]);

    let names: Vec<_> = PropertyTokenizer::new("a.b.c")
        .steps()
        .map(|s| s.indexed_name())
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn test_nested_getter_types() -> Result<()> {
    let billing = billing()?;
    let meta = MetaClass::for_class(&billing.invoice, Arc::new(MetadataCache::new()))?;
    let string = billing.registry.primitive(PrimitiveKind::String);

    assert!(meta.has_getter("lines[0].product.title"));
    assert_eq!(
        meta.getter_type("lines[0].product.title")?.token,
        string.token
    );
    assert_eq!(meta.getter_type("lines[0]")?.token, billing.line.token);
    assert_eq!(meta.getter_type("lines")?.name, "billing.Line[]");
    assert_eq!(
        meta.getter_type("lines[1].product")?.token,
        billing.product.token
    );
    Ok(())
}

#[test]
fn test_nested_setters() -> Result<()> {
    let billing = billing()?;
    let meta = MetaClass::for_class(&billing.invoice, Arc::new(MetadataCache::new()))?;

    assert!(meta.has_setter("customerId"));
    assert!(meta.has_setter("lines[0].quantity"));
    assert!(meta.has_setter("lines[0].product.title"));
    assert!(!meta.has_setter("lines"));
    assert!(!meta.has_setter("lines[0].product"));

    let int = billing.registry.primitive(PrimitiveKind::I32);
    assert_eq!(meta.setter_type("lines[0].quantity")?.token, int.token);
    assert!(matches!(
        meta.setter_type("lines[0].product"),
        Err(Error::PropertyNotFound { kind: "setter", .. })
    ));
    Ok(())
}

#[test]
fn test_unknown_segments() -> Result<()> {
    let billing = billing()?;
    let meta = MetaClass::for_class(&billing.invoice, Arc::new(MetadataCache::new()))?;

    assert!(!meta.has_getter("total"));
    assert!(!meta.has_getter("lines[0].price"));
    assert!(matches!(
        meta.getter_type("lines[0].price"),
        Err(Error::PropertyNotFound { property, .. }) if property == "price"
    ));
    Ok(())
}

#[test]
fn test_find_property_canonicalises() -> Result<()> {
    let billing = billing()?;
    let meta = MetaClass::for_class(&billing.invoice, Arc::new(MetadataCache::new()))?;

    assert_eq!(
        meta.find_property("CUSTOMER_ID", true).as_deref(),
        Some("customerId")
    );
    assert_eq!(meta.find_property("CUSTOMER_ID", false), None);
    assert_eq!(
        meta.find_property("customerid", false).as_deref(),
        Some("customerId")
    );
    assert_eq!(meta.find_property("nothing", false), None);
    Ok(())
}

#[test]
fn test_meta_class_shares_cache() -> Result<()> {
    let billing = billing()?;
    let cache = Arc::new(MetadataCache::new());
    let meta = MetaClass::for_class(&billing.invoice, cache.clone())?;

    let lines = meta.meta_class_for_property("lines")?;
    assert_eq!(lines.model().class().name, "billing.Line[]");

    let product = meta
        .meta_class_for_property("lines[0]")?
        .meta_class_for_property("product")?;
    assert_eq!(product.getter_names(), ["title"]);
    assert!(product.has_default_constructor());
    assert!(cache.contains(&billing.product));
    Ok(())
}

#[test]
fn test_top_level_invokers() -> Result<()> {
    let billing = billing()?;
    let meta = MetaClass::for_class(&billing.line, Arc::new(MetadataCache::new()))?;

    let mut line = Line::default();
    meta.set_invoker("quantity")?.write(&mut line, Box::new(12i32))?;
    let quantity = meta.get_invoker("quantity")?.read(&mut line)?;
    assert_eq!(quantity.downcast_ref::<i32>(), Some(&12));
    assert!(meta.get_invoker("product")?.is_method());
    assert!(meta.get_invoker("quantity")?.is_field());
    Ok(())
}
