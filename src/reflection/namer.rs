//! Bean naming rules.
//!
//! Accessor methods are recognised by name and arity:
//!
//! | Prefix | Min. length | Parameters | Role   |
//! |--------|-------------|------------|--------|
//! | `get`  | 4           | 0          | getter |
//! | `is`   | 3           | 0          | getter |
//! | `set`  | 4           | 1          | setter |
//!
//! The property name is the method name with the prefix removed and the first remaining
//! character lower-cased: `getOrderId` → `orderId`, `isActive` → `active`.

/// Prefix marking names that are never properties (generated or instrumentation members)
pub const RESERVED_PREFIX: char = '$';
/// Serialization version identifier, never a property
pub const SERIAL_VERSION_NAME: &str = "serialVersionUID";
/// Runtime type identifier, never a property
pub const TYPE_IDENTIFIER_NAME: &str = "class";

/// Returns true if `name` with `param_count` parameters is a getter candidate
pub fn is_getter(name: &str, param_count: usize) -> bool {
    param_count == 0
        && ((name.starts_with("get") && name.len() > 3)
            || (name.starts_with("is") && name.len() > 2))
}

/// Returns true if `name` with `param_count` parameters is a setter candidate
pub fn is_setter(name: &str, param_count: usize) -> bool {
    param_count == 1 && name.starts_with("set") && name.len() > 3
}

/// Derive the property name from an accessor method name.
///
/// Returns `None` if the name carries none of the accessor prefixes.
pub fn method_to_property(name: &str) -> Option<String> {
    let stripped = name
        .strip_prefix("is")
        .or_else(|| name.strip_prefix("get"))
        .or_else(|| name.strip_prefix("set"))?;

    let mut chars = stripped.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().chain(chars).collect())
}

/// Returns true unless `name` is reserved
pub fn is_valid_property_name(name: &str) -> bool {
    !(name.starts_with(RESERVED_PREFIX) || name == SERIAL_VERSION_NAME || name == TYPE_IDENTIFIER_NAME)
}
