//! Built-in types every `ClassRegistry` starts with.
//!
//! The registry seeds itself with one `ClassDef` per [`PrimitiveKind`] so that member
//! declarations can reference scalar types, `void` and the universal root `Object` without
//! registering them first. Primitive tokens are fixed, so the same kind always maps to the
//! same token across registries.

use strum::{EnumCount, EnumIter};

use crate::metadata::{
    token::{Token, TOKEN_KIND_PRIMITIVE},
    typesystem::ClassFlags,
};

/// Represents all built-in types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum PrimitiveKind {
    /// The universal root type, supertype of every non-primitive type
    Object,
    /// No value, the return type of setters and other procedures
    Void,
    /// true/false value
    Bool,
    /// Unicode scalar value
    Char,
    /// signed 8-bit integer
    I8,
    /// signed 16-bit integer
    I16,
    /// signed 32-bit integer
    I32,
    /// signed 64-bit integer
    I64,
    /// 32-bit floating point
    F32,
    /// 64-bit floating point
    F64,
    /// Owned UTF-8 string
    String,
}

impl PrimitiveKind {
    /// Get the fixed token for this type
    #[must_use]
    pub fn token(&self) -> Token {
        Token::from_parts(TOKEN_KIND_PRIMITIVE, self.index() as u32 + 1)
    }

    /// Position of this kind in declaration order, used to index the registry's primitive table
    #[must_use]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Get the registered name of this type
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::Object => "Object",
            PrimitiveKind::Void => "void",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I8 => "i8",
            PrimitiveKind::I16 => "i16",
            PrimitiveKind::I32 => "i32",
            PrimitiveKind::I64 => "i64",
            PrimitiveKind::F32 => "f32",
            PrimitiveKind::F64 => "f64",
            PrimitiveKind::String => "String",
        }
    }

    /// Class flags of the registered type.
    ///
    /// `Object` is the root, `String` is an ordinary final reference type deriving from it,
    /// everything else is a scalar that no other type is assignable to.
    #[must_use]
    pub fn flags(&self) -> ClassFlags {
        match self {
            PrimitiveKind::Object => ClassFlags::ROOT,
            PrimitiveKind::String => ClassFlags::FINAL,
            _ => ClassFlags::PRIMITIVE | ClassFlags::FINAL,
        }
    }
}
