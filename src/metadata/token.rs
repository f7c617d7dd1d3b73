use std::fmt;

/// Token kind of the built-in primitive types (including the root `Object`)
pub const TOKEN_KIND_PRIMITIVE: u8 = 0x01;
/// Token kind of classes and interfaces declared through a `ClassBuilder`
pub const TOKEN_KIND_CLASS: u8 = 0x02;
/// Token kind of array types created by the registry
pub const TOKEN_KIND_ARRAY: u8 = 0x03;

/// Identity of a registered type.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the token kind (primitive, class, array)
/// - The low 24 bits (bits 0-23) are a sequence number within that kind
///
/// Tokens are unique within one `ClassRegistry`. Registries number their types
/// independently, so tokens of different registries may collide.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a token from a kind byte and a sequence number
    #[must_use]
    pub fn from_parts(kind: u8, row: u32) -> Self {
        Token((u32::from(kind) << 24) | (row & 0x00FF_FFFF))
    }

    /// Extracts the token kind (high byte)
    #[must_use]
    pub fn kind(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the sequence number (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, kind: 0x{:02x}, row: {})",
            self.0,
            self.kind(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
