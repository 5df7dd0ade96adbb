//! Type index handle.
//!
//! Every type lives in a [`Pool`](crate::Pool) and is referenced by a 32-bit
//! `Idx`. Index equality is *identity*: two handles are the same type object.
//! Structural equality is a separate, deeper question answered by
//! [`Pool::equals`](crate::Pool::equals).
//!
//! # Pre-interned primitives
//!
//! All primitive types are allocated at pool creation at fixed indices, so
//! `Idx::INT` is valid in every pool and primitives can be compared by index.

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Unit kind ===
    /// `nothing` (unit kind, spec 0).
    pub const NOTHING: Self = Self(0);
    /// `any` (unit kind, spec 1). Everything coerces to it and casts from it.
    pub const ANY: Self = Self(1);

    /// `bool`.
    pub const BOOL: Self = Self(2);

    // === Integral kind: even specs are signed, odd specs unsigned ===
    /// `sbyte` (8-bit signed).
    pub const SBYTE: Self = Self(3);
    /// `byte` (8-bit unsigned).
    pub const BYTE: Self = Self(4);
    /// `short` (16-bit signed).
    pub const SHORT: Self = Self(5);
    /// `ushort` (16-bit unsigned).
    pub const USHORT: Self = Self(6);
    /// `int` (32-bit signed).
    pub const INT: Self = Self(7);
    /// `uint` (32-bit unsigned).
    pub const UINT: Self = Self(8);
    /// `long` (64-bit signed).
    pub const LONG: Self = Self(9);
    /// `ulong` (64-bit unsigned).
    pub const ULONG: Self = Self(10);

    // === Floating kind ===
    /// `float` (32-bit).
    pub const FLOAT: Self = Self(11);
    /// `double` (64-bit).
    pub const DOUBLE: Self = Self(12);

    // === Text kind ===
    /// `rune` (a single character).
    pub const RUNE: Self = Self(13);
    /// `string`.
    pub const STRING: Self = Self(14);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 15;

    /// First index handed out for constructed types.
    pub const FIRST_DYNAMIC: u32 = Self::PRIMITIVE_COUNT;

    /// Create an index from a raw value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Position of this index in pool storage.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned primitives.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }

    /// Source-level name of a pre-interned primitive.
    ///
    /// Returns `None` for constructed types, which need a pool to render.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("nothing"),
            1 => Some("any"),
            2 => Some("bool"),
            3 => Some("sbyte"),
            4 => Some("byte"),
            5 => Some("short"),
            6 => Some("ushort"),
            7 => Some("int"),
            8 => Some("uint"),
            9 => Some("long"),
            10 => Some("ulong"),
            11 => Some("float"),
            12 => Some("double"),
            13 => Some("rune"),
            14 => Some("string"),
            _ => None,
        }
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "Idx::{}", name.to_ascii_uppercase()),
            None => write!(f, "Idx({})", self.0),
        }
    }
}
