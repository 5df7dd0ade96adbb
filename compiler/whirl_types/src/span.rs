//! Source positions carried through for diagnostics.

/// A byte range in a source file.
///
/// The type algebra never inspects spans; it only hands them back so the
/// caller can point diagnostics at the type parameters that caused them.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    /// Placeholder for types built without source text.
    pub const DUMMY: Self = Self { start: 0, end: 0 };

    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }
}
