//! Type shapes stored in the pool.
//!
//! `TypeData` is a single closed sum over every shape a Whirlwind program can
//! express. Children are `Idx` handles into the same pool, so recursive and
//! mutually recursive types are plain cycles of indices.
//!
//! Only four fields are ever mutated after construction:
//! - `InterfType::instances` (implementation memo, grows monotonically)
//! - `WildcardType::value` (transient match-time binding)
//! - `OpaqueType::eval` / `OpaqueGenericType::eval` (written once)
//! - the `generate` slots of instances (written once)
//!
//! Derivation additionally rewrites interface method kinds in place.

use std::collections::BTreeMap;

use smallvec::SmallVec;

use crate::{Idx, Span};

/// Ordered list of type parameters. Most generics take one or two.
pub type TypeParams = SmallVec<[Idx; 4]>;

/// Primitive kind.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimKind {
    Unit,
    Boolean,
    Integral,
    Floating,
    Text,
}

/// A primitive type: a kind plus a kind-specific spec code.
///
/// Spec codes order primitives of the same kind by precision. Integral codes
/// alternate signed (even) and unsigned (odd), so two integrals have the same
/// signedness exactly when their codes have the same parity.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Primitive {
    pub kind: PrimKind,
    pub spec: u8,
}

impl Primitive {
    pub const NOTHING: Self = Self::new(PrimKind::Unit, 0);
    pub const ANY: Self = Self::new(PrimKind::Unit, 1);
    pub const BOOL: Self = Self::new(PrimKind::Boolean, 0);
    pub const SBYTE: Self = Self::new(PrimKind::Integral, 0);
    pub const BYTE: Self = Self::new(PrimKind::Integral, 1);
    pub const SHORT: Self = Self::new(PrimKind::Integral, 2);
    pub const USHORT: Self = Self::new(PrimKind::Integral, 3);
    pub const INT: Self = Self::new(PrimKind::Integral, 4);
    pub const UINT: Self = Self::new(PrimKind::Integral, 5);
    pub const LONG: Self = Self::new(PrimKind::Integral, 6);
    pub const ULONG: Self = Self::new(PrimKind::Integral, 7);
    pub const FLOAT: Self = Self::new(PrimKind::Floating, 0);
    pub const DOUBLE: Self = Self::new(PrimKind::Floating, 1);
    pub const RUNE: Self = Self::new(PrimKind::Text, 0);
    pub const STRING: Self = Self::new(PrimKind::Text, 1);

    /// Every primitive, in pre-interned `Idx` order.
    pub(crate) const ALL: [Self; Idx::PRIMITIVE_COUNT as usize] = [
        Self::NOTHING,
        Self::ANY,
        Self::BOOL,
        Self::SBYTE,
        Self::BYTE,
        Self::SHORT,
        Self::USHORT,
        Self::INT,
        Self::UINT,
        Self::LONG,
        Self::ULONG,
        Self::FLOAT,
        Self::DOUBLE,
        Self::RUNE,
        Self::STRING,
    ];

    pub const fn new(kind: PrimKind, spec: u8) -> Self {
        Self { kind, spec }
    }

    /// `any`: the universal source of casts and target of coercions.
    #[inline]
    pub fn is_any(self) -> bool {
        self == Self::ANY
    }

    #[inline]
    pub fn is_numeric(self) -> bool {
        matches!(self.kind, PrimKind::Integral | PrimKind::Floating)
    }

    /// The pre-interned index of this primitive, if it is a known one.
    pub(crate) fn interned(self) -> Option<Idx> {
        Self::ALL
            .iter()
            .position(|&p| p == self)
            .and_then(|pos| u32::try_from(pos).ok())
            .map(Idx::from_raw)
    }
}

/// Identifier of the package that declared a nominal type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackageId(pub u32);

/// Function type. Used as the signature of interface methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncType {
    pub params: Vec<Idx>,
    pub ret: Idx,
}

/// A struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: Idx,
    pub constant: bool,
}

impl StructField {
    pub fn new(name: impl Into<String>, ty: Idx) -> Self {
        Self {
            name: name.into(),
            ty,
            constant: false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct StructType {
    pub name: String,
    pub package: PackageId,
    /// Fields in declaration order.
    pub fields: Vec<StructField>,
    pub inherit: Option<Idx>,
    pub packed: bool,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// How an interface method is supplied.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MethodKind {
    /// No body; must be supplied by a binding.
    Abstract,
    /// Has a default body.
    Virtual,
    /// Abstract in a parent, supplied here.
    Implement,
    /// Virtual in a parent, replaced here.
    Override,
}

impl MethodKind {
    /// Whether a method of this kind carries a body.
    #[inline]
    pub fn has_body(self) -> bool {
        !matches!(self, MethodKind::Abstract)
    }
}

/// A method-level generic overload, keyed by the concrete types it matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Specialization {
    pub matching_types: Vec<Idx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InterfMethod {
    /// A function type, or a generic whose template is a function type.
    pub signature: Idx,
    pub kind: MethodKind,
    pub specializations: Vec<Specialization>,
}

impl InterfMethod {
    pub fn new(signature: Idx, kind: MethodKind) -> Self {
        Self {
            signature,
            kind,
            specializations: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct InterfType {
    pub name: String,
    /// Methods by name (`BTreeMap` for deterministic iteration).
    pub methods: BTreeMap<String, InterfMethod>,
    /// Types known to implement this interface.
    ///
    /// Monotonic: entries are only ever appended.
    pub instances: Vec<Idx>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgebraicVariant {
    pub name: String,
    pub values: Vec<Idx>,
}

impl AlgebraicVariant {
    pub fn new(name: impl Into<String>, values: Vec<Idx>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AlgebraicType {
    pub name: String,
    pub package: PackageId,
    /// Variants in declaration order.
    pub variants: Vec<AlgebraicVariant>,
    /// Closed types keep their variants scoped under the type name. Open types
    /// promote variants to top-level constructors, so the declaring walker
    /// must keep their names globally unique.
    pub closed: bool,
}

/// Type sets with built-in membership rules.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntrinsicSet {
    /// Every vector.
    Vector,
    /// Every tuple.
    Tuple,
    /// Vectors whose element type equals the set's single member.
    TypedVector,
    /// Vectors whose element coerces to `long` or `ulong`.
    IntegralVector,
}

impl IntrinsicSet {
    /// Look up an intrinsic set by its declared name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Vector" => Some(Self::Vector),
            "Tuple" => Some(Self::Tuple),
            "TypedVector" => Some(Self::TypedVector),
            "IntegralVector" => Some(Self::IntegralVector),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Vector => "Vector",
            Self::Tuple => "Tuple",
            Self::TypedVector => "TypedVector",
            Self::IntegralVector => "IntegralVector",
        }
    }
}

/// A named type set (constraint).
#[derive(Clone, Debug)]
pub struct ConstraintType {
    pub name: String,
    pub types: Vec<Idx>,
    pub intrinsic: Option<IntrinsicSet>,
}

#[derive(Clone, Debug)]
pub struct GenericType {
    /// The wildcards standing for each type parameter.
    pub params: TypeParams,
    pub template: Idx,
    /// Memoized `GenericInstance` entries, one per distinct parameter list.
    pub instances: Vec<Idx>,
}

#[derive(Clone, Debug)]
pub struct GenericInstance {
    pub generic: Idx,
    pub params: TypeParams,
    /// `None` only while the template is being substituted.
    pub generate: Option<Idx>,
}

#[derive(Clone, Debug)]
pub struct WildcardType {
    pub name: String,
    /// Permitted types; empty means unconstrained.
    pub constraints: Vec<Idx>,
    pub value: Option<Idx>,
}

#[derive(Clone, Debug)]
pub struct OpaqueType {
    pub name: String,
    pub eval: Option<Idx>,
}

#[derive(Clone, Debug)]
pub struct OpaqueGenericType {
    pub name: String,
    /// The resolved `Generic`, once known.
    pub eval: Option<Idx>,
    /// Instances requested while unresolved.
    pub instances: Vec<Idx>,
}

#[derive(Clone, Debug)]
pub struct OpaqueGenericInstance {
    pub opaque: Idx,
    pub params: TypeParams,
    pub generate: Option<Idx>,
    /// Where the parameters were written, for diagnostics only.
    pub context: Option<Span>,
}

/// Every type shape.
#[derive(Clone, Debug)]
pub enum TypeData {
    Primitive(Primitive),
    Tuple(Vec<Idx>),
    Vector { elem: Idx, size: u32 },
    Ref { elem: Idx, constant: bool },
    Function(FuncType),
    Struct(StructType),
    Interface(InterfType),
    Algebraic(AlgebraicType),
    Constraint(ConstraintType),
    Generic(GenericType),
    GenericInstance(GenericInstance),
    Wildcard(WildcardType),
    Opaque(OpaqueType),
    OpaqueGeneric(OpaqueGenericType),
    OpaqueGenericInstance(OpaqueGenericInstance),
}

impl TypeData {
    /// Short shape name, for tracing fields.
    pub fn shape(&self) -> &'static str {
        match self {
            TypeData::Primitive(_) => "primitive",
            TypeData::Tuple(_) => "tuple",
            TypeData::Vector { .. } => "vector",
            TypeData::Ref { .. } => "ref",
            TypeData::Function(_) => "function",
            TypeData::Struct(_) => "struct",
            TypeData::Interface(_) => "interface",
            TypeData::Algebraic(_) => "algebraic",
            TypeData::Constraint(_) => "constraint",
            TypeData::Generic(_) => "generic",
            TypeData::GenericInstance(_) => "generic instance",
            TypeData::Wildcard(_) => "wildcard",
            TypeData::Opaque(_) => "opaque",
            TypeData::OpaqueGeneric(_) => "opaque generic",
            TypeData::OpaqueGenericInstance(_) => "opaque generic instance",
        }
    }

    /// Whether this is a placeholder that still has no resolved meaning.
    pub fn is_unresolved_placeholder(&self) -> bool {
        match self {
            TypeData::Wildcard(w) => w.value.is_none(),
            TypeData::Opaque(o) => o.eval.is_none(),
            TypeData::OpaqueGeneric(o) => o.eval.is_none(),
            TypeData::OpaqueGenericInstance(o) => o.generate.is_none(),
            _ => false,
        }
    }
}
