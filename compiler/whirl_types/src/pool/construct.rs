//! Type construction helpers for the Pool.

use std::collections::BTreeMap;

use crate::{
    AlgebraicType, AlgebraicVariant, ConstraintType, FuncType, GenericType, Idx, InterfMethod,
    InterfType, IntrinsicSet, OpaqueGenericType, OpaqueType, PackageId, Pool, Primitive,
    StructField, StructType, TypeData, TypeParams, WildcardType,
};

impl Pool {
    // === Structural constructors ===

    /// The pre-interned index for a primitive, or a fresh entry for an
    /// unknown spec code.
    pub fn primitive(&mut self, prim: Primitive) -> Idx {
        match prim.interned() {
            Some(idx) => idx,
            None => self.alloc(TypeData::Primitive(prim)),
        }
    }

    /// Create a tuple type `(a, b, ...)`.
    pub fn tuple(&mut self, elems: impl Into<Vec<Idx>>) -> Idx {
        self.alloc(TypeData::Tuple(elems.into()))
    }

    /// Create a fixed-size vector type `[size]elem`.
    pub fn vector(&mut self, elem: Idx, size: u32) -> Idx {
        self.alloc(TypeData::Vector { elem, size })
    }

    /// Create a reference type `&elem` or `const &elem`.
    pub fn reference(&mut self, elem: Idx, constant: bool) -> Idx {
        self.alloc(TypeData::Ref { elem, constant })
    }

    /// Create a function type `func(params) -> ret`.
    pub fn function(&mut self, params: impl Into<Vec<Idx>>, ret: Idx) -> Idx {
        self.alloc(TypeData::Function(FuncType {
            params: params.into(),
            ret,
        }))
    }

    // === Nominal constructors ===

    /// Create an unpacked struct with no parent.
    pub fn structure(
        &mut self,
        name: impl Into<String>,
        package: PackageId,
        fields: Vec<StructField>,
    ) -> Idx {
        self.struct_type(StructType {
            name: name.into(),
            package,
            fields,
            inherit: None,
            packed: false,
        })
    }

    /// Create a struct from a fully specified definition.
    pub fn struct_type(&mut self, st: StructType) -> Idx {
        self.alloc(TypeData::Struct(st))
    }

    /// Create an interface with an empty implementation memo.
    pub fn interface_type(
        &mut self,
        name: impl Into<String>,
        methods: BTreeMap<String, InterfMethod>,
    ) -> Idx {
        self.alloc(TypeData::Interface(InterfType {
            name: name.into(),
            methods,
            instances: Vec::new(),
        }))
    }

    /// Create an algebraic (sum) type.
    pub fn algebraic(
        &mut self,
        name: impl Into<String>,
        package: PackageId,
        variants: Vec<AlgebraicVariant>,
        closed: bool,
    ) -> Idx {
        self.alloc(TypeData::Algebraic(AlgebraicType {
            name: name.into(),
            package,
            variants,
            closed,
        }))
    }

    /// Create an ordinary type set.
    pub fn constraint(&mut self, name: impl Into<String>, types: Vec<Idx>) -> Idx {
        self.alloc(TypeData::Constraint(ConstraintType {
            name: name.into(),
            types,
            intrinsic: None,
        }))
    }

    /// Create a type set with built-in membership rules.
    pub fn intrinsic_constraint(&mut self, set: IntrinsicSet, types: Vec<Idx>) -> Idx {
        self.alloc(TypeData::Constraint(ConstraintType {
            name: set.name().to_owned(),
            types,
            intrinsic: Some(set),
        }))
    }

    // === Generics and placeholders ===

    /// Create a type parameter. An empty constraint list accepts any type.
    pub fn wildcard(&mut self, name: impl Into<String>, constraints: Vec<Idx>) -> Idx {
        self.alloc(TypeData::Wildcard(WildcardType {
            name: name.into(),
            constraints,
            value: None,
        }))
    }

    /// Create a generic over `params` (wildcards) with the given template.
    pub fn generic(&mut self, params: impl Into<TypeParams>, template: Idx) -> Idx {
        self.alloc(TypeData::Generic(GenericType {
            params: params.into(),
            template,
            instances: Vec::new(),
        }))
    }

    /// Create an unresolved forward reference to a non-generic type.
    pub fn opaque(&mut self, name: impl Into<String>) -> Idx {
        self.alloc(TypeData::Opaque(OpaqueType {
            name: name.into(),
            eval: None,
        }))
    }

    /// Create an unresolved forward reference to a generic type.
    pub fn opaque_generic(&mut self, name: impl Into<String>) -> Idx {
        self.alloc(TypeData::OpaqueGeneric(OpaqueGenericType {
            name: name.into(),
            eval: None,
            instances: Vec::new(),
        }))
    }
}
