//! Property-based tests for coercion and casting.
//!
//! Types are generated as small trees of primitives, tuples, vectors,
//! references and structs, built into a fresh pool per case.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::needless_pass_by_value,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use whirl_types::{BindingRegistry, Idx, PackageId, Pool, Solver, StructField, StructType};

const PRIMITIVES: [Idx; 15] = [
    Idx::NOTHING,
    Idx::ANY,
    Idx::BOOL,
    Idx::SBYTE,
    Idx::BYTE,
    Idx::SHORT,
    Idx::USHORT,
    Idx::INT,
    Idx::UINT,
    Idx::LONG,
    Idx::ULONG,
    Idx::FLOAT,
    Idx::DOUBLE,
    Idx::RUNE,
    Idx::STRING,
];

/// Pool-independent description of a type.
#[derive(Clone, Debug)]
enum Shape {
    Prim(Idx),
    Tuple(Vec<Shape>),
    Vector(Box<Shape>, u32),
    Ref(Box<Shape>, bool),
    Struct(String, Vec<(String, Shape)>),
}

impl Shape {
    fn build(&self, pool: &mut Pool) -> Idx {
        match self {
            Shape::Prim(idx) => *idx,
            Shape::Tuple(elems) => {
                let elems: Vec<_> = elems.iter().map(|e| e.build(pool)).collect();
                pool.tuple(elems)
            }
            Shape::Vector(elem, size) => {
                let elem = elem.build(pool);
                pool.vector(elem, *size)
            }
            Shape::Ref(elem, constant) => {
                let elem = elem.build(pool);
                pool.reference(elem, *constant)
            }
            Shape::Struct(name, fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| StructField::new(name.clone(), ty.build(pool)))
                    .collect();
                pool.structure(name.clone(), PackageId(0), fields)
            }
        }
    }
}

fn primitive() -> impl Strategy<Value = Idx> {
    prop::sample::select(PRIMITIVES.to_vec())
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = primitive().prop_map(Shape::Prim);
    leaf.prop_recursive(3, 16, 3, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 1..4).prop_map(Shape::Tuple),
            (inner.clone(), 1u32..4).prop_map(|(e, n)| Shape::Vector(Box::new(e), n)),
            (inner.clone(), any::<bool>()).prop_map(|(e, c)| Shape::Ref(Box::new(e), c)),
            (
                "[A-Z][a-z]{0,5}",
                prop::collection::vec(("[a-z]{1,3}", inner), 0..3)
            )
                .prop_map(|(name, fields)| Shape::Struct(name, fields)),
        ]
    })
}

fn field_list() -> impl Strategy<Value = Vec<(String, Idx)>> {
    prop::collection::btree_map("[a-z]{1,4}", primitive(), 0..4)
        .prop_map(|fields| fields.into_iter().collect())
}

fn with_solver<R>(f: impl FnOnce(&mut Solver<'_>) -> R) -> R {
    let mut pool = Pool::new();
    let mut local = BindingRegistry::new();
    let mut global = BindingRegistry::new();
    let mut solver = Solver::new(&mut pool, &mut local, &mut global);
    f(&mut solver)
}

proptest! {
    #[test]
    fn coercion_is_reflexive(shape in shape()) {
        with_solver(|solver| {
            let ty = shape.build(solver.pool_mut());
            prop_assert!(solver.coerce_to(ty, ty));
            Ok(())
        })?;
    }

    #[test]
    fn primitive_coercion_has_no_cycles(a in primitive(), b in primitive()) {
        prop_assume!(a != b);
        with_solver(|solver| {
            prop_assert!(!(solver.coerce_to(a, b) && solver.coerce_to(b, a)));
            Ok(())
        })?;
    }

    #[test]
    fn casting_is_a_superset_of_coercion(a in shape(), b in shape()) {
        with_solver(|solver| {
            let src = a.build(solver.pool_mut());
            let dest = b.build(solver.pool_mut());
            if solver.coerce_to(src, dest) {
                prop_assert!(solver.cast_to(src, dest));
            }
            Ok(())
        })?;
    }

    #[test]
    fn struct_cast_is_symmetric(
        fields in field_list(),
        packed in any::<bool>(),
        (name_a, name_b) in ("[A-Z][a-z]{0,5}", "[A-Z][a-z]{0,5}"),
        (pkg_a, pkg_b) in (0u32..4, 0u32..4),
    ) {
        with_solver(|solver| {
            let mut build = |name: &str, package: u32, fields: &[(String, Idx)]| {
                solver.pool_mut().struct_type(StructType {
                    name: name.to_owned(),
                    package: PackageId(package),
                    fields: fields
                        .iter()
                        .map(|(field, ty)| StructField::new(field.clone(), *ty))
                        .collect(),
                    inherit: None,
                    packed,
                })
            };
            let a = build(&name_a, pkg_a, &fields);
            // Field order does not affect layout identity by name.
            let reversed: Vec<_> = fields.iter().rev().cloned().collect();
            let b = build(&name_b, pkg_b, &reversed);

            prop_assert!(solver.cast_to(a, b));
            prop_assert!(solver.cast_to(b, a));
            Ok(())
        })?;
    }
}
