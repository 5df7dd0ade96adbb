//! End-to-end behavior of the type algebra as the semantic walker drives it.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use whirl_types::{
    AlgebraicVariant, Binding, BindingRegistry, BindingScope, Idx, InterfMethod, MethodKind,
    PackageId, Pool, Solver, StructField, TypeData,
};

struct Unit {
    pool: Pool,
    local: BindingRegistry,
    global: BindingRegistry,
}

impl Unit {
    fn new() -> Self {
        whirl_types::init_tracing();
        Self {
            pool: Pool::new(),
            local: BindingRegistry::new(),
            global: BindingRegistry::new(),
        }
    }

    fn solver(&mut self) -> Solver<'_> {
        Solver::new(&mut self.pool, &mut self.local, &mut self.global)
    }
}

fn xy(pool: &mut Pool, name: &str) -> Idx {
    pool.structure(
        name,
        PackageId(0),
        vec![StructField::new("x", Idx::INT), StructField::new("y", Idx::INT)],
    )
}

#[test]
fn rune_coerces_to_string_only() {
    let mut unit = Unit::new();
    let mut solver = unit.solver();
    assert!(solver.coerce_to(Idx::RUNE, Idx::STRING));
    assert!(!solver.coerce_to(Idx::STRING, Idx::RUNE));
}

#[test]
fn integral_widening_keeps_signedness() {
    let mut unit = Unit::new();
    let mut solver = unit.solver();
    assert!(solver.coerce_to(Idx::SHORT, Idx::LONG));
    assert!(!solver.coerce_to(Idx::SHORT, Idx::ULONG));
}

#[test]
fn bool_to_int_needs_a_cast() {
    let mut unit = Unit::new();
    let mut solver = unit.solver();
    assert!(solver.cast_to(Idx::BOOL, Idx::INT));
    assert!(!solver.coerce_to(Idx::BOOL, Idx::INT));
}

#[test]
fn identical_layouts_cast_across_names() {
    let mut unit = Unit::new();
    let vec2 = xy(&mut unit.pool, "Vec2");
    let point = xy(&mut unit.pool, "Point2D");

    let mut solver = unit.solver();
    assert!(solver.cast_to(vec2, point));
    assert!(solver.cast_to(point, vec2));
    assert!(!solver.coerce_to(vec2, point));
}

#[test]
fn binding_makes_circle_a_shape() {
    let mut unit = Unit::new();
    let area = unit.pool.function(Vec::new(), Idx::FLOAT);
    let shape = unit.pool.interface_type(
        "Shape",
        BTreeMap::from([("area".to_owned(), InterfMethod::new(area, MethodKind::Abstract))]),
    );
    let circle = unit.pool.structure(
        "Circle",
        PackageId(0),
        vec![StructField::new("radius", Idx::FLOAT)],
    );
    let circle_methods = unit.pool.interface_type(
        "Circle",
        BTreeMap::from([("area".to_owned(), InterfMethod::new(area, MethodKind::Virtual))]),
    );

    let mut solver = unit.solver();
    assert!(!solver.implements_interf(circle, shape));
    assert!(!solver.coerce_to(circle, shape));

    solver
        .add_binding(BindingScope::Local, Binding::new(circle, circle_methods))
        .unwrap();
    assert!(solver.implements_interf(circle, shape));
    assert!(solver.coerce_to(circle, shape));
    // Interface values can be cast back to an implementing type.
    assert!(solver.cast_to(shape, circle));
}

#[test]
fn option_instances_are_shared() {
    let mut unit = Unit::new();
    let t = unit.pool.wildcard("T", Vec::new());
    let template = unit.pool.algebraic(
        "Option",
        PackageId(0),
        vec![
            AlgebraicVariant::new("Some", vec![t]),
            AlgebraicVariant::new("None", Vec::new()),
        ],
        false,
    );
    let option = unit.pool.generic(vec![t], template);

    let mut solver = unit.solver();
    let first = solver.create_generic_instance(option, &[Idx::INT], None).unwrap();
    let second = solver.create_generic_instance(option, &[Idx::INT], None).unwrap();
    assert_eq!(first, second);

    let pool = solver.pool();
    let generate = pool.instance_generate(first).unwrap();
    assert_eq!(pool.instance_generate(second), Some(generate));
    let TypeData::Algebraic(at) = pool.get(generate) else {
        panic!("expected algebraic generate");
    };
    assert_eq!(at.variants[0].values, vec![Idx::INT]);
    assert!(at.variants[1].values.is_empty());
    assert_eq!(pool.format_type(first), "Option<int>");
}

#[test]
fn evaluated_opaque_is_transparent() {
    let mut unit = Unit::new();
    let node = xy(&mut unit.pool, "Node");
    let same_node = xy(&mut unit.pool, "Node");
    let other = xy(&mut unit.pool, "Other");
    let opaque = unit.pool.opaque("Node");
    let list_of_opaque = unit.pool.vector(opaque, 2);
    let list_of_node = unit.pool.vector(node, 2);

    let mut solver = unit.solver();
    assert!(!solver.pool().equals(opaque, node));
    assert!(!solver.coerce_to(list_of_opaque, list_of_node));

    solver.evaluate_opaque(opaque, node);
    let pool = solver.pool();
    for other_ty in [node, same_node, other, Idx::INT] {
        assert_eq!(pool.equals(opaque, other_ty), pool.equals(node, other_ty));
    }
    assert_eq!(pool.format_type(opaque), pool.format_type(node));
    assert!(solver.coerce_to(list_of_opaque, list_of_node));
}

#[test]
fn pending_instance_is_repaired_on_evaluation() {
    let mut unit = Unit::new();
    let boxed_opaque = unit.pool.opaque_generic("Box");
    let t = unit.pool.wildcard("T", Vec::new());
    let template = unit
        .pool
        .structure("Box", PackageId(0), vec![StructField::new("value", t)]);
    let boxed = unit.pool.generic(vec![t], template);

    let mut solver = unit.solver();
    let pending = solver.request_instance(boxed_opaque, &[Idx::INT], None).unwrap();
    assert_eq!(solver.pool().instance_generate(pending), None);

    solver.evaluate_opaque_generic(boxed_opaque, boxed).unwrap();
    let direct = solver.create_generic_instance(boxed, &[Idx::INT], None).unwrap();

    let pool = solver.pool();
    assert!(pool.equals(pending, direct));
    assert_eq!(pool.inner_type(pending), pool.inner_type(direct));
    assert_eq!(pool.format_type(pending), "Box<int>");

    // Later requests go straight to the real generic.
    let again = solver.request_instance(boxed_opaque, &[Idx::INT], None).unwrap();
    assert_eq!(again, direct);
}

#[test]
fn pending_instances_inside_templates_follow_the_opaque() {
    let mut unit = Unit::new();
    // `Tree<T> { children: [4]Forest<T> }` where `Forest` is not yet defined.
    let forest_opaque = unit.pool.opaque_generic("Forest");
    let t = unit.pool.wildcard("T", Vec::new());

    let mut solver = unit.solver();
    let forest_t = solver.request_instance(forest_opaque, &[t], None).unwrap();
    let pool = solver.pool_mut();
    let children = pool.vector(forest_t, 4);
    let tree_template = pool.structure(
        "Tree",
        PackageId(0),
        vec![StructField::new("children", children)],
    );
    let tree = pool.generic(vec![t], tree_template);

    let tree_bool = solver.create_generic_instance(tree, &[Idx::BOOL], None).unwrap();

    // `Forest<U> = [2]U`
    let pool = solver.pool_mut();
    let u = pool.wildcard("U", Vec::new());
    let forest_template = pool.vector(u, 2);
    let forest = pool.generic(vec![u], forest_template);
    solver.evaluate_opaque_generic(forest_opaque, forest).unwrap();

    let expected = solver.create_generic_instance(forest, &[Idx::BOOL], None).unwrap();
    let pool = solver.pool();
    let generate = pool.instance_generate(tree_bool).unwrap();
    let TypeData::Struct(st) = pool.get(generate) else {
        panic!("expected struct generate");
    };
    let TypeData::Vector { elem, .. } = pool.get(st.fields[0].ty) else {
        panic!("expected vector field");
    };
    assert!(pool.equals(*elem, expected));
}

#[test]
fn imported_bindings_are_private() {
    let mut dependency = Unit::new();
    let sig = dependency.pool.function(Vec::new(), Idx::STRING);
    let show = dependency.pool.interface_type(
        "Show",
        BTreeMap::from([("show".to_owned(), InterfMethod::new(sig, MethodKind::Virtual))]),
    );
    dependency
        .solver()
        .add_binding(
            BindingScope::Global,
            Binding::new(Idx::INT, show).with_exported(true),
        )
        .unwrap();

    let mut package = BindingRegistry::new();
    assert_eq!(package.import_exported(&dependency.global), 1);
    assert!(package.iter().all(|b| !b.exported));
}
