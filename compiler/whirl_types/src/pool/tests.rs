use std::collections::BTreeMap;

use pretty_assertions::assert_eq;

use crate::{
    AlgebraicVariant, Idx, InterfMethod, MethodKind, PackageId, Pool, StructField, StructType,
    TypeData,
};

fn point(pool: &mut Pool, name: &str, package: u32) -> Idx {
    pool.structure(
        name,
        PackageId(package),
        vec![StructField::new("x", Idx::INT), StructField::new("y", Idx::INT)],
    )
}

#[test]
fn primitives_are_preinterned() {
    let pool = Pool::new();
    assert_eq!(pool.len(), Idx::PRIMITIVE_COUNT as usize);
    assert!(matches!(pool.get(Idx::STRING), TypeData::Primitive(p) if p.spec == 1));
}

#[test]
fn structural_equality_of_anonymous_shapes() {
    let mut pool = Pool::new();
    let a = pool.tuple([Idx::INT, Idx::STRING]);
    let b = pool.tuple([Idx::INT, Idx::STRING]);
    let c = pool.tuple([Idx::STRING, Idx::INT]);
    assert!(pool.equals(a, b));
    assert!(!pool.equals(a, c));

    let v4 = pool.vector(Idx::BYTE, 4);
    let v8 = pool.vector(Idx::BYTE, 8);
    let v4_again = pool.vector(Idx::BYTE, 4);
    assert!(pool.equals(v4, v4_again));
    assert!(!pool.equals(v4, v8));

    let r = pool.reference(Idx::INT, false);
    let cr = pool.reference(Idx::INT, true);
    assert!(!pool.equals(r, cr));
}

#[test]
fn struct_identity_includes_name_and_package() {
    let mut pool = Pool::new();
    let a = point(&mut pool, "Point", 1);
    let same = point(&mut pool, "Point", 1);
    let other_pkg = point(&mut pool, "Point", 2);
    let other_name = point(&mut pool, "Vec2", 1);

    assert!(pool.equals(a, same));
    assert!(!pool.equals(a, other_pkg));
    assert!(!pool.equals(a, other_name));
}

#[test]
fn self_referential_structs_compare() {
    let mut pool = Pool::new();
    let node = |pool: &mut Pool| {
        let idx = pool.structure("Node", PackageId(0), Vec::new());
        let next = pool.reference(idx, false);
        pool.replace(
            idx,
            TypeData::Struct(StructType {
                name: "Node".into(),
                package: PackageId(0),
                fields: vec![
                    StructField::new("value", Idx::INT),
                    StructField::new("next", next),
                ],
                inherit: None,
                packed: false,
            }),
        );
        idx
    };
    let a = node(&mut pool);
    let b = node(&mut pool);
    assert!(pool.equals(a, b));
}

#[test]
fn unresolved_placeholders_equal_only_themselves() {
    let mut pool = Pool::new();
    let a = pool.opaque("A");
    let b = pool.opaque("A");
    let t = pool.wildcard("T", Vec::new());
    let u = pool.wildcard("T", Vec::new());

    assert!(pool.equals(a, a));
    assert!(!pool.equals(a, b));
    assert!(pool.equals(t, t));
    assert!(!pool.equals(t, u));
    assert!(!pool.equals(t, Idx::INT));
}

#[test]
fn bound_wildcards_are_transparent() {
    let mut pool = Pool::new();
    let t = pool.wildcard("T", Vec::new());
    pool.set_wildcard_value(t, Some(Idx::DOUBLE));

    assert!(pool.equals(t, Idx::DOUBLE));
    assert_eq!(pool.inner_type(t), Idx::DOUBLE);
    assert_eq!(pool.format_type(t), "double");
}

#[test]
fn generics_equal_up_to_parameter_renaming() {
    let mut pool = Pool::new();
    let t = pool.wildcard("T", Vec::new());
    let vt = pool.vector(t, 2);
    let ga = pool.generic(vec![t], vt);

    let u = pool.wildcard("U", Vec::new());
    let vu = pool.vector(u, 2);
    let gb = pool.generic(vec![u], vu);

    let w = pool.wildcard("W", vec![Idx::INT]);
    let vw = pool.vector(w, 2);
    let gc = pool.generic(vec![w], vw);

    assert!(pool.equals(ga, gb));
    assert!(!pool.equals(ga, gc));
}

#[test]
fn interfaces_compare_by_name_and_signatures() {
    let mut pool = Pool::new();
    let sig = pool.function(Vec::new(), Idx::FLOAT);
    let other_sig = pool.function(Vec::new(), Idx::DOUBLE);
    let methods = |sig: Idx| -> BTreeMap<String, InterfMethod> {
        BTreeMap::from([("area".to_owned(), InterfMethod::new(sig, MethodKind::Abstract))])
    };

    let a = pool.interface_type("Shape", methods(sig));
    let b = pool.interface_type("Shape", methods(sig));
    let c = pool.interface_type("Shape", methods(other_sig));
    assert!(pool.equals(a, b));
    assert!(!pool.equals(a, c));
}

#[test]
fn algebraic_types_compare_variants_in_order() {
    let mut pool = Pool::new();
    let variants = || {
        vec![
            AlgebraicVariant::new("Some", vec![Idx::INT]),
            AlgebraicVariant::new("None", Vec::new()),
        ]
    };
    let a = pool.algebraic("Option", PackageId(0), variants(), false);
    let b = pool.algebraic("Option", PackageId(0), variants(), false);
    let closed = pool.algebraic("Option", PackageId(0), variants(), true);

    assert!(pool.equals(a, b));
    assert!(!pool.equals(a, closed));
}

#[test]
fn format_shapes() {
    let mut pool = Pool::new();
    let tuple = pool.tuple([Idx::INT, Idx::RUNE]);
    let vector = pool.vector(Idx::DOUBLE, 3);
    let cref = pool.reference(vector, true);
    let func = pool.function([tuple], Idx::BOOL);
    let proc_ = pool.function([Idx::STRING], Idx::NOTHING);

    assert_eq!(pool.format_type(tuple), "(int, rune)");
    assert_eq!(pool.format_type(cref), "const &[3]double");
    assert_eq!(pool.format_type(func), "func((int, rune)) -> bool");
    assert_eq!(pool.format_type(proc_), "func(string)");
}

#[test]
fn format_unresolved_placeholders() {
    let mut pool = Pool::new();
    let opaque = pool.opaque("Later");
    let og = pool.opaque_generic("List");

    assert_eq!(pool.format_type(opaque), "Later");
    assert_eq!(pool.format_type(og), "<opaque generic>");
}

#[test]
fn opaque_eval_is_followed() {
    let mut pool = Pool::new();
    let target = point(&mut pool, "Point", 0);
    let opaque = pool.opaque("Point");
    if let TypeData::Opaque(op) = pool.get_mut(opaque) {
        op.eval = Some(target);
    }

    assert!(pool.equals(opaque, target));
    assert_eq!(pool.format_type(opaque), "Point");
    assert_eq!(pool.inner_type(opaque), target);
}

#[test]
fn contains_type_uses_structural_equality() {
    let mut pool = Pool::new();
    let a = pool.tuple([Idx::INT]);
    let b = pool.tuple([Idx::INT]);
    assert!(pool.contains_type(a, &[Idx::BOOL, b]));
    assert!(!pool.contains_type(a, &[Idx::BOOL]));
}
