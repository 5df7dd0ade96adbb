use pretty_assertions::assert_eq;

use super::*;

fn idx(raw: u32) -> Idx {
    Idx::from_raw(raw)
}

#[test]
fn private_copy_keeps_attachment() {
    let binding = Binding::generic(idx(20), vec![idx(21)], idx(22)).with_exported(true);
    let copy = binding.private_copy();

    assert_eq!(copy.match_type, binding.match_type);
    assert_eq!(copy.wildcards, binding.wildcards);
    assert_eq!(copy.interf, binding.interf);
    assert!(!copy.exported);
    assert!(copy.is_generic());
}

#[test]
fn import_takes_only_exported_bindings() {
    let mut dependency = BindingRegistry::new();
    dependency.push(Binding::new(idx(20), idx(30)).with_exported(true));
    dependency.push(Binding::new(idx(21), idx(31)));
    dependency.push(Binding::new(idx(22), idx(32)).with_exported(true));

    let mut package = BindingRegistry::new();
    let imported = package.import_exported(&dependency);

    assert_eq!(imported, 2);
    let matched: Vec<_> = package.iter().map(|b| (b.match_type, b.exported)).collect();
    assert_eq!(matched, vec![(idx(20), false), (idx(22), false)]);
}

#[test]
fn clear_empties_local_scope() {
    let mut local = BindingRegistry::new();
    local.push(Binding::new(idx(20), idx(30)));
    assert_eq!(local.len(), 1);

    local.clear();
    assert!(local.is_empty());
}
