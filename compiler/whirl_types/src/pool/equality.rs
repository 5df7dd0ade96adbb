//! Structural type equality.
//!
//! Equality looks through bound wildcards and evaluated opaques on both
//! sides. Unresolved placeholders are equal only to themselves.
//!
//! Nominal shapes (structs, algebraic types, interfaces) may be cyclic, so a
//! pair under comparison is assumed equal while its members are compared.
//! Every sub-comparison is a conjunct of the top-level answer, so an
//! assumption that later fails also fails the whole query.

use rustc_hash::FxHashSet;

use crate::stack::ensure_sufficient_stack;
use crate::{Idx, Pool, Specialization, TypeData};

impl Pool {
    /// Structural equality of two types.
    pub fn equals(&self, a: Idx, b: Idx) -> bool {
        Equality::new(self).eq(a, b)
    }

    /// Whether `ty` is equal to any member of `types`.
    pub fn contains_type(&self, ty: Idx, types: &[Idx]) -> bool {
        types.iter().any(|&t| self.equals(ty, t))
    }

    /// Pairwise equality of two type lists of the same length.
    pub fn types_equal(&self, a: &[Idx], b: &[Idx]) -> bool {
        Equality::new(self).eq_all(a, b)
    }

    /// Whether two method specializations match the same types.
    pub fn specializations_match(&self, a: &Specialization, b: &Specialization) -> bool {
        self.types_equal(&a.matching_types, &b.matching_types)
    }
}

struct Equality<'pool> {
    pool: &'pool Pool,
    assumed: FxHashSet<(Idx, Idx)>,
}

impl<'pool> Equality<'pool> {
    fn new(pool: &'pool Pool) -> Self {
        Self {
            pool,
            assumed: FxHashSet::default(),
        }
    }

    fn eq(&mut self, a: Idx, b: Idx) -> bool {
        ensure_sufficient_stack(|| self.eq_inner(a, b))
    }

    fn eq_all(&mut self, a: &[Idx], b: &[Idx]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| self.eq(x, y))
    }

    fn eq_inner(&mut self, a: Idx, b: Idx) -> bool {
        if a == b {
            return true;
        }

        let pool = self.pool;
        let a = pool.unwrap_placeholders(a);
        let b = pool.unwrap_placeholders(b);
        if a == b || self.assumed.contains(&(a, b)) {
            return true;
        }

        // Instances unify only through their root generic; an instance
        // compared against anything else stands for its generate.
        match (pool.instance_parts(a), pool.instance_parts(b)) {
            (Some((root_a, params_a)), Some((root_b, params_b))) => {
                return root_a == root_b && self.eq_all(&params_a, &params_b);
            }
            (Some(_), None) => {
                return pool
                    .instance_generate(a)
                    .is_some_and(|generate| self.eq(generate, b));
            }
            (None, Some(_)) => {
                return pool
                    .instance_generate(b)
                    .is_some_and(|generate| self.eq(a, generate));
            }
            (None, None) => {}
        }

        match (pool.get(a), pool.get(b)) {
            (TypeData::Primitive(x), TypeData::Primitive(y)) => x == y,
            (TypeData::Tuple(x), TypeData::Tuple(y)) => self.eq_all(x, y),
            (
                TypeData::Vector { elem: ea, size: sa },
                TypeData::Vector { elem: eb, size: sb },
            ) => sa == sb && self.eq(*ea, *eb),
            (
                TypeData::Ref {
                    elem: ea,
                    constant: ca,
                },
                TypeData::Ref {
                    elem: eb,
                    constant: cb,
                },
            ) => ca == cb && self.eq(*ea, *eb),
            (TypeData::Function(fa), TypeData::Function(fb)) => {
                self.eq_all(&fa.params, &fb.params) && self.eq(fa.ret, fb.ret)
            }
            (TypeData::Struct(sa), TypeData::Struct(sb)) => {
                if sa.name != sb.name
                    || sa.package != sb.package
                    || sa.packed != sb.packed
                    || sa.fields.len() != sb.fields.len()
                {
                    return false;
                }
                self.assumed.insert((a, b));

                let fields_match = sa.fields.iter().zip(&sb.fields).all(|(fa, fb)| {
                    fa.name == fb.name && fa.constant == fb.constant && self.eq(fa.ty, fb.ty)
                });
                fields_match
                    && match (sa.inherit, sb.inherit) {
                        (Some(ia), Some(ib)) => self.eq(ia, ib),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (TypeData::Interface(ia), TypeData::Interface(ib)) => {
                if ia.name != ib.name
                    || ia.methods.len() != ib.methods.len()
                    || !ia.methods.keys().eq(ib.methods.keys())
                {
                    return false;
                }
                self.assumed.insert((a, b));

                ia.methods
                    .values()
                    .zip(ib.methods.values())
                    .all(|(ma, mb)| self.eq(ma.signature, mb.signature))
            }
            (TypeData::Algebraic(aa), TypeData::Algebraic(ab)) => {
                if aa.name != ab.name
                    || aa.package != ab.package
                    || aa.closed != ab.closed
                    || aa.variants.len() != ab.variants.len()
                {
                    return false;
                }
                self.assumed.insert((a, b));

                aa.variants
                    .iter()
                    .zip(&ab.variants)
                    .all(|(va, vb)| va.name == vb.name && self.eq_all(&va.values, &vb.values))
            }
            (TypeData::Constraint(ca), TypeData::Constraint(cb)) => {
                ca.name == cb.name && ca.intrinsic == cb.intrinsic && self.eq_all(&ca.types, &cb.types)
            }
            (TypeData::Generic(ga), TypeData::Generic(gb)) => {
                if ga.params.len() != gb.params.len() {
                    return false;
                }

                // Corresponding type parameters stand for each other inside
                // the templates.
                for (&wa, &wb) in ga.params.iter().zip(&gb.params) {
                    let constraints_match = match (pool.get(wa), pool.get(wb)) {
                        (TypeData::Wildcard(x), TypeData::Wildcard(y)) => {
                            self.eq_all(&x.constraints, &y.constraints)
                        }
                        _ => false,
                    };
                    if !constraints_match {
                        return false;
                    }
                    self.assumed.insert((wa, wb));
                }

                self.eq(ga.template, gb.template)
            }
            // Unresolved wildcards and opaques only ever matched by identity,
            // which was checked above.
            _ => false,
        }
    }
}
