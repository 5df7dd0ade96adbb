//! Explicit conversion (casting).
//!
//! Every coercion is also a cast. Beyond that:
//! - anything casts from `any`
//! - numeric primitives cast between each other, `bool` casts to integrals
//! - tuples and vectors cast element-wise
//! - structs cast when their memory layout is identical (same packing, same
//!   field names with exactly equal types, equal parent), whatever their name
//! - algebraic types cast when their variants are equal in order
//! - interfaces cast to interfaces with no conflicting method signatures and
//!   to any type implementing them
//! - a type set casts to any of its members
//!
//! References, functions and unresolved placeholders define no casts of their
//! own. Converting a reference to an integer is an unsafe intrinsic, not a
//! cast, and a function cast would need a synthesized wrapper.

use crate::stack::ensure_sufficient_stack;
use crate::{Idx, PrimKind, TypeData};

use super::Solver;

impl Solver<'_> {
    /// Whether `src` may be converted to `dest` with an explicit cast.
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn cast_to(&mut self, src: Idx, dest: Idx) -> bool {
        ensure_sufficient_stack(|| self.coerce_to(src, dest) || self.cast_inner(src, dest))
    }

    fn cast_inner(&mut self, src: Idx, dest: Idx) -> bool {
        let declared_dest = self.pool.unwrap_placeholders(dest);
        let src = self.pool.inner_type(src);
        let dest = self.pool.inner_type(dest);

        // Casting into an unbound wildcard succeeds if casting into any of
        // its constraints does.
        if let TypeData::Wildcard(wc) = self.pool.get(dest) {
            let constraints = wc.constraints.clone();
            if constraints.iter().any(|&c| self.cast_to(src, c)) {
                return true;
            }
        }

        match self.pool.get(src) {
            TypeData::Primitive(sp) => {
                let sp = *sp;
                if sp.is_any() {
                    return true;
                }
                match self.pool.get(dest) {
                    TypeData::Primitive(dp) => {
                        (sp.is_numeric() && dp.is_numeric())
                            || (sp.kind == PrimKind::Boolean
                                && dp.kind == PrimKind::Integral)
                    }
                    _ => false,
                }
            }
            TypeData::Tuple(src_elems) => {
                let src_elems = src_elems.clone();
                match self.pool.get(dest) {
                    TypeData::Tuple(dest_elems) if dest_elems.len() == src_elems.len() => {
                        let dest_elems = dest_elems.clone();
                        src_elems
                            .iter()
                            .zip(&dest_elems)
                            .all(|(&s, &d)| self.cast_to(s, d))
                    }
                    _ => false,
                }
            }
            TypeData::Vector {
                elem: src_elem,
                size: src_size,
            } => {
                let (src_elem, src_size) = (*src_elem, *src_size);
                match self.pool.get(dest) {
                    TypeData::Vector {
                        elem: dest_elem,
                        size: dest_size,
                    } if *dest_size == src_size => {
                        let dest_elem = *dest_elem;
                        self.cast_to(src_elem, dest_elem)
                    }
                    _ => false,
                }
            }
            TypeData::Struct(_) => self.cast_struct(src, dest),
            TypeData::Interface(src_it) => {
                if let TypeData::Interface(dest_it) = self.pool.get(dest) {
                    // The concrete type behind an interface value is erased,
                    // so only declared signatures can be checked statically.
                    return src_it.methods.iter().all(|(name, method)| {
                        dest_it.methods.get(name).map_or(true, |other| {
                            self.pool.equals(method.signature, other.signature)
                        })
                    });
                }

                self.implements_interf(declared_dest, src)
            }
            TypeData::Algebraic(sa) => match self.pool.get(dest) {
                TypeData::Algebraic(da) => {
                    sa.closed == da.closed
                        && sa.variants.len() == da.variants.len()
                        && sa.variants.iter().zip(&da.variants).all(|(sv, dv)| {
                            sv.name == dv.name && self.pool.types_equal(&sv.values, &dv.values)
                        })
                }
                _ => false,
            },
            TypeData::Constraint(ct) => self.pool.contains_type(dest, &ct.types),
            TypeData::Wildcard(wc) => {
                let constraints = wc.constraints.clone();
                constraints.iter().any(|&c| self.cast_to(c, dest))
            }
            _ => false,
        }
    }

    /// Layout-identical struct reinterpretation.
    fn cast_struct(&self, src: Idx, dest: Idx) -> bool {
        let pool = &*self.pool;
        let (TypeData::Struct(ss), TypeData::Struct(ds)) = (pool.get(src), pool.get(dest)) else {
            return false;
        };

        if ss.packed != ds.packed || ss.fields.len() != ds.fields.len() {
            return false;
        }

        // Fields must be exactly equal: two coercible field types may still
        // mean different things.
        let fields_match = ss.fields.iter().all(|field| {
            ds.field(&field.name).is_some_and(|other| {
                field.constant == other.constant && pool.equals(field.ty, other.ty)
            })
        });

        fields_match
            && match (ss.inherit, ds.inherit) {
                (Some(a), Some(b)) => pool.equals(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}
