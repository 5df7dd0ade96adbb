//! Implicit conversion (coercion).
//!
//! Coercion is legal only between types of equivalent meaning: no coercion
//! may change the significance of a value. `rune` to `string` keeps the text,
//! so it coerces. `int` to `uint` could change the number and `bool` to `int`
//! changes what the value means, so both require an explicit cast.
//!
//! Structs and algebraic types never coerce: their declaring package and name
//! are part of what they mean. References coerce only from mutable to
//! constant over an equal element type, and functions never coerce.

use crate::stack::ensure_sufficient_stack;
use crate::{Idx, IntrinsicSet, PrimKind, Primitive, TypeData};

use super::Solver;

impl Solver<'_> {
    /// Whether a value of type `src` may be used where `dest` is expected
    /// without explicit conversion.
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn coerce_to(&mut self, src: Idx, dest: Idx) -> bool {
        ensure_sufficient_stack(|| self.coerce_inner(src, dest))
    }

    fn coerce_inner(&mut self, src: Idx, dest: Idx) -> bool {
        if self.pool.equals(src, dest) {
            return true;
        }

        // Bindings may target an instance itself, so interface checks see
        // the source before its generate is substituted.
        let declared_src = self.pool.unwrap_placeholders(src);
        let src = self.pool.inner_type(src);
        let dest = self.pool.inner_type(dest);

        // An unbound source wildcard coerces if any of its constraints does.
        if let TypeData::Wildcard(wc) = self.pool.get(src) {
            let constraints = wc.constraints.clone();
            if constraints.iter().any(|&c| self.coerce_to(c, dest)) {
                return true;
            }
        }

        match self.pool.get(dest) {
            TypeData::Primitive(dp) => {
                let dp = *dp;
                if dp.is_any() {
                    return true;
                }
                match self.pool.get(src) {
                    TypeData::Primitive(sp) => coerce_primitive(*sp, dp),
                    _ => false,
                }
            }
            TypeData::Tuple(dest_elems) => {
                let dest_elems = dest_elems.clone();
                match self.pool.get(src) {
                    TypeData::Tuple(src_elems) if src_elems.len() == dest_elems.len() => {
                        let src_elems = src_elems.clone();
                        src_elems
                            .iter()
                            .zip(&dest_elems)
                            .all(|(&s, &d)| self.coerce_to(s, d))
                    }
                    _ => false,
                }
            }
            TypeData::Vector {
                elem: dest_elem,
                size: dest_size,
            } => {
                let (dest_elem, dest_size) = (*dest_elem, *dest_size);
                match self.pool.get(src) {
                    TypeData::Vector {
                        elem: src_elem,
                        size: src_size,
                    } if *src_size == dest_size => {
                        let src_elem = *src_elem;
                        self.coerce_to(src_elem, dest_elem)
                    }
                    _ => false,
                }
            }
            TypeData::Ref {
                elem: dest_elem,
                constant: dest_const,
            } => match self.pool.get(src) {
                TypeData::Ref {
                    elem: src_elem,
                    constant: src_const,
                } => *dest_const && !*src_const && self.pool.equals(*src_elem, *dest_elem),
                _ => false,
            },
            TypeData::Interface(_) => self.implements_interf(declared_src, dest),
            TypeData::Constraint(ct) => {
                let intrinsic = ct.intrinsic;
                let members = ct.types.clone();
                match intrinsic {
                    Some(set) => self.coerce_to_intrinsic(src, set, &members),
                    None => self.coerce_to_type_set(src, dest, &members),
                }
            }
            TypeData::Wildcard(wc) => {
                // Only unbound wildcards survive `inner_type`.
                let constraints = wc.constraints.clone();
                constraints.iter().any(|&c| self.coerce_to(src, c))
            }
            _ => false,
        }
    }

    /// Membership in a built-in type set.
    fn coerce_to_intrinsic(&mut self, src: Idx, set: IntrinsicSet, members: &[Idx]) -> bool {
        match (set, self.pool.get(src)) {
            (IntrinsicSet::Vector, TypeData::Vector { .. })
            | (IntrinsicSet::Tuple, TypeData::Tuple(_)) => true,
            // Only ever used through its instance, so the single member is
            // the element type parameter.
            (IntrinsicSet::TypedVector, TypeData::Vector { elem, .. }) => members
                .first()
                .is_some_and(|&member| self.pool.equals(*elem, member)),
            (IntrinsicSet::IntegralVector, TypeData::Vector { elem, .. }) => {
                let elem = *elem;
                self.coerce_to(elem, Idx::LONG) || self.coerce_to(elem, Idx::ULONG)
            }
            _ => false,
        }
    }

    /// Coercion into an ordinary type set.
    fn coerce_to_type_set(&mut self, src: Idx, dest: Idx, members: &[Idx]) -> bool {
        // Every type a source set may stand for must fit the destination.
        if let TypeData::Constraint(src_set) = self.pool.get(src) {
            let src_members = src_set.types.clone();
            return src_members.iter().all(|&m| self.coerce_to(m, dest));
        }

        members.iter().any(|&m| self.coerce_to(src, m))
    }
}

/// Widening between primitives of the same kind.
fn coerce_primitive(src: Primitive, dest: Primitive) -> bool {
    match (src.kind, dest.kind) {
        (PrimKind::Floating, PrimKind::Floating) => src.spec < dest.spec,
        // Equal parity means equal signedness.
        (PrimKind::Integral, PrimKind::Integral) => {
            src.spec % 2 == dest.spec % 2 && src.spec < dest.spec
        }
        (PrimKind::Text, PrimKind::Text) => src == Primitive::RUNE && dest == Primitive::STRING,
        _ => false,
    }
}
