//! Binding-time type matching.
//!
//! A binding's match type is a pattern: its wildcards bind to whatever part
//! of the candidate type they line up with, provided the candidate satisfies
//! the wildcard's constraints. A wildcard seen twice must match equal types
//! both times (`Pair<T, T>`).
//!
//! Bound values are a side channel that must not outlive one query. All
//! matching goes through [`BoundWildcards`], which clears the wildcards when
//! it is created and restores their earlier values when it is dropped, on
//! every exit path. Outside of any match a wildcard holds no value. Matches
//! nest when a constraint check looks up bindings for the same binding, so
//! the guard restores rather than clears.

use std::ops::{Deref, DerefMut};

use rustc_hash::FxHashSet;

use crate::stack::ensure_sufficient_stack;
use crate::{Idx, TypeData};

use super::Solver;

/// Scoped binding of a set of wildcards.
pub(crate) struct BoundWildcards<'s, 'a> {
    solver: &'s mut Solver<'a>,
    wildcards: Vec<Idx>,
    saved: Vec<Option<Idx>>,
}

impl BoundWildcards<'_, '_> {
    /// Current values of the guarded wildcards, in order.
    pub(crate) fn values(&self) -> Vec<Option<Idx>> {
        self.wildcards
            .iter()
            .map(|&wc| self.solver.pool.wildcard_value(wc))
            .collect()
    }
}

impl<'a> Deref for BoundWildcards<'_, 'a> {
    type Target = Solver<'a>;

    fn deref(&self) -> &Self::Target {
        &*self.solver
    }
}

impl DerefMut for BoundWildcards<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.solver
    }
}

impl Drop for BoundWildcards<'_, '_> {
    fn drop(&mut self) {
        // Reverse order, so a wildcard listed twice ends up with its
        // earliest saved value.
        for (&wc, &value) in self.wildcards.iter().zip(&self.saved).rev() {
            self.solver.pool.set_wildcard_value(wc, value);
        }
    }
}

impl<'a> Solver<'a> {
    /// Start a matching transaction over `wildcards`.
    pub(crate) fn bind_wildcards(&mut self, wildcards: Vec<Idx>) -> BoundWildcards<'_, 'a> {
        let mut saved = Vec::with_capacity(wildcards.len());
        for &wc in &wildcards {
            saved.push(self.pool.wildcard_value(wc));
            self.pool.set_wildcard_value(wc, None);
        }
        BoundWildcards {
            solver: self,
            wildcards,
            saved,
        }
    }

    /// Match `ty` against `pattern`, binding the pattern's free wildcards.
    ///
    /// Callers must hold a [`BoundWildcards`] guard over those wildcards.
    pub(crate) fn match_type(&mut self, pattern: Idx, ty: Idx) -> bool {
        ensure_sufficient_stack(|| self.match_inner(pattern, ty))
    }

    fn match_inner(&mut self, pattern: Idx, ty: Idx) -> bool {
        let ty = self.pool.unwrap_placeholders(ty);
        if pattern == ty {
            return true;
        }

        if let TypeData::Wildcard(wc) = self.pool.get(pattern) {
            if let Some(value) = wc.value {
                return self.pool.equals(value, ty);
            }

            let constraints = wc.constraints.clone();
            let admitted =
                constraints.is_empty() || constraints.iter().any(|&c| self.coerce_to(ty, c));
            if admitted {
                self.pool.set_wildcard_value(pattern, Some(ty));
            }
            return admitted;
        }

        match self.pattern_pairs(pattern, ty) {
            Some(pairs) => pairs.into_iter().all(|(p, t)| self.match_type(p, t)),
            None => self.pool.equals(pattern, ty),
        }
    }

    /// Unbound wildcards that matching against `pattern` would bind, in the
    /// order they are first reached.
    pub(crate) fn pattern_wildcards(&self, pattern: Idx) -> Vec<Idx> {
        let mut found = Vec::new();
        let mut visited = FxHashSet::default();
        let mut stack = vec![pattern];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            match self.pool.get(current) {
                TypeData::Wildcard(wc) if wc.value.is_none() => found.push(current),
                _ => {
                    // Reversed so children are visited left to right.
                    let children = self.pattern_children(current);
                    stack.extend(children.into_iter().rev());
                }
            }
        }
        found
    }

    /// Parts of a pattern that `match_type` descends into.
    fn pattern_children(&self, pattern: Idx) -> Vec<Idx> {
        let pool = &*self.pool;
        if let Some((_, params)) = pool.instance_parts(pattern) {
            return params.into_vec();
        }
        match pool.get(pattern) {
            TypeData::Tuple(elems) => elems.clone(),
            TypeData::Vector { elem, .. } | TypeData::Ref { elem, .. } => vec![*elem],
            TypeData::Function(func) => {
                let mut children = func.params.clone();
                children.push(func.ret);
                children
            }
            _ => Vec::new(),
        }
    }

    /// Corresponding children of two same-shaped types, or `None` when the
    /// shapes do not line up and plain equality must decide.
    fn pattern_pairs(&self, pattern: Idx, ty: Idx) -> Option<Vec<(Idx, Idx)>> {
        let pool = &*self.pool;

        if let (Some((root_p, params_p)), Some((root_t, params_t))) =
            (pool.instance_parts(pattern), pool.instance_parts(ty))
        {
            return (root_p == root_t && params_p.len() == params_t.len())
                .then(|| params_p.into_iter().zip(params_t).collect());
        }

        match (pool.get(pattern), pool.get(ty)) {
            (TypeData::Tuple(p), TypeData::Tuple(t)) if p.len() == t.len() => {
                Some(p.iter().copied().zip(t.iter().copied()).collect())
            }
            (
                TypeData::Vector { elem: ep, size: sp },
                TypeData::Vector { elem: et, size: st },
            ) if sp == st => Some(vec![(*ep, *et)]),
            (
                TypeData::Ref {
                    elem: ep,
                    constant: cp,
                },
                TypeData::Ref {
                    elem: et,
                    constant: ct,
                },
            ) if cp == ct => Some(vec![(*ep, *et)]),
            (TypeData::Function(fp), TypeData::Function(ft))
                if fp.params.len() == ft.params.len() =>
            {
                let mut pairs: Vec<_> = fp
                    .params
                    .iter()
                    .copied()
                    .zip(ft.params.iter().copied())
                    .collect();
                pairs.push((fp.ret, ft.ret));
                Some(pairs)
            }
            _ => None,
        }
    }
}
