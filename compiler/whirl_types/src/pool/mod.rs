//! Type pool: storage for every type of a compilation.
//!
//! The pool is an append-only arena of [`TypeData`] addressed by [`Idx`].
//! Primitives are pre-allocated at the fixed indices named on `Idx`.
//! Constructed types are never deduplicated: nominal types, interfaces and
//! placeholders carry identity and mutable cells, so each constructor call
//! yields a fresh entry.
//!
//! # Placeholder unwrapping
//!
//! Three kinds of entry stand in for another type once resolved: a bound
//! wildcard (`value`), an evaluated opaque (`eval`) and a generic instance
//! (`generate`). [`Pool::inner_type`] follows all three, which is what
//! coercion and casting dispatch on. Equality follows only the first two, so
//! that instances of different generics never unify through structurally
//! identical generates.

mod construct;
mod equality;
mod format;

use crate::{Idx, InterfType, Primitive, TypeData, TypeParams};

/// Arena of all types.
#[derive(Clone, Debug)]
pub struct Pool {
    types: Vec<TypeData>,
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

impl Pool {
    /// Create a pool holding only the pre-interned primitives.
    pub fn new() -> Self {
        let mut types = Vec::with_capacity(256);
        types.extend(Primitive::ALL.iter().copied().map(TypeData::Primitive));
        Self { types }
    }

    /// Number of entries, primitives included.
    #[allow(
        clippy::len_without_is_empty,
        reason = "a pool always holds the primitives"
    )]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Shape of a type.
    ///
    /// # Panics
    /// Panics if `idx` was not produced by this pool.
    #[inline]
    pub fn get(&self, idx: Idx) -> &TypeData {
        &self.types[idx.index()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, idx: Idx) -> &mut TypeData {
        &mut self.types[idx.index()]
    }

    pub(crate) fn alloc(&mut self, data: TypeData) -> Idx {
        let raw = u32::try_from(self.types.len())
            .unwrap_or_else(|_| panic!("type pool exceeded u32::MAX entries"));
        self.types.push(data);
        Idx::from_raw(raw)
    }

    /// Overwrite a slot previously handed out by [`Pool::alloc`].
    pub(crate) fn replace(&mut self, idx: Idx, data: TypeData) {
        self.types[idx.index()] = data;
    }

    /// Follow bound wildcards, evaluated opaques and instance generates.
    pub fn inner_type(&self, idx: Idx) -> Idx {
        let mut current = idx;
        loop {
            let next = match self.get(current) {
                TypeData::Wildcard(w) => w.value,
                TypeData::Opaque(o) => o.eval,
                TypeData::GenericInstance(gi) => gi.generate,
                TypeData::OpaqueGenericInstance(oi) => oi.generate,
                _ => None,
            };
            match next {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
    }

    /// Follow bound wildcards and evaluated opaques only.
    pub(crate) fn unwrap_placeholders(&self, idx: Idx) -> Idx {
        let mut current = idx;
        loop {
            let next = match self.get(current) {
                TypeData::Wildcard(w) => w.value,
                TypeData::Opaque(o) => o.eval,
                _ => None,
            };
            match next {
                Some(next) if next != current => current = next,
                _ => return current,
            }
        }
    }

    /// The generated type of a generic instance or opaque generic instance.
    pub fn instance_generate(&self, idx: Idx) -> Option<Idx> {
        match self.get(idx) {
            TypeData::GenericInstance(gi) => gi.generate,
            TypeData::OpaqueGenericInstance(oi) => oi.generate,
            _ => None,
        }
    }

    /// Root generic and parameters of an instance whose generic is known.
    ///
    /// An instance of an opaque generic reports the evaluated generic as its
    /// root, so it unifies with direct instances of that generic.
    pub(crate) fn instance_parts(&self, idx: Idx) -> Option<(Idx, TypeParams)> {
        match self.get(idx) {
            TypeData::GenericInstance(gi) => Some((gi.generic, gi.params.clone())),
            TypeData::OpaqueGenericInstance(oi) => match self.get(oi.opaque) {
                TypeData::OpaqueGeneric(og) => og.eval.map(|root| (root, oi.params.clone())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Bound value of a wildcard.
    pub fn wildcard_value(&self, idx: Idx) -> Option<Idx> {
        match self.get(idx) {
            TypeData::Wildcard(w) => w.value,
            _ => None,
        }
    }

    pub(crate) fn set_wildcard_value(&mut self, idx: Idx, value: Option<Idx>) {
        if let TypeData::Wildcard(w) = self.get_mut(idx) {
            w.value = value;
        }
    }

    /// The interface behind `idx`, looking through placeholders.
    pub fn interface(&self, idx: Idx) -> Option<&InterfType> {
        match self.get(self.inner_type(idx)) {
            TypeData::Interface(it) => Some(it),
            _ => None,
        }
    }

    pub(crate) fn interface_mut(&mut self, idx: Idx) -> Option<&mut InterfType> {
        let idx = self.inner_type(idx);
        match self.get_mut(idx) {
            TypeData::Interface(it) => Some(it),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests;
