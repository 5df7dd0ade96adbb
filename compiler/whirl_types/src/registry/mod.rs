//! Registries of interface bindings.
//!
//! A binding attaches an interface to every type matching its match type,
//! without the type declaring anything. Registries exist at two lifetimes:
//! one per compilation unit (local) and one per package (global).
//!
//! # Design
//!
//! - Bindings are kept in registration order; lookups return matches in that
//!   order, local registry first.
//! - A registry only stores bindings. Matching them against a type needs the
//!   pool and mutates wildcard values, so it lives on the solver.
//! - Bindings are admitted through `Solver::add_binding`, which checks that
//!   every wildcard of a generic binding is determined by any successful
//!   match.

use crate::Idx;

/// Which registry a binding lives in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BindingScope {
    /// The current compilation unit; cleared between units.
    Local,
    /// The current package.
    Global,
}

/// An interface attached to the types matching `match_type`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    /// Pattern the bound type must match. May mention `wildcards`.
    pub match_type: Idx,

    /// Wildcards of a generic binding, in the order the generic interface
    /// takes its parameters.
    pub wildcards: Vec<Idx>,

    /// An interface, or a generic whose template is an interface.
    pub interf: Idx,

    /// Visible to packages importing this one.
    pub exported: bool,
}

impl Binding {
    /// A non-generic binding.
    pub fn new(match_type: Idx, interf: Idx) -> Self {
        Self {
            match_type,
            wildcards: Vec::new(),
            interf,
            exported: false,
        }
    }

    /// A generic binding: `interf` is a generic interface instantiated with
    /// the values `wildcards` take when `match_type` matches.
    pub fn generic(match_type: Idx, wildcards: Vec<Idx>, interf: Idx) -> Self {
        Self {
            match_type,
            wildcards,
            interf,
            exported: false,
        }
    }

    #[must_use]
    pub fn with_exported(mut self, exported: bool) -> Self {
        self.exported = exported;
        self
    }

    /// Copy of this binding as seen by an importing package: same
    /// attachment, no longer exported from there.
    #[must_use]
    pub fn private_copy(&self) -> Self {
        Self {
            exported: false,
            ..self.clone()
        }
    }

    #[inline]
    pub fn is_generic(&self) -> bool {
        !self.wildcards.is_empty()
    }
}

/// Ordered list of bindings at one scope.
#[derive(Clone, Debug, Default)]
pub struct BindingRegistry {
    bindings: Vec<Binding>,
}

impl BindingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Drop every binding, as at the end of a compilation unit.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Append without validation. Use `Solver::add_binding` for bindings
    /// coming from source.
    pub(crate) fn push(&mut self, binding: Binding) {
        self.bindings.push(binding);
    }

    /// Import the exported bindings of another package as private ones.
    ///
    /// Returns the number of bindings imported.
    pub fn import_exported(&mut self, other: &BindingRegistry) -> usize {
        let before = self.bindings.len();
        self.bindings.extend(
            other
                .bindings
                .iter()
                .filter(|b| b.exported)
                .map(Binding::private_copy),
        );
        self.bindings.len() - before
    }
}

#[cfg(test)]
mod tests;
