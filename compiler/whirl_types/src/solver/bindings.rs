//! Binding lookup, conflict detection and admission.

use rustc_hash::FxHashSet;

use crate::{Binding, BindingError, BindingScope, Idx, InterfType, TypeData};

use super::generic::push_children;
use super::Solver;

impl Solver<'_> {
    /// Interfaces bound to `dt` in one registry, in registration order.
    ///
    /// Generic bindings are matched by binding their wildcards to the
    /// corresponding parts of `dt`; the generic interface is then
    /// instantiated with those values.
    ///
    /// # Panics
    /// A generic binding that matches without determining all of its
    /// wildcards is an internal compiler error. `add_binding` refuses such
    /// bindings.
    pub fn get_bindings(&mut self, scope: BindingScope, dt: Idx) -> Vec<Idx> {
        let bindings = self.registry(scope).bindings().to_vec();
        let mut found = Vec::new();

        for binding in bindings {
            let values = {
                let mut guard = self.bind_wildcards(binding.wildcards.clone());
                if !guard.match_type(binding.match_type, dt) {
                    continue;
                }
                guard.values()
            };

            match self.pool.get(binding.interf) {
                TypeData::Generic(_) => {}
                TypeData::Interface(_) => {
                    found.push(binding.interf);
                    continue;
                }
                _ => continue,
            }

            let Some(params) = values.into_iter().collect::<Option<Vec<_>>>() else {
                tracing::error!(
                    match_type = %self.pool.format_type(binding.match_type),
                    "generic binding matched with undetermined wildcards"
                );
                panic!("internal compiler error: generic binding matched with unbound wildcards");
            };

            match self.create_generic_instance(binding.interf, &params, None) {
                Ok(instance) => found.push(instance),
                Err(error) => {
                    tracing::debug!(%error, "bound generic interface rejected its parameters");
                }
            }
        }

        found
    }

    /// The first method name that `binding` would supply a second time for
    /// some type already covered by a binding in `scope`.
    ///
    /// Two bindings overlap when either match type matches the other. A
    /// method bound twice is a conflict even when both signatures agree.
    pub fn check_binding_conflicts(&mut self, scope: BindingScope, binding: &Binding) -> Option<String> {
        let existing = self.registry(scope).bindings().to_vec();

        for other in existing {
            let mut wildcards = other.wildcards.clone();
            wildcards.extend_from_slice(&binding.wildcards);

            let forward = self
                .bind_wildcards(wildcards.clone())
                .match_type(other.match_type, binding.match_type);
            let overlaps = forward
                || self
                    .bind_wildcards(wildcards)
                    .match_type(binding.match_type, other.match_type);
            if !overlaps {
                continue;
            }

            let (Some(ours), Some(theirs)) = (
                self.bound_interface(binding.interf),
                self.bound_interface(other.interf),
            ) else {
                continue;
            };
            if let Some(name) = ours.methods.keys().find(|name| theirs.methods.contains_key(*name)) {
                tracing::debug!(method = %name, "binding conflict");
                return Some(name.clone());
            }
        }

        None
    }

    /// Validate a binding and add it to a registry.
    ///
    /// # Errors
    /// Refuses bindings whose payload is not an interface or generic
    /// interface, whose match type contains wildcards they do not declare,
    /// whose wildcards are not all determined by the match type,
    /// whose wildcard count differs from the generic interface's parameter
    /// count, and bindings conflicting with one already in `scope`.
    pub fn add_binding(&mut self, scope: BindingScope, binding: Binding) -> Result<(), BindingError> {
        match self.pool.get(binding.interf) {
            TypeData::Interface(_) => {}
            TypeData::Generic(gt) if self.pool.interface(gt.template).is_some() => {
                if gt.params.len() != binding.wildcards.len() {
                    return Err(BindingError::WildcardArity {
                        expected: gt.params.len(),
                        found: binding.wildcards.len(),
                    });
                }
            }
            _ => {
                return Err(BindingError::NotAnInterface {
                    found: binding.interf,
                });
            }
        }

        if let Some(wildcard) = self
            .pattern_wildcards(binding.match_type)
            .into_iter()
            .find(|wc| !binding.wildcards.contains(wc))
        {
            return Err(BindingError::UndeclaredWildcard { wildcard });
        }

        if let Some(&wildcard) = binding
            .wildcards
            .iter()
            .find(|&&wc| !self.occurs_in(wc, binding.match_type))
        {
            return Err(BindingError::UndeterminedWildcard { wildcard });
        }

        if let Some(method) = self.check_binding_conflicts(scope, &binding) {
            return Err(BindingError::Conflict { method });
        }

        self.registry_mut(scope).push(binding);
        Ok(())
    }

    /// The interface a binding supplies: the interface itself, or the
    /// template of a generic interface.
    fn bound_interface(&self, interf: Idx) -> Option<&InterfType> {
        match self.pool.get(interf) {
            TypeData::Generic(gt) => self.pool.interface(gt.template),
            _ => self.pool.interface(interf),
        }
    }

    /// Whether `wildcard` appears anywhere inside `ty`.
    fn occurs_in(&self, wildcard: Idx, ty: Idx) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![ty];
        while let Some(current) = stack.pop() {
            if current == wildcard {
                return true;
            }
            if visited.insert(current) {
                push_children(self.pool.get(current), &mut stack);
            }
        }
        false
    }
}
