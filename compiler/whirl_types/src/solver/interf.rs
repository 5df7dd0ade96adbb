//! Structural interface satisfaction and interface derivation.

use crate::{BindingScope, Idx, InterfMethod, MethodKind, TypeData};

use super::Solver;

impl Solver<'_> {
    /// Whether `dt` implements `interf`.
    ///
    /// Types never declare the interfaces they implement. Every abstract
    /// method of `interf` must instead be supplied, with an equal signature,
    /// by some interface bound to `dt` in the local or global registry.
    /// Confirmed implementations are recorded on the interface, so asking
    /// again is a lookup.
    ///
    /// A binding whose wildcard is constrained by `interf` asks the same
    /// question again while matching `dt`. That nested check answers `false`
    /// and is not memoized.
    #[tracing::instrument(level = "trace", skip(self), ret)]
    pub fn implements_interf(&mut self, dt: Idx, interf: Idx) -> bool {
        let dt = self.pool.unwrap_placeholders(dt);
        if !self.in_progress.insert((dt, interf)) {
            tracing::trace!("implementation check already running");
            return false;
        }
        let implements = self.check_implementation(dt, interf);
        self.in_progress.remove(&(dt, interf));
        implements
    }

    fn check_implementation(&mut self, dt: Idx, interf: Idx) -> bool {
        if matches!(
            self.pool.get(self.pool.inner_type(dt)),
            TypeData::Interface(_) | TypeData::Ref { .. }
        ) {
            return false;
        }

        let Some(it) = self.pool.interface(interf) else {
            return false;
        };
        if self.pool.contains_type(dt, &it.instances) {
            return true;
        }

        let required: Vec<(String, Idx)> = it
            .methods
            .iter()
            .filter(|(_, m)| m.kind == MethodKind::Abstract)
            .map(|(name, m)| (name.clone(), m.signature))
            .collect();

        let mut bound = self.get_bindings(BindingScope::Local, dt);
        bound.extend(self.get_bindings(BindingScope::Global, dt));

        for (name, signature) in &required {
            let supplied = bound.iter().any(|&b| {
                self.pool
                    .interface(b)
                    .and_then(|bi| bi.methods.get(name))
                    .is_some_and(|m| self.pool.equals(m.signature, *signature))
            });
            if !supplied {
                tracing::trace!(method = %name, "no binding supplies method");
                return false;
            }
        }

        if let Some(it) = self.pool.interface_mut(interf) {
            it.instances.push(dt);
        }
        true
    }

    /// Make `child` formally derive from `parent`.
    ///
    /// Callers check `implements_interf` for the declared relationship first,
    /// so methods present in both are known to share a signature.
    pub fn derive(&mut self, child: Idx, parent: Idx) {
        let Some(parent_methods) = self.pool.interface(parent).map(|it| it.methods.clone()) else {
            return;
        };
        let Some(child_methods) = self.pool.interface(child).map(|it| it.methods.clone()) else {
            return;
        };

        let mut derived = child_methods;
        for (name, method) in parent_methods {
            match derived.get_mut(&name) {
                Some(own) => {
                    own.kind = if method.kind.has_body() {
                        MethodKind::Override
                    } else {
                        MethodKind::Implement
                    };
                    self.merge_specializations(own, &method);
                }
                None if method.kind.has_body() => {
                    derived.insert(name, method);
                }
                // Supplied by a binding, as the satisfaction check established.
                None => {}
            }
        }

        if let Some(it) = self.pool.interface_mut(child) {
            it.methods = derived;
        }
    }

    /// Union of two specialization lists, keeping `own`'s order first.
    fn merge_specializations(&self, own: &mut InterfMethod, inherited: &InterfMethod) {
        for spec in &inherited.specializations {
            let known = own
                .specializations
                .iter()
                .any(|s| self.pool.specializations_match(s, spec));
            if !known {
                own.specializations.push(spec.clone());
            }
        }
    }
}
