//! Resolution of forward-declared types.
//!
//! The walker hands out an opaque placeholder for a definition that is
//! referenced before it has been analyzed. Every reference taken in the
//! meantime is the placeholder's `Idx`, so writing the evaluated type into the
//! placeholder's slot resolves all of them at once.

use crate::{EvaluateError, Idx, PendingInstanceFailure, TypeData};

use super::Solver;

impl Solver<'_> {
    /// Resolve an opaque type to `ty`.
    ///
    /// # Panics
    /// Evaluating a placeholder twice, or evaluating something that is not an
    /// opaque type, is an internal compiler error.
    pub fn evaluate_opaque(&mut self, opaque: Idx, ty: Idx) {
        match self.pool.get_mut(opaque) {
            TypeData::Opaque(op) if op.eval.is_none() => op.eval = Some(ty),
            TypeData::Opaque(op) => {
                tracing::error!(opaque = %op.name, "opaque type evaluated twice");
                panic!("internal compiler error: opaque type `{}` evaluated twice", op.name);
            }
            other => {
                tracing::error!(shape = other.shape(), "evaluate_opaque on a non-opaque type");
                panic!("internal compiler error: {opaque:?} is not an opaque type");
            }
        }
    }

    /// Resolve an opaque generic to `generic` and generate every instance
    /// that was requested while it was unresolved.
    ///
    /// Every pending instance is attempted, even after a failure.
    ///
    /// # Errors
    /// Returns the pending instances that no longer type-check against the
    /// real generic. Code that used them was analyzed assuming they would,
    /// so each is a definition error.
    ///
    /// # Panics
    /// As [`Solver::evaluate_opaque`].
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn evaluate_opaque_generic(&mut self, opaque: Idx, generic: Idx) -> Result<(), EvaluateError> {
        let pending = match self.pool.get_mut(opaque) {
            TypeData::OpaqueGeneric(og) if og.eval.is_none() => {
                og.eval = Some(generic);
                og.instances.clone()
            }
            TypeData::OpaqueGeneric(og) => {
                tracing::error!(opaque = %og.name, "opaque generic evaluated twice");
                panic!("internal compiler error: opaque generic `{}` evaluated twice", og.name);
            }
            other => {
                tracing::error!(shape = other.shape(), "evaluate_opaque_generic on a non-opaque type");
                panic!("internal compiler error: {opaque:?} is not an opaque generic");
            }
        };

        let mut failures = Vec::new();
        for instance in pending {
            let (params, context) = match self.pool.get(instance) {
                TypeData::OpaqueGenericInstance(oi) => (oi.params.clone(), oi.context),
                _ => continue,
            };

            match self.create_generic_instance(generic, &params, context) {
                Ok(generated) => {
                    if let TypeData::OpaqueGenericInstance(oi) = self.pool.get_mut(instance) {
                        oi.generate = Some(generated);
                    }
                }
                Err(error) => {
                    tracing::debug!(?instance, %error, "pending instance failed to materialize");
                    failures.push(PendingInstanceFailure { instance, error });
                }
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(EvaluateError { failures })
        }
    }
}
