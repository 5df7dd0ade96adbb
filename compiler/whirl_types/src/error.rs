//! Structured failures reported by the solver.
//!
//! Errors carry `Idx` handles rather than rendered names; the caller owns the
//! pool and turns them into diagnostics with [`Pool::format_type`].
//!
//! [`Pool::format_type`]: crate::Pool::format_type

use crate::Idx;

/// Why a generic could not be instantiated.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum InstantiationError {
    /// Type parameters were passed to something that is not generic.
    #[error("type parameters passed to non-generic type {found:?}")]
    NotGeneric { found: Idx },

    /// Wrong number of type parameters.
    #[error("expected {expected} type parameter(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// A parameter does not coerce to any constraint of its wildcard.
    #[error("type parameter {index} ({param:?}) does not satisfy its constraints")]
    ConstraintViolation { index: usize, param: Idx },
}

/// Why a binding was refused by a registry.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum BindingError {
    /// The attached type is neither an interface nor a generic interface.
    #[error("binding payload {found:?} is not an interface")]
    NotAnInterface { found: Idx },

    /// A wildcard does not occur in the match type, so no match could ever
    /// determine its value.
    #[error("wildcard {wildcard:?} cannot be determined from the binding's match type")]
    UndeterminedWildcard { wildcard: Idx },

    /// A wildcard in the match type is not one the binding declares, so
    /// matching would bind it outside any scope that releases it.
    #[error("wildcard {wildcard:?} in the match type is not declared by the binding")]
    UndeclaredWildcard { wildcard: Idx },

    /// The generic interface takes a different number of parameters than the
    /// binding declares wildcards.
    #[error("generic interface expects {expected} parameter(s), binding declares {found}")]
    WildcardArity { expected: usize, found: usize },

    /// Another binding on an overlapping type already supplies this method.
    #[error("method `{method}` is already bound for this type")]
    Conflict { method: String },
}

/// A pending instance that became invalid once its generic was known.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingInstanceFailure {
    /// The `OpaqueGenericInstance` that could not be generated.
    pub instance: Idx,
    pub error: InstantiationError,
}

/// Evaluating an opaque generic left some earlier requests unsatisfiable.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{} pending generic instance(s) failed to materialize", .failures.len())]
pub struct EvaluateError {
    pub failures: Vec<PendingInstanceFailure>,
}
