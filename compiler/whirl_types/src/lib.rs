//! Type algebra for the Whirlwind compiler.
//!
//! This crate decides what the semantic walker may do with types:
//! - structural equality and display ([`Pool::equals`], [`Pool::format_type`])
//! - implicit and explicit conversion ([`Solver::coerce_to`], [`Solver::cast_to`])
//! - structural interface satisfaction through bindings
//!   ([`Solver::implements_interf`], [`Solver::get_bindings`])
//! - generic instantiation ([`Solver::create_generic_instance`])
//! - in-place resolution of forward references
//!   ([`Solver::evaluate_opaque`], [`Solver::evaluate_opaque_generic`])
//!
//! # Type pool
//!
//! Types are stored in a [`Pool`] and referenced by [`Idx`] handles. Handles
//! are identity: repeated instantiation of a generic with equal parameters
//! returns the same handle. Primitives live at fixed indices (`Idx::INT`).
//!
//! # Solver
//!
//! A [`Solver`] borrows the pool and the local and global
//! [`BindingRegistry`] for one analysis pass. Coercion, casting and interface
//! checks answer `bool`; instantiation, binding admission and opaque
//! evaluation return structured errors.

mod data;
mod error;
mod idx;
mod pool;
mod registry;
mod solver;
mod span;
mod stack;
mod trace;

pub use data::{
    AlgebraicType, AlgebraicVariant, ConstraintType, FuncType, GenericInstance, GenericType,
    InterfMethod, InterfType, IntrinsicSet, MethodKind, OpaqueGenericInstance, OpaqueGenericType,
    OpaqueType, PackageId, PrimKind, Primitive, Specialization, StructField, StructType, TypeData,
    TypeParams, WildcardType,
};
pub use error::{BindingError, EvaluateError, InstantiationError, PendingInstanceFailure};
pub use idx::Idx;
pub use pool::Pool;
pub use registry::{Binding, BindingRegistry, BindingScope};
pub use solver::Solver;
pub use span::Span;
pub use trace::init_tracing;

// `Idx` is stored in every child slot of every type.
#[cfg(target_pointer_width = "64")]
const _: () = assert!(std::mem::size_of::<Idx>() == 4);
