//! The solver: coercion, casting, interface satisfaction, generic
//! instantiation and opaque resolution.
//!
//! # Design
//!
//! The solver borrows the pool and both binding registries for the length of
//! one analysis pass. All mutable state it touches (interface memos, wildcard
//! values, opaque cells, instance memos) lives in those borrows. The solver
//! itself only tracks which interface checks are currently running, so a
//! check re-entered through a constrained binding wildcard answers `false`
//! instead of recursing.
//!
//! Operations answer with `bool` when the only outcome is "legal or not"
//! (`coerce_to`, `cast_to`, `implements_interf`) and with a `Result` when the
//! caller needs to know what went wrong (`create_generic_instance`,
//! `add_binding`, `evaluate_opaque_generic`).
//!
//! # Usage
//!
//! ```ignore
//! let mut pool = Pool::new();
//! let (mut local, mut global) = (BindingRegistry::new(), BindingRegistry::new());
//! let mut solver = Solver::new(&mut pool, &mut local, &mut global);
//!
//! assert!(solver.coerce_to(Idx::RUNE, Idx::STRING));
//! assert!(!solver.coerce_to(Idx::STRING, Idx::RUNE));
//! ```

mod bindings;
mod cast;
mod coerce;
mod generic;
mod interf;
mod matching;
mod opaque;

use rustc_hash::FxHashSet;

use crate::{BindingRegistry, BindingScope, Idx, Pool};

/// Type solver for one analysis pass.
pub struct Solver<'a> {
    pool: &'a mut Pool,
    local: &'a mut BindingRegistry,
    global: &'a mut BindingRegistry,
    /// `(type, interface)` pairs whose implementation check is running.
    in_progress: FxHashSet<(Idx, Idx)>,
}

impl<'a> Solver<'a> {
    /// Create a solver over a pool and the current unit's local and
    /// package-global binding registries.
    pub fn new(
        pool: &'a mut Pool,
        local: &'a mut BindingRegistry,
        global: &'a mut BindingRegistry,
    ) -> Self {
        Self {
            pool,
            local,
            global,
            in_progress: FxHashSet::default(),
        }
    }

    /// Read-only access to the pool.
    #[inline]
    pub fn pool(&self) -> &Pool {
        &*self.pool
    }

    /// Mutable access to the pool, for constructing types.
    #[inline]
    pub fn pool_mut(&mut self) -> &mut Pool {
        &mut *self.pool
    }

    /// The registry for a scope.
    pub fn registry(&self, scope: BindingScope) -> &BindingRegistry {
        match scope {
            BindingScope::Local => &*self.local,
            BindingScope::Global => &*self.global,
        }
    }

    fn registry_mut(&mut self, scope: BindingScope) -> &mut BindingRegistry {
        match scope {
            BindingScope::Local => &mut *self.local,
            BindingScope::Global => &mut *self.global,
        }
    }
}
