//! Generic instantiation.
//!
//! An instance is a `GenericInstance` entry in the pool whose `generate` is
//! the generic's template with every type parameter replaced. Instances are
//! memoized on their generic per distinct parameter list, so asking twice
//! yields the same `Idx`.
//!
//! The instance is registered before its template is substituted. A template
//! that mentions its own generic (`List<T> { next: &List<T> }`) then finds
//! the pending instance instead of recursing forever.
//!
//! Substitution only copies the parts of a template that reach a replaced
//! type parameter; everything else is shared with the template.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::stack::ensure_sufficient_stack;
use crate::{
    AlgebraicType, AlgebraicVariant, ConstraintType, FuncType, GenericInstance, GenericType, Idx,
    InstantiationError, InterfMethod, InterfType, OpaqueGenericInstance, Span, Specialization,
    StructField, StructType, TypeData, TypeParams, WildcardType,
};

use super::Solver;

/// Replacements to apply: type parameters to their arguments, and nodes
/// already copied during this substitution to their copies.
type SubstMap = FxHashMap<Idx, Idx>;

impl Solver<'_> {
    /// Instantiate `generic` with `params`.
    ///
    /// `context` locates the parameters in source text and is only carried
    /// into tracing output.
    ///
    /// # Errors
    /// Fails when `generic` is not a (resolved) generic, when the number of
    /// parameters is wrong, or when a parameter does not coerce to any
    /// constraint of its type parameter.
    #[tracing::instrument(level = "debug", skip(self, params), fields(arity = params.len()), err)]
    pub fn create_generic_instance(
        &mut self,
        generic: Idx,
        params: &[Idx],
        context: Option<Span>,
    ) -> Result<Idx, InstantiationError> {
        let generic = self.resolve_generic(generic);
        let (wildcards, template) = match self.pool.get(generic) {
            TypeData::Generic(gt) => (gt.params.clone(), gt.template),
            _ => return Err(InstantiationError::NotGeneric { found: generic }),
        };

        if wildcards.len() != params.len() {
            return Err(InstantiationError::ArityMismatch {
                expected: wildcards.len(),
                found: params.len(),
            });
        }

        for (index, (&wildcard, &param)) in wildcards.iter().zip(params).enumerate() {
            let constraints = match self.pool.get(wildcard) {
                TypeData::Wildcard(wc) => wc.constraints.clone(),
                _ => Vec::new(),
            };
            if !constraints.is_empty() && !constraints.iter().any(|&c| self.coerce_to(param, c)) {
                return Err(InstantiationError::ConstraintViolation { index, param });
            }
        }

        if let Some(existing) = self.find_instance(generic, params) {
            return Ok(existing);
        }

        let instance = self.pool.alloc(TypeData::GenericInstance(GenericInstance {
            generic,
            params: TypeParams::from_slice(params),
            generate: None,
        }));
        if let TypeData::Generic(gt) = self.pool.get_mut(generic) {
            gt.instances.push(instance);
        }

        let mut map: SubstMap = wildcards.iter().copied().zip(params.iter().copied()).collect();
        match self.substitute(template, &mut map) {
            Ok(generate) => {
                if let TypeData::GenericInstance(gi) = self.pool.get_mut(instance) {
                    gi.generate = Some(generate);
                }
                Ok(instance)
            }
            Err(error) => {
                // A half-built instance must not be found by later requests.
                if let TypeData::Generic(gt) = self.pool.get_mut(generic) {
                    gt.instances.retain(|&i| i != instance);
                }
                tracing::debug!(?generic, %error, "template substitution failed");
                Err(error)
            }
        }
    }

    /// Request an instance of a generic or of an opaque generic.
    ///
    /// While an opaque generic is unresolved its instances cannot be checked
    /// or generated. The request is recorded as a pending
    /// `OpaqueGenericInstance` (memoized like ordinary instances) and is
    /// generated when the opaque generic is evaluated.
    ///
    /// # Errors
    /// As [`Solver::create_generic_instance`] once the generic is known.
    pub fn request_instance(
        &mut self,
        target: Idx,
        params: &[Idx],
        context: Option<Span>,
    ) -> Result<Idx, InstantiationError> {
        let target = self.pool.unwrap_placeholders(target);
        let pending = match self.pool.get(target) {
            TypeData::OpaqueGeneric(og) if og.eval.is_none() => og.instances.clone(),
            _ => return self.create_generic_instance(target, params, context),
        };

        for candidate in pending {
            if let TypeData::OpaqueGenericInstance(oi) = self.pool.get(candidate) {
                if self.pool.types_equal(&oi.params, params) {
                    return Ok(candidate);
                }
            }
        }

        let instance = self
            .pool
            .alloc(TypeData::OpaqueGenericInstance(OpaqueGenericInstance {
                opaque: target,
                params: TypeParams::from_slice(params),
                generate: None,
                context,
            }));
        if let TypeData::OpaqueGeneric(og) = self.pool.get_mut(target) {
            og.instances.push(instance);
        }
        tracing::trace!(?target, ?instance, "recorded pending instance");
        Ok(instance)
    }

    /// Look through placeholders and evaluated opaque generics.
    fn resolve_generic(&self, generic: Idx) -> Idx {
        let generic = self.pool.unwrap_placeholders(generic);
        match self.pool.get(generic) {
            TypeData::OpaqueGeneric(og) => og.eval.unwrap_or(generic),
            _ => generic,
        }
    }

    fn find_instance(&self, generic: Idx, params: &[Idx]) -> Option<Idx> {
        let TypeData::Generic(gt) = self.pool.get(generic) else {
            return None;
        };
        gt.instances.iter().copied().find(|&instance| {
            matches!(
                self.pool.get(instance),
                TypeData::GenericInstance(gi) if self.pool.types_equal(&gi.params, params)
            )
        })
    }

    // === Substitution ===

    fn substitute(&mut self, ty: Idx, map: &mut SubstMap) -> Result<Idx, InstantiationError> {
        ensure_sufficient_stack(|| self.substitute_inner(ty, map))
    }

    fn substitute_all(
        &mut self,
        types: &[Idx],
        map: &mut SubstMap,
    ) -> Result<Vec<Idx>, InstantiationError> {
        types.iter().map(|&t| self.substitute(t, map)).collect()
    }

    fn substitute_inner(&mut self, ty: Idx, map: &mut SubstMap) -> Result<Idx, InstantiationError> {
        if let Some(&replacement) = map.get(&ty) {
            return Ok(replacement);
        }
        if !self.mentions(ty, map) {
            return Ok(ty);
        }

        let data = self.pool.get(ty).clone();
        match data {
            TypeData::Opaque(op) => match op.eval {
                Some(eval) => self.substitute(eval, map),
                None => Ok(ty),
            },
            TypeData::OpaqueGeneric(og) => match og.eval {
                Some(eval) => self.substitute(eval, map),
                None => {
                    tracing::error!(opaque = %og.name, "unresolved opaque generic reached substitution");
                    panic!(
                        "internal compiler error: cannot copy unresolved opaque generic `{}`",
                        og.name
                    );
                }
            },
            TypeData::GenericInstance(gi) => {
                let params = self.substitute_all(&gi.params, map)?;
                self.create_generic_instance(gi.generic, &params, None)
            }
            TypeData::OpaqueGenericInstance(oi) => {
                let params = self.substitute_all(&oi.params, map)?;
                self.request_instance(oi.opaque, &params, oi.context)
            }
            data => {
                // Reserve the copy first so cycles through it resolve to it.
                let copy = self.pool.alloc(data.clone());
                map.insert(ty, copy);
                let rebuilt = self.rebuild(data, map)?;
                self.pool.replace(copy, rebuilt);
                Ok(copy)
            }
        }
    }

    /// Substitute the children of a compound type.
    fn rebuild(&mut self, data: TypeData, map: &mut SubstMap) -> Result<TypeData, InstantiationError> {
        Ok(match data {
            TypeData::Tuple(elems) => TypeData::Tuple(self.substitute_all(&elems, map)?),
            TypeData::Vector { elem, size } => TypeData::Vector {
                elem: self.substitute(elem, map)?,
                size,
            },
            TypeData::Ref { elem, constant } => TypeData::Ref {
                elem: self.substitute(elem, map)?,
                constant,
            },
            TypeData::Function(func) => TypeData::Function(FuncType {
                params: self.substitute_all(&func.params, map)?,
                ret: self.substitute(func.ret, map)?,
            }),
            TypeData::Struct(st) => {
                let mut fields = Vec::with_capacity(st.fields.len());
                for field in st.fields {
                    fields.push(StructField {
                        ty: self.substitute(field.ty, map)?,
                        ..field
                    });
                }
                let inherit = match st.inherit {
                    Some(parent) => Some(self.substitute(parent, map)?),
                    None => None,
                };
                TypeData::Struct(StructType {
                    fields,
                    inherit,
                    ..st
                })
            }
            TypeData::Interface(it) => {
                let mut methods = std::collections::BTreeMap::new();
                for (name, method) in it.methods {
                    let mut specializations = Vec::with_capacity(method.specializations.len());
                    for spec in method.specializations {
                        specializations.push(Specialization {
                            matching_types: self.substitute_all(&spec.matching_types, map)?,
                        });
                    }
                    let signature = self.substitute(method.signature, map)?;
                    methods.insert(
                        name,
                        InterfMethod {
                            signature,
                            kind: method.kind,
                            specializations,
                        },
                    );
                }
                // Implementations of the template say nothing about the copy.
                TypeData::Interface(InterfType {
                    name: it.name,
                    methods,
                    instances: Vec::new(),
                })
            }
            TypeData::Algebraic(at) => {
                let mut variants = Vec::with_capacity(at.variants.len());
                for variant in at.variants {
                    variants.push(AlgebraicVariant {
                        values: self.substitute_all(&variant.values, map)?,
                        name: variant.name,
                    });
                }
                TypeData::Algebraic(AlgebraicType { variants, ..at })
            }
            TypeData::Constraint(ct) => TypeData::Constraint(ConstraintType {
                types: self.substitute_all(&ct.types, map)?,
                ..ct
            }),
            TypeData::Generic(gt) => TypeData::Generic(GenericType {
                template: self.substitute(gt.template, map)?,
                params: gt.params,
                instances: Vec::new(),
            }),
            TypeData::Wildcard(wc) => TypeData::Wildcard(WildcardType {
                constraints: self.substitute_all(&wc.constraints, map)?,
                value: None,
                name: wc.name,
            }),
            other => other,
        })
    }

    /// Whether `ty` reaches any type being replaced.
    fn mentions(&self, ty: Idx, map: &SubstMap) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![ty];
        while let Some(current) = stack.pop() {
            if map.contains_key(&current) {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            match self.pool.get(current) {
                // Copying one is an internal error, so it must be reached.
                TypeData::OpaqueGeneric(og) if og.eval.is_none() => return true,
                data => push_children(data, &mut stack),
            }
        }
        false
    }
}

/// Direct children of a type, as substitution sees them.
pub(super) fn push_children(data: &TypeData, out: &mut Vec<Idx>) {
    match data {
        TypeData::Primitive(_) => {}
        TypeData::Tuple(elems) => out.extend_from_slice(elems),
        TypeData::Vector { elem, .. } | TypeData::Ref { elem, .. } => out.push(*elem),
        TypeData::Function(func) => {
            out.extend_from_slice(&func.params);
            out.push(func.ret);
        }
        TypeData::Struct(st) => {
            out.extend(st.fields.iter().map(|f| f.ty));
            out.extend(st.inherit);
        }
        TypeData::Interface(it) => {
            for method in it.methods.values() {
                out.push(method.signature);
                for spec in &method.specializations {
                    out.extend_from_slice(&spec.matching_types);
                }
            }
        }
        TypeData::Algebraic(at) => {
            for variant in &at.variants {
                out.extend_from_slice(&variant.values);
            }
        }
        TypeData::Constraint(ct) => out.extend_from_slice(&ct.types),
        TypeData::Generic(gt) => out.push(gt.template),
        TypeData::GenericInstance(gi) => out.extend_from_slice(&gi.params),
        TypeData::Wildcard(wc) => out.extend_from_slice(&wc.constraints),
        TypeData::Opaque(op) => out.extend(op.eval),
        TypeData::OpaqueGeneric(og) => out.extend(og.eval),
        TypeData::OpaqueGenericInstance(oi) => out.extend_from_slice(&oi.params),
    }
}
