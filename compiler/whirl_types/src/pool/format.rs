//! Canonical textual form of types, for diagnostics.
//!
//! The output is never used for equality.

use crate::{Idx, Pool, PrimKind, Primitive, TypeData};

impl Pool {
    /// Format a type as a human-readable string.
    pub fn format_type(&self, idx: Idx) -> String {
        let mut buf = String::new();
        self.format_type_into(idx, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, idx: Idx, buf: &mut String) {
        match self.get(idx) {
            TypeData::Primitive(prim) => format_primitive(*prim, buf),
            TypeData::Tuple(elems) => {
                buf.push('(');
                self.format_list(elems, buf);
                buf.push(')');
            }
            TypeData::Vector { elem, size } => {
                buf.push('[');
                buf.push_str(&size.to_string());
                buf.push(']');
                self.format_type_into(*elem, buf);
            }
            TypeData::Ref { elem, constant } => {
                if *constant {
                    buf.push_str("const ");
                }
                buf.push('&');
                self.format_type_into(*elem, buf);
            }
            TypeData::Function(func) => {
                buf.push_str("func(");
                self.format_list(&func.params, buf);
                buf.push(')');
                if func.ret != Idx::NOTHING {
                    buf.push_str(" -> ");
                    self.format_type_into(func.ret, buf);
                }
            }
            TypeData::Struct(st) => buf.push_str(&st.name),
            TypeData::Interface(it) => buf.push_str(&it.name),
            TypeData::Algebraic(at) => buf.push_str(&at.name),
            TypeData::Constraint(ct) => buf.push_str(&ct.name),
            TypeData::Generic(gt) => {
                self.format_type_into(gt.template, buf);
                buf.push('<');
                self.format_list(&gt.params, buf);
                buf.push('>');
            }
            TypeData::GenericInstance(gi) => self.format_applied(gi.generic, &gi.params, buf),
            TypeData::Wildcard(wc) => match wc.value {
                Some(value) => self.format_type_into(value, buf),
                None => buf.push_str(&wc.name),
            },
            TypeData::Opaque(op) => match op.eval {
                Some(eval) => self.format_type_into(eval, buf),
                None => buf.push_str(&op.name),
            },
            TypeData::OpaqueGeneric(og) => match og.eval {
                Some(eval) => self.format_type_into(eval, buf),
                None => buf.push_str("<opaque generic>"),
            },
            TypeData::OpaqueGenericInstance(oi) => {
                let root = match self.get(oi.opaque) {
                    TypeData::OpaqueGeneric(og) => og.eval,
                    _ => None,
                };
                match (oi.generate, root) {
                    (Some(_), Some(root)) => self.format_applied(root, &oi.params, buf),
                    _ => buf.push_str("<opaque generate>"),
                }
            }
        }
    }

    /// `Template<params>` for an instance of `generic`.
    fn format_applied(&self, generic: Idx, params: &[Idx], buf: &mut String) {
        match self.get(generic) {
            TypeData::Generic(gt) => self.format_type_into(gt.template, buf),
            _ => self.format_type_into(generic, buf),
        }
        buf.push('<');
        self.format_list(params, buf);
        buf.push('>');
    }

    fn format_list(&self, types: &[Idx], buf: &mut String) {
        for (i, &ty) in types.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(ty, buf);
        }
    }
}

fn format_primitive(prim: Primitive, buf: &mut String) {
    match prim.interned().and_then(Idx::name) {
        Some(name) => buf.push_str(name),
        None => {
            let kind = match prim.kind {
                PrimKind::Unit => "unit",
                PrimKind::Boolean => "bool",
                PrimKind::Integral => "integral",
                PrimKind::Floating => "floating",
                PrimKind::Text => "text",
            };
            buf.push_str(&format!("<{kind} {}>", prim.spec));
        }
    }
}
