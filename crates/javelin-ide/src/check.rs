//! The partial expression checker.
//!
//! Re-derives the type of an expression to the left of the cursor using
//! only a scope and the small expression grammar, when the focused
//! compilation could not reach it. Anything outside the grammar can be
//! plugged in as a *retained* (kind, type) pair computed by the full
//! compiler; see [`cant_check`] for finding the subtree to retain.

use javelin_core::Name;
use javelin_syntax::{ExprKind, PartialExpr};

use crate::semantics::{Element, ElementKind, MethodType, Scope, Semantics, Type};

/// Typechecks expressions in the partial grammar against a scope.
pub struct Check<'a> {
    semantics: &'a dyn Semantics,
    scope: &'a Scope,
    retained: Option<(ExprKind, Type)>,
}

impl<'a> Check<'a> {
    pub fn new(semantics: &'a dyn Semantics, scope: &'a Scope) -> Self {
        Self {
            semantics,
            scope,
            retained: None,
        }
    }

    /// Plugs in a previously computed type for the subtree of `kind` the
    /// grammar cannot check.
    pub fn with_retained_type(mut self, kind: ExprKind, ty: Type) -> Self {
        self.retained = Some((kind, ty));
        self
    }

    /// The type of `expr`, or `None` when the grammar cannot reach one.
    pub fn check(&self, expr: &PartialExpr) -> Option<Type> {
        if !can_check(expr) {
            return match &self.retained {
                Some((kind, ty)) if *kind == expr.kind() => Some(ty.clone()),
                _ => None,
            };
        }
        match expr {
            PartialExpr::Identifier { name, .. } => self.env(name),
            PartialExpr::Select { receiver, name, .. } => {
                let receiver_ty = self.check(receiver)?;
                let type_name = receiver_ty.as_declared()?;
                self.semantics
                    .all_members(type_name)
                    .into_iter()
                    .find(|m| &m.name == name && !m.kind.is_method_like())
                    .map(|m| m.ty)
            }
            PartialExpr::Invoke { select, args, .. } => {
                let mut overloads = self.check_method(select);
                if overloads.len() == 1 {
                    return overloads.pop().map(|m| m.ret);
                }
                let args: Vec<Option<Type>> = args.iter().map(|a| self.check(a)).collect();
                overloads
                    .into_iter()
                    .find(|m| self.is_compatible(m, &args))
                    .map(|m| m.ret)
            }
            PartialExpr::Index { receiver, .. } => match self.check(receiver)? {
                Type::Array(element) => Some(*element),
                _ => None,
            },
            // Deliberately the true branch's type, not a least upper
            // bound; a completion consumer treats this as a hint.
            PartialExpr::Conditional { then, .. } => self.check(then),
            PartialExpr::Paren { inner, .. } => self.check(inner),
            PartialExpr::Opaque { .. } => None,
        }
    }

    /// First non-method binding for `name` in the scope chain, with
    /// `this`/`super` members inlined.
    fn env(&self, name: &Name) -> Option<Type> {
        for frame in self.scope.frames() {
            for element in &frame.locals {
                if &element.name == name && !element.kind.is_method_like() {
                    return Some(element.ty.clone());
                }
                if element.is_this_or_super() {
                    if let Some(found) = self
                        .this_members(element, name)
                        .into_iter()
                        .find(|m| !m.kind.is_method_like())
                    {
                        return Some(found.ty);
                    }
                }
            }
        }
        None
    }

    /// Every method binding for `name` across the scope chain.
    fn env_methods(&self, name: &Name) -> Vec<MethodType> {
        let mut matches = Vec::new();
        for frame in self.scope.frames() {
            for element in &frame.locals {
                if &element.name == name && element.kind.is_method_like() {
                    if let Some(signature) = element.signature() {
                        matches.push(signature.clone());
                    }
                }
                if element.is_this_or_super() {
                    for member in self.this_members(element, name) {
                        if member.kind.is_method_like() {
                            if let Some(signature) = member.signature() {
                                matches.push(signature.clone());
                            }
                        }
                    }
                }
            }
        }
        matches
    }

    fn this_members(&self, this_or_super: &Element, name: &Name) -> Vec<Element> {
        let Some(type_name) = this_or_super.ty.as_declared() else {
            return Vec::new();
        };
        self.semantics
            .all_members(type_name)
            .into_iter()
            .filter(|m| &m.name == name)
            .collect()
    }

    fn check_method(&self, select: &PartialExpr) -> Vec<MethodType> {
        match select {
            PartialExpr::Identifier { name, .. } => self.env_methods(name),
            PartialExpr::Select { receiver, name, .. } => {
                let Some(receiver_ty) = self.check(receiver) else {
                    return Vec::new();
                };
                let Some(type_name) = receiver_ty.as_declared() else {
                    return Vec::new();
                };
                self.semantics
                    .all_members(type_name)
                    .into_iter()
                    .filter(|m| &m.name == name && m.kind == ElementKind::Method)
                    .filter_map(|m| m.signature().cloned())
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn is_compatible(&self, method: &MethodType, args: &[Option<Type>]) -> bool {
        if method.params.len() != args.len() {
            return false;
        }
        method.params.iter().zip(args).all(|(param, arg)| {
            arg.as_ref()
                .is_some_and(|a| self.semantics.is_assignable(a, &param.ty))
        })
    }
}

/// Whether `expr` is inside the supported grammar.
///
/// Invocations are only checkable when their select and every argument
/// are.
pub fn can_check(expr: &PartialExpr) -> bool {
    match expr {
        PartialExpr::Identifier { .. }
        | PartialExpr::Select { .. }
        | PartialExpr::Index { .. }
        | PartialExpr::Conditional { .. }
        | PartialExpr::Paren { .. } => true,
        PartialExpr::Invoke { select, args, .. } => {
            can_check(select) && args.iter().all(can_check)
        }
        PartialExpr::Opaque { .. } => false,
    }
}

/// The deepest subtree [`Check::check`] cannot handle, or `None` when the
/// whole expression is checkable.
///
/// The caller resolves that subtree through the full compiler and feeds
/// the answer back via [`Check::with_retained_type`].
pub fn cant_check(expr: &PartialExpr) -> Option<&PartialExpr> {
    match expr {
        PartialExpr::Identifier { .. } => None,
        PartialExpr::Select { receiver, .. } => cant_check(receiver),
        PartialExpr::Index { receiver, .. } => cant_check(receiver),
        // Only the true branch matters; see `check` on conditionals.
        PartialExpr::Conditional { then, .. } => cant_check(then),
        PartialExpr::Paren { inner, .. } => cant_check(inner),
        PartialExpr::Invoke { select, args, .. } => {
            cant_check(select).or_else(|| args.iter().find_map(cant_check))
        }
        PartialExpr::Opaque { .. } => Some(expr),
    }
}
