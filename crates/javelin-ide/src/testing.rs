//! In-memory facade implementations for tests.
//!
//! `FixtureSemantics` answers semantic queries from declaratively built
//! types, with a tiny built-in slice of the JDK so tests never need a
//! real compiler or a system JDK. `FixtureFacade` adds canned sessions on
//! top, for exercising the query orchestration end to end.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use javelin_core::Name;
use javelin_syntax::PartialExpr;

use crate::semantics::{
    BatchSession, CompilerFacade, Diagnostic, Element, ElementKind, FacadeError, FocusSession,
    MethodType, Modifiers, Param, Primitive, Scope, Semantics, Type, TypeName,
};

/// One declared type in the fixture world.
#[derive(Debug, Clone)]
pub struct TypeFixture {
    pub name: TypeName,
    pub kind: ElementKind,
    pub modifiers: Modifiers,
    pub supers: Vec<TypeName>,
    pub members: Vec<Element>,
}

/// A `Semantics` implementation over hand-built types.
#[derive(Debug, Default)]
pub struct FixtureSemantics {
    types: HashMap<String, TypeFixture>,
}

impl FixtureSemantics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fixture world preloaded with `java.lang.Object` and
    /// `java.lang.String`.
    pub fn with_jdk() -> Self {
        let mut this = Self::new();
        let object = TypeName::new("java.lang.Object");
        this.add_fixture(TypeFixture {
            name: object.clone(),
            kind: ElementKind::Class,
            modifiers: Modifiers::PUBLIC,
            supers: Vec::new(),
            members: vec![
                Element::method(
                    "equals",
                    MethodType {
                        params: vec![Param::new("other", Type::Declared(object.clone()))],
                        ret: Type::Primitive(Primitive::Boolean),
                    },
                    object.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "hashCode",
                    MethodType {
                        params: vec![],
                        ret: Type::Primitive(Primitive::Int),
                    },
                    object.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "toString",
                    MethodType {
                        params: vec![],
                        ret: Type::declared("java.lang.String"),
                    },
                    object.clone(),
                    Modifiers::PUBLIC,
                ),
            ],
        });

        let string = TypeName::new("java.lang.String");
        this.add_fixture(TypeFixture {
            name: string.clone(),
            kind: ElementKind::Class,
            modifiers: Modifiers::PUBLIC,
            supers: vec![object],
            members: vec![
                Element::method(
                    "length",
                    MethodType {
                        params: vec![],
                        ret: Type::Primitive(Primitive::Int),
                    },
                    string.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "isEmpty",
                    MethodType {
                        params: vec![],
                        ret: Type::Primitive(Primitive::Boolean),
                    },
                    string.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "charAt",
                    MethodType {
                        params: vec![Param::new("index", Type::Primitive(Primitive::Int))],
                        ret: Type::Primitive(Primitive::Char),
                    },
                    string.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "substring",
                    MethodType {
                        params: vec![Param::new("begin", Type::Primitive(Primitive::Int))],
                        ret: Type::Declared(string.clone()),
                    },
                    string.clone(),
                    Modifiers::PUBLIC,
                ),
                Element::method(
                    "valueOf",
                    MethodType {
                        params: vec![Param::new("value", Type::Primitive(Primitive::Int))],
                        ret: Type::Declared(string.clone()),
                    },
                    string.clone(),
                    Modifiers::PUBLIC_STATIC,
                ),
            ],
        });
        this
    }

    pub fn add_fixture(&mut self, fixture: TypeFixture) {
        self.types.insert(fixture.name.as_str().to_owned(), fixture);
    }

    /// Adds a public class extending `java.lang.Object`.
    pub fn add_class(&mut self, qualified: &str, members: Vec<Element>) {
        self.add_fixture(TypeFixture {
            name: TypeName::new(qualified),
            kind: ElementKind::Class,
            modifiers: Modifiers::PUBLIC,
            supers: vec![TypeName::new("java.lang.Object")],
            members,
        });
    }

    /// Adds a public class with an explicit superclass.
    pub fn add_class_extending(
        &mut self,
        qualified: &str,
        superclass: &str,
        members: Vec<Element>,
    ) {
        self.add_fixture(TypeFixture {
            name: TypeName::new(qualified),
            kind: ElementKind::Class,
            modifiers: Modifiers::PUBLIC,
            supers: vec![TypeName::new(superclass)],
            members,
        });
    }

    /// Adds a public enum with the given constants.
    pub fn add_enum(&mut self, qualified: &str, constants: &[&str]) {
        let name = TypeName::new(qualified);
        let members = constants
            .iter()
            .map(|c| Element {
                name: Name::new(*c),
                kind: ElementKind::EnumConstant,
                modifiers: Modifiers::PUBLIC_STATIC,
                ty: Type::Declared(name.clone()),
                owner: Some(name.clone()),
            })
            .collect();
        self.add_fixture(TypeFixture {
            name,
            kind: ElementKind::Enum,
            modifiers: Modifiers::PUBLIC,
            supers: vec![TypeName::new("java.lang.Object")],
            members,
        });
    }

    fn supers_of(&self, name: &TypeName) -> Vec<TypeName> {
        match self.types.get(name.as_str()) {
            Some(fixture) if !fixture.supers.is_empty() => fixture.supers.clone(),
            Some(_) if name.as_str() != "java.lang.Object" => {
                vec![TypeName::new("java.lang.Object")]
            }
            _ => Vec::new(),
        }
    }

    fn is_subtype(&self, sub: &TypeName, sup: &TypeName) -> bool {
        if sub == sup {
            return true;
        }
        self.supers_of(sub)
            .iter()
            .any(|parent| self.is_subtype(parent, sup))
    }
}

fn numeric_rank(p: Primitive) -> Option<u8> {
    match p {
        Primitive::Byte => Some(0),
        Primitive::Short | Primitive::Char => Some(1),
        Primitive::Int => Some(2),
        Primitive::Long => Some(3),
        Primitive::Float => Some(4),
        Primitive::Double => Some(5),
        Primitive::Boolean | Primitive::Void => None,
    }
}

impl Semantics for FixtureSemantics {
    fn all_members(&self, ty: &TypeName) -> Vec<Element> {
        let mut result: Vec<Element> = Vec::new();
        let mut pending = vec![ty.clone()];
        while let Some(current) = pending.pop() {
            if let Some(fixture) = self.types.get(current.as_str()) {
                for member in &fixture.members {
                    let form = member.string_form();
                    if result.iter().all(|m| m.string_form() != form) {
                        result.push(member.clone());
                    }
                }
            }
            pending.extend(self.supers_of(&current));
        }
        result
    }

    fn enclosed_elements(&self, ty: &TypeName) -> Vec<Element> {
        self.types
            .get(ty.as_str())
            .map(|fixture| fixture.members.clone())
            .unwrap_or_default()
    }

    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Declared(name) => self
                .supers_of(name)
                .into_iter()
                .map(Type::Declared)
                .collect(),
            Type::Array(_) => vec![Type::declared("java.lang.Object")],
            _ => Vec::new(),
        }
    }

    fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        if from == to {
            return true;
        }
        match (from, to) {
            (Type::Primitive(a), Type::Primitive(b)) => match (numeric_rank(*a), numeric_rank(*b))
            {
                (Some(ra), Some(rb)) => ra <= rb,
                _ => false,
            },
            (Type::Declared(a), Type::Declared(b)) => self.is_subtype(a, b),
            (Type::Array(_), Type::Declared(b)) => b.as_str() == "java.lang.Object",
            _ => false,
        }
    }

    fn is_accessible(&self, scope: &Scope, element: &Element, owner: Option<&TypeName>) -> bool {
        let from = scope.this_type();
        if element.modifiers.is_private {
            return match (from, &element.owner) {
                (Some(this), Some(declaring)) => this == declaring,
                _ => false,
            };
        }
        if element.modifiers.is_public {
            return true;
        }
        // Protected and package-private: same package, or (protected only)
        // a subtype of the declaring type.
        let declaring = element.owner.as_ref().or(owner);
        match (from, declaring) {
            (Some(this), Some(declaring)) => {
                let same_package = javelin_core::most_name(this.as_str())
                    == javelin_core::most_name(declaring.as_str());
                if same_package {
                    return true;
                }
                element.modifiers.is_protected && self.is_subtype(this, declaring)
            }
            _ => false,
        }
    }

    fn type_element(&self, qualified: &str) -> Option<Element> {
        self.types.get(qualified).map(|fixture| Element {
            name: Name::new(fixture.name.simple_name()),
            kind: fixture.kind,
            modifiers: fixture.modifiers,
            ty: Type::Declared(fixture.name.clone()),
            owner: None,
        })
    }

    fn type_of_expression(&self, expr: &PartialExpr) -> Option<Type> {
        match expr {
            PartialExpr::Opaque { description, .. } => match *description {
                "string literal" => Some(Type::declared("java.lang.String")),
                "number literal" => Some(Type::Primitive(Primitive::Int)),
                "char literal" => Some(Type::Primitive(Primitive::Char)),
                _ => None,
            },
            _ => None,
        }
    }
}

/// A canned `CompilerFacade`: fixture semantics plus a fixed scope and
/// session answers, for orchestration tests.
#[derive(Debug, Default)]
pub struct FixtureFacade {
    pub semantics: FixtureSemantics,
    pub scope: Scope,
    pub overloads: Vec<Element>,
    pub diagnostics: Vec<Diagnostic>,
    pub unresolved: Vec<Name>,
}

impl Semantics for FixtureFacade {
    fn all_members(&self, ty: &TypeName) -> Vec<Element> {
        self.semantics.all_members(ty)
    }

    fn enclosed_elements(&self, ty: &TypeName) -> Vec<Element> {
        self.semantics.enclosed_elements(ty)
    }

    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        self.semantics.direct_supertypes(ty)
    }

    fn is_assignable(&self, from: &Type, to: &Type) -> bool {
        self.semantics.is_assignable(from, to)
    }

    fn is_accessible(&self, scope: &Scope, element: &Element, owner: Option<&TypeName>) -> bool {
        self.semantics.is_accessible(scope, element, owner)
    }

    fn type_element(&self, qualified: &str) -> Option<Element> {
        self.semantics.type_element(qualified)
    }

    fn type_of_expression(&self, expr: &PartialExpr) -> Option<Type> {
        self.semantics.type_of_expression(expr)
    }
}

impl CompilerFacade for FixtureFacade {
    fn compile_focus(
        &self,
        _file: &Path,
        _pruned_text: &str,
        _line: u32,
        _character: u32,
    ) -> Result<Box<dyn FocusSession + '_>, FacadeError> {
        Ok(Box::new(FixtureFocus { facade: self }))
    }

    fn compile_batch(
        &self,
        _files: &[(PathBuf, String)],
    ) -> Result<Box<dyn BatchSession + '_>, FacadeError> {
        Ok(Box::new(FixtureBatch { facade: self }))
    }
}

struct FixtureFocus<'a> {
    facade: &'a FixtureFacade,
}

impl FocusSession for FixtureFocus<'_> {
    fn scope_at(&self, _line: u32, _character: u32) -> Scope {
        self.facade.scope.clone()
    }

    fn element_at(&self, _line: u32, _character: u32) -> Option<Element> {
        None
    }

    fn type_of(&self, expr: &PartialExpr) -> Option<Type> {
        self.facade.semantics.type_of_expression(expr)
    }

    fn overloads_at(&self, _line: u32, _character: u32) -> Vec<Element> {
        self.facade.overloads.clone()
    }
}

struct FixtureBatch<'a> {
    facade: &'a FixtureFacade,
}

impl BatchSession for FixtureBatch<'_> {
    fn report_errors(&self) -> Vec<Diagnostic> {
        self.facade.diagnostics.clone()
    }

    fn unresolved_names(&self, _file: &Path) -> Vec<Name> {
        self.facade.unresolved.clone()
    }
}
