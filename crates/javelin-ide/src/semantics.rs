//! The semantic model and the compiler facade boundary.
//!
//! Values of these types flow between the engine and the external
//! semantic compiler. The engine never stores them across edits: parse
//! trees and scopes live for one query, owned by the session that
//! produced them.

use std::fmt;
use std::path::{Path, PathBuf};

use javelin_core::{last_name, Name, Range};
use javelin_syntax::PartialExpr;
use thiserror::Error;

/// A fully qualified type name, e.g. `java.lang.String`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        last_name(&self.0)
    }
}

impl fmt::Debug for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeName").field(&self.0).finish()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Primitive Java types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
    Void,
}

impl Primitive {
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Char => "char",
            Primitive::Float => "float",
            Primitive::Double => "double",
            Primitive::Void => "void",
        }
    }
}

/// A type as the engine sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Declared(TypeName),
    Array(Box<Type>),
    Primitive(Primitive),
    /// The type of a method; carries its signature.
    Executable(Box<MethodType>),
    /// An unresolved type variable; members are unknown.
    TypeVar(Name),
}

impl Type {
    pub fn declared(name: impl Into<String>) -> Self {
        Type::Declared(TypeName::new(name))
    }

    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    /// The declared type name, when there is one.
    pub fn as_declared(&self) -> Option<&TypeName> {
        match self {
            Type::Declared(name) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    /// Short form: simple names only, the way completion labels print.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Declared(name) => f.write_str(name.simple_name()),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Primitive(p) => f.write_str(p.keyword()),
            Type::Executable(method) => write!(f, "{}", method.ret),
            Type::TypeVar(name) => f.write_str(name.as_str()),
        }
    }
}

/// A method signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodType {
    pub params: Vec<Param>,
    pub ret: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: Name,
    pub ty: Type,
}

impl Param {
    pub fn new(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Class,
    Interface,
    Enum,
    EnumConstant,
    Field,
    Method,
    Constructor,
    Parameter,
    Local,
    Package,
    TypeParameter,
}

impl ElementKind {
    /// Kinds that declare members of their own.
    pub fn is_type_like(self) -> bool {
        matches!(
            self,
            ElementKind::Class | ElementKind::Interface | ElementKind::Enum
        )
    }

    pub fn is_method_like(self) -> bool {
        matches!(self, ElementKind::Method | ElementKind::Constructor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub is_static: bool,
    pub is_public: bool,
    pub is_private: bool,
    pub is_protected: bool,
    pub is_abstract: bool,
    /// Compiler-generated members (default constructors and the like).
    pub is_synthetic: bool,
}

impl Modifiers {
    pub const PUBLIC: Modifiers = Modifiers {
        is_public: true,
        is_static: false,
        is_private: false,
        is_protected: false,
        is_abstract: false,
        is_synthetic: false,
    };

    pub const PUBLIC_STATIC: Modifiers = Modifiers {
        is_public: true,
        is_static: true,
        is_private: false,
        is_protected: false,
        is_abstract: false,
        is_synthetic: false,
    };
}

/// A named program element: local, field, method, type, package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: Name,
    pub kind: ElementKind,
    pub modifiers: Modifiers,
    /// The element's type; for methods, `Type::Executable`.
    pub ty: Type,
    /// Declaring type, for members.
    pub owner: Option<TypeName>,
}

impl Element {
    pub fn local(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Local,
            modifiers: Modifiers::default(),
            ty,
            owner: None,
        }
    }

    pub fn parameter(name: impl Into<Name>, ty: Type) -> Self {
        Self {
            kind: ElementKind::Parameter,
            ..Self::local(name, ty)
        }
    }

    pub fn field(name: impl Into<Name>, ty: Type, owner: TypeName, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Field,
            modifiers,
            ty,
            owner: Some(owner),
        }
    }

    pub fn method(
        name: impl Into<Name>,
        signature: MethodType,
        owner: TypeName,
        modifiers: Modifiers,
    ) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Method,
            modifiers,
            ty: Type::Executable(Box::new(signature)),
            owner: Some(owner),
        }
    }

    /// The `this` pseudo-variable of an instance context.
    pub fn this(ty: TypeName) -> Self {
        Self::local("this", Type::Declared(ty))
    }

    /// The `super` pseudo-variable.
    pub fn super_(ty: TypeName) -> Self {
        Self::local("super", Type::Declared(ty))
    }

    pub fn is_this_or_super(&self) -> bool {
        self.name == "this" || self.name == "super"
    }

    pub fn signature(&self) -> Option<&MethodType> {
        match &self.ty {
            Type::Executable(method) => Some(method),
            _ => None,
        }
    }

    /// A stable string form used for overriding/deduplication decisions.
    pub fn string_form(&self) -> String {
        match self.signature() {
            Some(method) => {
                let params: Vec<String> = method.params.iter().map(|p| p.ty.to_string()).collect();
                format!("{}({})", self.name, params.join(","))
            }
            None => self.name.to_string(),
        }
    }
}

/// Renders a method the way signature help and override snippets show it,
/// e.g. `void print(int i)`.
pub fn print_method(element: &Element) -> Option<String> {
    let method = element.signature()?;
    let params: Vec<String> = method
        .params
        .iter()
        .map(|p| format!("{} {}", p.ty, p.name))
        .collect();
    Some(format!(
        "{} {}({})",
        method.ret,
        element.name,
        params.join(", ")
    ))
}

/// One lexical environment: the locals visible at a program point and
/// whether the point sits in a static context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScopeFrame {
    pub locals: Vec<Element>,
    /// Whether the enclosing method (if any) is static.
    pub static_context: bool,
}

impl ScopeFrame {
    pub fn new(locals: Vec<Element>) -> Self {
        Self {
            locals,
            static_context: false,
        }
    }

    pub fn new_static(locals: Vec<Element>) -> Self {
        Self {
            locals,
            static_context: true,
        }
    }
}

/// An ordered chain of lexical environments at a program point, innermost
/// first. `this`/`super` appear as pseudo-variables in the frame of the
/// enclosing instance context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
    frames: Vec<ScopeFrame>,
}

impl Scope {
    pub fn new(frames: Vec<ScopeFrame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[ScopeFrame] {
        &self.frames
    }

    /// Whether the query point itself sits in a static context.
    pub fn in_static_context(&self) -> bool {
        self.frames.first().is_some_and(|f| f.static_context)
    }

    /// The type of the enclosing instance, from the innermost `this`.
    pub fn this_type(&self) -> Option<&TypeName> {
        self.frames
            .iter()
            .flat_map(|f| f.locals.iter())
            .find(|el| el.name == "this")
            .and_then(|el| el.ty.as_declared())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Information,
    Hint,
}

/// A diagnostic reported by batch compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: PathBuf,
    pub range: Range,
    pub severity: Severity,
    pub message: String,
}

/// An internal failure inside the compiler facade.
///
/// Callers catch this at each call site and degrade to an empty result.
#[derive(Debug, Error)]
#[error("compiler facade error: {0}")]
pub struct FacadeError(pub String);

/// Type relations and element lookup provided by the semantic compiler.
pub trait Semantics {
    /// All members of a type, inherited included.
    fn all_members(&self, ty: &TypeName) -> Vec<Element>;

    /// Only the members declared by the type itself.
    fn enclosed_elements(&self, ty: &TypeName) -> Vec<Element>;

    fn direct_supertypes(&self, ty: &Type) -> Vec<Type>;

    fn is_assignable(&self, from: &Type, to: &Type) -> bool;

    /// Whether `element` can be referenced from `scope`; `owner` narrows
    /// protected-member checks to the receiver type.
    fn is_accessible(&self, scope: &Scope, element: &Element, owner: Option<&TypeName>) -> bool;

    /// Resolves a fully qualified type name.
    fn type_element(&self, qualified: &str) -> Option<Element>;

    /// Resolves the type of an expression outside the partial grammar;
    /// used to retain results from a prior full compilation.
    fn type_of_expression(&self, expr: &PartialExpr) -> Option<Type>;
}

/// A compilation scoped to one cursor location, typically over pruned
/// source. Dropped at the end of the query.
pub trait FocusSession {
    /// The lexical scope at a position.
    fn scope_at(&self, line: u32, character: u32) -> Scope;

    /// The element under the cursor, if the compilation reached it.
    fn element_at(&self, line: u32, character: u32) -> Option<Element>;

    /// Resolves an expression the partial checker cannot.
    fn type_of(&self, expr: &PartialExpr) -> Option<Type>;

    /// The overloads of the invocation surrounding the cursor.
    fn overloads_at(&self, line: u32, character: u32) -> Vec<Element>;
}

/// A compilation over a set of files, for diagnostics and import repair.
pub trait BatchSession {
    fn report_errors(&self) -> Vec<Diagnostic>;

    /// Simple names the file references but cannot resolve.
    fn unresolved_names(&self, file: &Path) -> Vec<Name>;
}

/// The full facade: semantic queries plus session construction.
pub trait CompilerFacade: Semantics {
    fn compile_focus(
        &self,
        file: &Path,
        pruned_text: &str,
        line: u32,
        character: u32,
    ) -> Result<Box<dyn FocusSession + '_>, FacadeError>;

    fn compile_batch(
        &self,
        files: &[(PathBuf, String)],
    ) -> Result<Box<dyn BatchSession + '_>, FacadeError>;
}
