//! The query engine of the Javelin language service.
//!
//! Everything here runs against an abstract compiler facade
//! ([`semantics::Semantics`] and the session traits): the engine
//! orchestrates parsing, pruning and partial checking, assembles
//! completion candidates from scope, supertypes, static imports and the
//! class catalogs, and formats signature help, but never typechecks Java
//! itself.

pub mod analysis;
pub mod catalog;
pub mod check;
pub mod completion;
pub mod semantics;
pub mod testing;

pub use analysis::{Analysis, Outcome, QueryError, SignatureHelp, SignatureInfo};
pub use catalog::ClassCatalog;
pub use check::{can_check, cant_check, Check};
pub use completion::{Candidate, Completer};
pub use semantics::{
    print_method, BatchSession, CompilerFacade, Diagnostic, Element, ElementKind, FacadeError,
    FocusSession, MethodType, Modifiers, Param, Primitive, Scope, ScopeFrame, Semantics, Severity,
    Type, TypeName,
};
