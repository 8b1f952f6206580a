//! Editor-facing queries.
//!
//! `Analysis` owns the file store, the compiler facade and the class
//! catalogs, and serves one request end to end: snapshot the contents,
//! classify the cursor, prune, open a focus session, and hand the pieces
//! to the checker and the completion engine. Sessions never outlive the
//! query; content is snapshotted once at the start.

use std::path::{Path, PathBuf};

use javelin_core::{AnalysisConfig, CancelToken, Position};
use javelin_syntax::{completion_context, lex, prune, TokenKind};
use javelin_vfs::{FileStore, StoreError};
use thiserror::Error;

use crate::catalog::ClassCatalog;
use crate::completion::{Candidate, Completer};
use crate::semantics::{print_method, CompilerFacade, Diagnostic};

/// Fatal failure of a query. Resolution failures are not errors; they
/// produce empty results instead.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The outcome of a query: a result, or a cooperative cancellation.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Complete(T),
    Cancelled,
}

impl<T> Outcome<T> {
    /// The completed value; panics on a cancelled outcome. Test helper.
    pub fn expect_complete(self) -> T {
        match self {
            Outcome::Complete(value) => value,
            Outcome::Cancelled => panic!("query was cancelled"),
        }
    }
}

/// One signature in a signature-help response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureInfo {
    /// `void print(int i)`
    pub label: String,
    pub parameters: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHelp {
    pub signatures: Vec<SignatureInfo>,
    pub active_signature: usize,
    pub active_parameter: usize,
}

/// The analysis service: file store, facade and catalogs behind one owned
/// value. The embedding server wraps it in a single exclusive lock.
pub struct Analysis<F> {
    store: FileStore,
    facade: F,
    catalog: ClassCatalog,
    config: AnalysisConfig,
}

impl<F: CompilerFacade> Analysis<F> {
    pub fn new(facade: F, catalog: ClassCatalog, config: AnalysisConfig) -> Self {
        Self {
            store: FileStore::new(),
            facade,
            catalog,
            config,
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut FileStore {
        &mut self.store
    }

    pub fn catalog_mut(&mut self) -> &mut ClassCatalog {
        &mut self.catalog
    }

    /// Completion at a cursor.
    pub fn completions(
        &self,
        file: &Path,
        line: u32,
        character: u32,
        token: &CancelToken,
    ) -> Result<Outcome<Vec<Candidate>>, QueryError> {
        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let text = self.store.contents(file)?;
        let Some(ctx) = completion_context(&text, line, character) else {
            return Ok(Outcome::Complete(Vec::new()));
        };

        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let pruned = prune(&text, line, character);

        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let focus = match self.facade.compile_focus(file, &pruned, ctx.line, ctx.character) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    target: "javelin.ide",
                    file = %file.display(),
                    error = %err,
                    "focused compilation failed"
                );
                return Ok(Outcome::Complete(Vec::new()));
            }
        };
        let scope = focus.scope_at(ctx.line, ctx.character);

        let completer = Completer::new(
            &self.facade,
            focus.as_ref(),
            &self.catalog,
            &self.store,
            token,
            self.config.max_completion_items,
            file,
            &text,
            &ctx,
            scope,
        );
        match completer.complete() {
            Ok(candidates) => Ok(Outcome::Complete(candidates)),
            Err(_cancelled) => Ok(Outcome::Cancelled),
        }
    }

    /// Overload signatures for the invocation surrounding the cursor.
    pub fn signature_help(
        &self,
        file: &Path,
        line: u32,
        character: u32,
        token: &CancelToken,
    ) -> Result<Outcome<Option<SignatureHelp>>, QueryError> {
        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let text = self.store.contents(file)?;
        let pruned = prune(&text, line, character);

        let focus = match self.facade.compile_focus(file, &pruned, line, character) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    target: "javelin.ide",
                    file = %file.display(),
                    error = %err,
                    "focused compilation failed"
                );
                return Ok(Outcome::Complete(None));
            }
        };
        let overloads = focus.overloads_at(line, character);
        if overloads.is_empty() {
            return Ok(Outcome::Complete(None));
        }

        let signatures: Vec<SignatureInfo> = overloads
            .iter()
            .filter_map(|method| {
                let label = print_method(method)?;
                let parameters = method
                    .signature()?
                    .params
                    .iter()
                    .map(|p| format!("{} {}", p.ty, p.name))
                    .collect();
                Some(SignatureInfo { label, parameters })
            })
            .collect();
        if signatures.is_empty() {
            return Ok(Outcome::Complete(None));
        }
        Ok(Outcome::Complete(Some(SignatureHelp {
            signatures,
            active_signature: 0,
            active_parameter: active_parameter(&text, line, character),
        })))
    }

    /// Diagnostics for a set of files, through one batch session.
    pub fn diagnostics(
        &self,
        files: &[PathBuf],
        token: &CancelToken,
    ) -> Result<Outcome<Vec<Diagnostic>>, QueryError> {
        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let mut snapshot = Vec::with_capacity(files.len());
        for file in files {
            snapshot.push((file.clone(), self.store.contents(file)?));
        }
        let batch = match self.facade.compile_batch(&snapshot) {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    target: "javelin.ide",
                    error = %err,
                    "batch compilation failed"
                );
                return Ok(Outcome::Complete(Vec::new()));
            }
        };
        Ok(Outcome::Complete(batch.report_errors()))
    }

    /// Qualified names that would satisfy the file's unresolved
    /// references, resolved against the sourcepath, then the classpath,
    /// then the JDK. Results are sorted and deduplicated.
    pub fn fix_imports(
        &self,
        file: &Path,
        token: &CancelToken,
    ) -> Result<Outcome<Vec<String>>, QueryError> {
        if token.is_cancelled() {
            return Ok(Outcome::Cancelled);
        }
        let text = self.store.contents(file)?;
        let batch = match self
            .facade
            .compile_batch(&[(file.to_path_buf(), text)])
        {
            Ok(session) => session,
            Err(err) => {
                tracing::warn!(
                    target: "javelin.ide",
                    file = %file.display(),
                    error = %err,
                    "batch compilation failed"
                );
                return Ok(Outcome::Complete(Vec::new()));
            }
        };

        let mut qualified_names = Vec::new();
        for name in batch.unresolved_names(file) {
            if token.is_cancelled() {
                return Ok(Outcome::Cancelled);
            }
            if let Some(found) = self.resolve_import(name.as_str()) {
                qualified_names.push(found);
            }
        }
        qualified_names.sort();
        qualified_names.dedup();
        Ok(Outcome::Complete(qualified_names))
    }

    fn resolve_import(&self, simple: &str) -> Option<String> {
        // Sourcepath first: a project class shadows dependencies.
        let file_stem = format!("{simple}.java");
        for file in self.store.all() {
            if !file.file_name().is_some_and(|n| n == file_stem.as_str()) {
                continue;
            }
            let Some(package) = self.store.stored_package_name(file) else {
                continue;
            };
            return Some(if package.is_empty() {
                simple.to_string()
            } else {
                format!("{package}.{simple}")
            });
        }
        if let Some(found) = self
            .catalog
            .classpath_classes()
            .find(|c| javelin_core::last_name(c) == simple)
        {
            return Some(found.to_string());
        }
        self.catalog
            .jdk_classes()
            .find(|c| javelin_core::last_name(c) == simple)
            .map(String::from)
    }

    /// Jumps to the file declaring `qualified`.
    pub fn find_definition(&self, qualified: &str) -> Option<PathBuf> {
        self.store.find_declaring_file(qualified)
    }
}

/// Which argument the cursor is on inside the surrounding call: commas at
/// call depth to the left of the cursor.
fn active_parameter(text: &str, line: u32, character: u32) -> usize {
    let index = javelin_core::LineIndex::new(text);
    let offset = index.offset_of_position(text, Position::new(line, character)) as u32;
    let tokens: Vec<_> = lex(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .take_while(|t| t.end() <= offset)
        .collect();

    let mut depth = 0u32;
    let mut commas = 0usize;
    for token in tokens.iter().rev() {
        match token.kind {
            TokenKind::RParen | TokenKind::RBracket => depth += 1,
            TokenKind::LParen => {
                if depth == 0 {
                    return commas;
                }
                depth -= 1;
            }
            TokenKind::LBracket => {
                depth = depth.saturating_sub(1);
            }
            TokenKind::Comma if depth == 0 => commas += 1,
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace if depth == 0 => {
                return 0;
            }
            _ => {}
        }
    }
    0
}
