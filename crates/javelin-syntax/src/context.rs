//! Completion-context classification.
//!
//! Given a cursor, decide what kind of completion the engine should run
//! and extract the partial identifier already typed. This is a purely
//! lexical pass; the expensive focused compilation happens afterwards and
//! only when this pass says it is worth it.

use javelin_core::{LineIndex, Name, Position};

use crate::lexer::lex;
use crate::structure::{self, Construct};
use crate::token::{Token, TokenKind};

/// What sits at the cursor, in dispatch order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    /// A `case` label inside a `switch`.
    CaseLabel,
    /// An annotation name, `@X`.
    Annotation,
    /// A segment of an `import` path.
    Import,
    /// Members of the expression left of a `.`.
    MemberSelect,
    /// Members of the expression left of a `::`.
    MemberReference,
    /// A plain identifier.
    Identifier,
}

/// The classified cursor position handed to the completion engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionContext {
    pub kind: ContextKind,
    /// The identifier prefix already typed; possibly empty.
    pub partial_name: Name,
    /// The query point, unchanged from the request.
    pub line: u32,
    pub character: u32,
    pub in_class: bool,
    pub in_method: bool,
    /// Whether a completed method call should append parentheses.
    pub add_parens: bool,
    /// Whether a completed statement should append a semicolon.
    pub add_semi: bool,
}

/// Classifies the cursor at `line`:`character`.
///
/// Returns `None` when the cursor is inside a comment or a literal, where
/// completion makes no sense.
pub fn completion_context(text: &str, line: u32, character: u32) -> Option<CompletionContext> {
    let index = LineIndex::new(text);
    let offset = index.offset_of_position(text, Position::new(line, character)) as u32;
    let tokens = lex(text);

    // The token the cursor touches on its left.
    let touching = tokens
        .iter()
        .position(|t| t.start() < offset && offset <= t.end())
        .map(|i| &tokens[i]);

    if let Some(token) = touching {
        let strictly_inside = offset < token.end();
        // Comments and literals are not completable; whitespace is just a
        // typing position.
        let uncompletable = matches!(
            token.kind,
            TokenKind::LineComment | TokenKind::BlockComment
        ) || token.kind.is_literal();
        if strictly_inside && uncompletable {
            return None;
        }
    }

    let (partial_name, anchor) = match touching {
        Some(token)
            if matches!(token.kind, TokenKind::Identifier | TokenKind::Keyword) =>
        {
            let prefix = &text[token.start() as usize..offset as usize];
            (Name::new(prefix), token.start())
        }
        _ => (Name::new(""), offset),
    };

    let prev = last_significant_before(&tokens, anchor);
    let kind = match prev.map(|t| t.kind) {
        Some(TokenKind::At) => ContextKind::Annotation,
        Some(TokenKind::Dot) => {
            if in_import_statement(text, &tokens, anchor) {
                ContextKind::Import
            } else {
                ContextKind::MemberSelect
            }
        }
        Some(TokenKind::DoubleColon) => ContextKind::MemberReference,
        _ => {
            if in_import_statement(text, &tokens, anchor) {
                ContextKind::Import
            } else if in_case_label(text, &tokens, anchor) {
                ContextKind::CaseLabel
            } else {
                ContextKind::Identifier
            }
        }
    };

    let braces = structure::analyze(&tokens, text);
    let in_class =
        structure::innermost_containing(&braces, &tokens, offset, Construct::Type).is_some();
    let in_method =
        structure::innermost_containing(&braces, &tokens, offset, Construct::Method).is_some();

    // What already follows the cursor on this line decides whether the
    // editor needs to insert call parens and a statement terminator.
    let line_end = index.line_end(text, line).unwrap_or(text.len());
    let rest = text[(offset as usize).min(line_end)..line_end].trim_start();
    let add_parens = !rest.starts_with('(');
    let add_semi = rest.is_empty();

    Some(CompletionContext {
        kind,
        partial_name,
        line,
        character,
        in_class,
        in_method,
        add_parens,
        add_semi,
    })
}

/// The end offset of the subject expression of the `switch` whose body
/// contains the cursor: the position of the `)` closing `switch (...)`.
///
/// Feeding this offset to [`crate::expression_ending_at`] recovers the
/// switched expression itself.
pub fn switch_subject_end(text: &str, line: u32, character: u32) -> Option<u32> {
    let index = LineIndex::new(text);
    let offset = index.offset_of_position(text, Position::new(line, character)) as u32;
    let tokens = lex(text);
    let braces = structure::analyze(&tokens, text);

    let mut found = None;
    for brace in &braces {
        if !brace.contains(&tokens, offset) {
            continue;
        }
        // Expect `switch ( ... ) {` right before the body.
        let Some(rparen) = prev_significant_index(&tokens, brace.open) else {
            continue;
        };
        if tokens[rparen].kind != TokenKind::RParen {
            continue;
        }
        let Some(lparen) = match_paren_backwards(&tokens, rparen) else {
            continue;
        };
        let Some(head) = prev_significant_index(&tokens, lparen) else {
            continue;
        };
        if tokens[head].kind == TokenKind::Keyword && tokens[head].text(text) == "switch" {
            // Braces are ordered outermost-first; keep the innermost.
            found = Some(tokens[rparen].start());
        }
    }
    found
}

fn prev_significant_index(tokens: &[Token], before: usize) -> Option<usize> {
    (0..before)
        .rev()
        .find(|&i| !tokens[i].kind.is_trivia() && tokens[i].kind != TokenKind::Eof)
}

fn match_paren_backwards(tokens: &[Token], close: usize) -> Option<usize> {
    let mut depth = 0u32;
    for i in (0..=close).rev() {
        match tokens[i].kind {
            TokenKind::RParen => depth += 1,
            TokenKind::LParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// The last non-trivia token ending at or before `offset`.
fn last_significant_before(tokens: &[Token], offset: u32) -> Option<&Token> {
    tokens
        .iter()
        .take_while(|t| t.end() <= offset)
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .last()
}

/// Whether the statement containing `offset` begins with `import`.
fn in_import_statement(text: &str, tokens: &[Token], offset: u32) -> bool {
    statement_head(text, tokens, offset) == Some("import")
}

/// Whether the statement containing `offset` begins with `case`.
fn in_case_label(text: &str, tokens: &[Token], offset: u32) -> bool {
    // A case label ends at `:` or `->`; past that we are in the case body.
    let mut head = None;
    for token in tokens.iter().take_while(|t| t.end() <= offset) {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::Semicolon
            | TokenKind::LBrace
            | TokenKind::RBrace
            | TokenKind::Colon
            | TokenKind::Arrow => head = None,
            _ => {
                if head.is_none() {
                    head = Some(token);
                }
            }
        }
    }
    head.is_some_and(|t| t.kind == TokenKind::Keyword && t.text(text) == "case")
}

/// First significant token of the statement containing `offset`.
fn statement_head<'a>(text: &'a str, tokens: &[Token], offset: u32) -> Option<&'a str> {
    let mut head = None;
    for token in tokens.iter().take_while(|t| t.end() <= offset) {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::Semicolon | TokenKind::LBrace | TokenKind::RBrace => head = None,
            _ => {
                if head.is_none() {
                    head = Some(token.text(text));
                }
            }
        }
    }
    head
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn context_at(text: &str, line: u32, character: u32) -> CompletionContext {
        completion_context(text, line, character).expect("completable position")
    }

    #[test]
    fn classifies_member_select() {
        let text = "class A {\n  void f() {\n    \"abc\".\n  }\n}\n";
        let ctx = context_at(text, 2, 10);
        assert_eq!(ctx.kind, ContextKind::MemberSelect);
        assert_eq!(ctx.partial_name, "");
        assert!(ctx.in_class);
        assert!(ctx.in_method);
    }

    #[test]
    fn classifies_member_select_with_partial() {
        let text = "class A {\n  void f() {\n    s.len\n  }\n}\n";
        let ctx = context_at(text, 2, 9);
        assert_eq!(ctx.kind, ContextKind::MemberSelect);
        assert_eq!(ctx.partial_name, "len");
    }

    #[test]
    fn classifies_member_reference() {
        let text = "class A {\n  void f() {\n    String::\n  }\n}\n";
        let ctx = context_at(text, 2, 12);
        assert_eq!(ctx.kind, ContextKind::MemberReference);
    }

    #[test]
    fn classifies_annotation() {
        let text = "class A {\n  @Over\n  void f() { }\n}\n";
        let ctx = context_at(text, 1, 7);
        assert_eq!(ctx.kind, ContextKind::Annotation);
        assert_eq!(ctx.partial_name, "Over");
        assert!(ctx.in_class);
        assert!(!ctx.in_method);
    }

    #[test]
    fn classifies_import_path() {
        let text = "import java.util.\n";
        let ctx = context_at(text, 0, 17);
        assert_eq!(ctx.kind, ContextKind::Import);
    }

    #[test]
    fn classifies_case_label() {
        let text = "class A {\n  void f(Color c) {\n    switch (c) {\n      case RE\n    }\n  }\n}\n";
        let ctx = context_at(text, 3, 13);
        assert_eq!(ctx.kind, ContextKind::CaseLabel);
        assert_eq!(ctx.partial_name, "RE");
    }

    #[test]
    fn case_body_is_identifier_context() {
        let text =
            "class A {\n  void f(int x) {\n    switch (x) {\n      case 1: fo\n    }\n  }\n}\n";
        let ctx = context_at(text, 3, 16);
        assert_eq!(ctx.kind, ContextKind::Identifier);
    }

    #[test]
    fn identifier_with_partial_name() {
        let text = "class A {\n  void f() {\n    comp\n  }\n}\n";
        let ctx = context_at(text, 2, 8);
        assert_eq!(ctx.kind, ContextKind::Identifier);
        assert_eq!(ctx.partial_name, "comp");
        assert!(ctx.add_semi);
        assert!(ctx.add_parens);
    }

    #[test]
    fn existing_parens_suppress_insertion() {
        let text = "class A {\n  void f() {\n    run();\n  }\n}\n";
        let ctx = context_at(text, 2, 7);
        assert_eq!(ctx.partial_name, "run");
        assert!(!ctx.add_parens);
        assert!(!ctx.add_semi);
    }

    #[test]
    fn top_level_is_outside_class_and_method() {
        let text = "cla\n";
        let ctx = context_at(text, 0, 3);
        assert_eq!(ctx.kind, ContextKind::Identifier);
        assert!(!ctx.in_class);
        assert!(!ctx.in_method);
    }

    #[test]
    fn finds_the_enclosing_switch_subject() {
        let text =
            "class A {\n  void f(Color c) {\n    switch (c) {\n      case RE\n    }\n  }\n}\n";
        let end = switch_subject_end(text, 3, 13).expect("inside a switch");
        let subject = crate::expression_ending_at(text, end).expect("parses");
        assert_eq!(
            &text[subject.range().start() as usize..subject.range().end() as usize],
            "c"
        );

        assert_eq!(switch_subject_end(text, 1, 10), None);
    }

    #[test]
    fn no_context_inside_comments_or_strings() {
        let text = "class A { // comment\n  String s = \"lit\";\n}\n";
        assert_eq!(completion_context(text, 0, 15), None);
        assert_eq!(completion_context(text, 1, 16), None);
    }
}
