//! Brace-level structure recovery.
//!
//! The pruner and the context classifier both need to know what each `{`
//! opens: a type body, a method/constructor/initializer body, a statement
//! block, or something that is part of a larger expression (array
//! initializers, annotation values). This module recovers that from the
//! token stream alone, tolerating unbalanced input.

use crate::token::{Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Construct {
    /// Class, interface, enum or anonymous-class body.
    Type,
    /// Method, constructor or initializer body.
    Method,
    /// A statement block (`if`, loops, `try`, bare blocks, lambda bodies).
    Block,
    /// Braces that belong to an enclosing expression or annotation.
    Other,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Brace {
    /// Token index of the `{`.
    pub open: usize,
    /// Token index of the matching `}`, or of `Eof` when unbalanced.
    pub close: usize,
    pub construct: Construct,
}

impl Brace {
    /// Whether the cursor byte offset sits inside this brace's body.
    pub fn contains(&self, tokens: &[Token], offset: u32) -> bool {
        tokens[self.open].end() <= offset && offset <= tokens[self.close].start()
    }
}

/// Recovers every brace pair with its construct classification.
///
/// The result is ordered by opening position; enclosing braces precede the
/// braces they contain.
pub(crate) fn analyze(tokens: &[Token], input: &str) -> Vec<Brace> {
    let eof = tokens.len().saturating_sub(1);
    let mut braces: Vec<Brace> = Vec::new();
    // (brace index, paren depth outside the brace)
    let mut stack: Vec<(usize, u32)> = Vec::new();
    let mut paren_depth: u32 = 0;
    let mut header_start: usize = 0;

    for (i, token) in tokens.iter().enumerate() {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => paren_depth += 1,
            TokenKind::RParen | TokenKind::RBracket => {
                paren_depth = paren_depth.saturating_sub(1)
            }
            TokenKind::Semicolon if paren_depth == 0 => header_start = i + 1,
            TokenKind::LBrace => {
                let parent = stack.last().map(|&(idx, _)| braces[idx].construct);
                let construct = if paren_depth > 0 {
                    Construct::Other
                } else {
                    classify(&tokens[header_start..i], input, parent)
                };
                braces.push(Brace {
                    open: i,
                    close: eof,
                    construct,
                });
                stack.push((braces.len() - 1, paren_depth));
                paren_depth = 0;
                header_start = i + 1;
            }
            TokenKind::RBrace => {
                if let Some((idx, saved_depth)) = stack.pop() {
                    braces[idx].close = i;
                    paren_depth = saved_depth;
                }
                header_start = i + 1;
            }
            _ => {}
        }
    }

    braces
}

/// Classifies what the `{` following `header` opens.
///
/// Only tokens outside parentheses/brackets count: a `for (int i = 0; ...)`
/// header must not look like a field initializer.
fn classify(header: &[Token], input: &str, parent: Option<Construct>) -> Construct {
    let mut depth: u32 = 0;
    let mut has_type_keyword = false;
    let mut has_new = false;
    let mut has_eq = false;
    let mut significant = 0usize;
    let mut only_static = true;
    let mut last = TokenKind::Eof;

    for token in header {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => {
                depth += 1;
                if depth == 1 {
                    // The group reads as one unit at depth 0.
                    significant += 1;
                    only_static = false;
                    continue;
                }
            }
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    last = TokenKind::RParen;
                }
                continue;
            }
            TokenKind::RBracket => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    last = TokenKind::RBracket;
                }
                continue;
            }
            _ => {}
        }
        if depth > 0 {
            continue;
        }
        significant += 1;
        last = token.kind;
        match token.kind {
            TokenKind::Keyword => match token.text(input) {
                "class" | "interface" | "enum" => has_type_keyword = true,
                "new" => has_new = true,
                "static" => {}
                _ => only_static = false,
            },
            TokenKind::Operator if token.text(input) == "=" => {
                has_eq = true;
                only_static = false;
            }
            _ => only_static = false,
        }
    }

    if has_type_keyword {
        return Construct::Type;
    }
    if has_new {
        // `new Runnable() {` opens an anonymous class body; `new int[] {`
        // opens an array initializer.
        return if last == TokenKind::RParen {
            Construct::Type
        } else {
            Construct::Other
        };
    }

    match parent {
        Some(Construct::Type) => {
            if has_eq {
                // Field initializer, e.g. `int[] xs = {1, 2};`.
                Construct::Other
            } else if last == TokenKind::RParen || significant == 0 || only_static {
                Construct::Method
            } else {
                Construct::Other
            }
        }
        Some(Construct::Method) | Some(Construct::Block) => {
            if has_eq && last != TokenKind::Arrow {
                Construct::Other
            } else {
                Construct::Block
            }
        }
        _ => Construct::Other,
    }
}

/// The innermost brace of `construct` whose body contains `offset`.
pub(crate) fn innermost_containing(
    braces: &[Brace],
    tokens: &[Token],
    offset: u32,
    construct: Construct,
) -> Option<usize> {
    // Braces are ordered by opening position and siblings are disjoint, so
    // the last match is the innermost.
    let mut found = None;
    for (i, brace) in braces.iter().enumerate() {
        if brace.construct == construct && brace.contains(tokens, offset) {
            found = Some(i);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn constructs(input: &str) -> Vec<Construct> {
        let tokens = lex(input);
        analyze(&tokens, input)
            .into_iter()
            .map(|b| b.construct)
            .collect()
    }

    #[test]
    fn classifies_type_method_block() {
        let input = "class A { void f() { if (x) { } } }";
        assert_eq!(
            constructs(input),
            vec![Construct::Type, Construct::Method, Construct::Block]
        );
    }

    #[test]
    fn initializers_are_method_bodies() {
        let input = "class A { static { x(); } { y(); } }";
        assert_eq!(
            constructs(input),
            vec![Construct::Type, Construct::Method, Construct::Method]
        );
    }

    #[test]
    fn field_array_initializer_is_not_a_body() {
        let input = "class A { int[] xs = {1, 2}; void f() { } }";
        assert_eq!(
            constructs(input),
            vec![Construct::Type, Construct::Other, Construct::Method]
        );
    }

    #[test]
    fn anonymous_class_opens_a_type_body() {
        let input = "class A { void f() { r = new Runnable() { public void run() { } }; } }";
        assert_eq!(
            constructs(input),
            vec![
                Construct::Type,
                Construct::Method,
                Construct::Type,
                Construct::Method,
            ]
        );
    }

    #[test]
    fn tolerates_unbalanced_braces() {
        let input = "class A { void f() {";
        let tokens = lex(input);
        let braces = analyze(&tokens, input);
        assert_eq!(braces.len(), 2);
        assert_eq!(tokens[braces[0].close].kind, TokenKind::Eof);
    }
}
