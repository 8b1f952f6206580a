//! Lexical search helpers.
//!
//! These pre-qualify expensive operations without involving the compiler:
//! package extraction for the file index, class-declaration detection for
//! navigation fast paths, and import lists for completion. Working on the
//! token stream (rather than raw text) means string literals and comments
//! can never produce false positives.

use javelin_core::Name;

use crate::lexer::lex;
use crate::token::{Token, TokenKind};

/// An `import` declaration, read lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The dotted name as written, without a trailing `.*`.
    pub qualified: String,
    pub is_static: bool,
    pub is_star: bool,
}

/// A top-level type declaration, read lexically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: Name,
    pub is_public: bool,
}

/// The dotted name of the first `package a.b.c;` declaration, or `""`.
pub fn package_name(text: &str) -> String {
    let tokens = lex(text);
    let mut i = 0;
    while let Some(at) = next_significant(&tokens, i) {
        let token = &tokens[at];
        match token.kind {
            TokenKind::At => {
                // package-info files may carry annotations before the
                // declaration.
                i = skip_annotation(&tokens, at + 1);
            }
            TokenKind::Keyword if token.text(text) == "package" => {
                let (name, _) = read_dotted(text, &tokens, at + 1);
                return name;
            }
            _ => return String::new(),
        }
    }
    String::new()
}

/// Whether the file declares a type named `name`.
///
/// Matches `class Foo`, `interface Foo`, `enum Foo` and `@interface Foo`
/// at any nesting depth.
pub fn contains_class(text: &str, name: &str) -> bool {
    let tokens = lex(text);
    for (i, token) in tokens.iter().enumerate() {
        if token.kind == TokenKind::Keyword
            && matches!(token.text(text), "class" | "interface" | "enum")
        {
            if let Some(next) = next_significant(&tokens, i + 1) {
                let next = &tokens[next];
                if next.kind == TokenKind::Identifier && next.text(text) == name {
                    return true;
                }
            }
        }
    }
    false
}

/// Whether the file contains `word` as an identifier token.
pub fn contains_word(text: &str, word: &str) -> bool {
    lex(text)
        .iter()
        .any(|t| t.kind == TokenKind::Identifier && t.text(text) == word)
}

/// Every `import` declaration in the file.
pub fn imports(text: &str) -> Vec<Import> {
    let tokens = lex(text);
    let mut result = Vec::new();
    let mut i = 0;
    while let Some(at) = next_significant(&tokens, i) {
        let token = &tokens[at];
        i = at + 1;
        if token.kind == TokenKind::LBrace {
            // Imports only precede the first type body.
            break;
        }
        if token.kind != TokenKind::Keyword || token.text(text) != "import" {
            continue;
        }
        let mut name_at = at + 1;
        let mut is_static = false;
        if let Some(next) = next_significant(&tokens, name_at) {
            if tokens[next].kind == TokenKind::Keyword && tokens[next].text(text) == "static" {
                is_static = true;
                name_at = next + 1;
            }
        }
        let (qualified, is_star) = read_dotted(text, &tokens, name_at);
        if !qualified.is_empty() {
            result.push(Import {
                qualified,
                is_static,
                is_star,
            });
        }
    }
    result
}

/// Top-level type declarations (brace depth zero).
pub fn type_declarations(text: &str) -> Vec<TypeDecl> {
    let tokens = lex(text);
    let mut result = Vec::new();
    let mut depth = 0u32;
    let mut is_public = false;
    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::LBrace => depth += 1,
            TokenKind::RBrace => depth = depth.saturating_sub(1),
            TokenKind::Semicolon => is_public = false,
            TokenKind::Keyword if depth == 0 => match token.text(text) {
                "public" => is_public = true,
                "class" | "interface" | "enum" => {
                    if let Some(next) = next_significant(&tokens, i + 1) {
                        let next = &tokens[next];
                        if next.kind == TokenKind::Identifier {
                            result.push(TypeDecl {
                                name: Name::new(next.text(text)),
                                is_public,
                            });
                        }
                    }
                    is_public = false;
                }
                _ => {}
            },
            _ => {}
        }
    }
    result
}

/// The final path segment of a `/`-separated path or URI.
pub fn file_name(uri: &str) -> &str {
    uri.rsplit('/').next().unwrap_or(uri)
}

/// Index of the next non-trivia, non-EOF token at or after `from`.
fn next_significant(tokens: &[Token], from: usize) -> Option<usize> {
    tokens[from..]
        .iter()
        .position(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .map(|p| from + p)
}

/// Reads `a.b.c` (optionally ending `.*`) starting at `from`; returns the
/// dotted name without the star, and whether a star was present.
fn read_dotted(text: &str, tokens: &[Token], from: usize) -> (String, bool) {
    let mut name = String::new();
    let mut is_star = false;
    let mut expect_segment = true;
    for token in &tokens[from..] {
        if token.kind.is_trivia() {
            continue;
        }
        match token.kind {
            TokenKind::Identifier if expect_segment => {
                name.push_str(token.text(text));
                expect_segment = false;
            }
            TokenKind::Operator if expect_segment && token.text(text) == "*" => {
                is_star = true;
                break;
            }
            TokenKind::Dot if !expect_segment => {
                name.push('.');
                expect_segment = true;
            }
            _ => break,
        }
    }
    if name.ends_with('.') {
        name.pop();
    }
    (name, is_star)
}

/// Skips `@Name(.Name)*` and an optional argument list, returning the index
/// just past the annotation. `from` points after the `@`.
fn skip_annotation(tokens: &[Token], from: usize) -> usize {
    let mut i = from;
    let mut expect_segment = true;
    while let Some(at) = next_significant(tokens, i) {
        match tokens[at].kind {
            TokenKind::Identifier if expect_segment => {
                expect_segment = false;
                i = at + 1;
            }
            TokenKind::Dot if !expect_segment => {
                expect_segment = true;
                i = at + 1;
            }
            TokenKind::LParen if !expect_segment => {
                let mut depth = 0u32;
                let mut j = at;
                while j < tokens.len() {
                    match tokens[j].kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth = depth.saturating_sub(1);
                            if depth == 0 {
                                return j + 1;
                            }
                        }
                        _ => {}
                    }
                    j += 1;
                }
                return j;
            }
            _ => return at,
        }
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn extracts_package_declaration() {
        assert_eq!(
            package_name("package com.example.demo;\nclass A {}"),
            "com.example.demo"
        );
        assert_eq!(package_name("// header\npackage p;\n"), "p");
        assert_eq!(package_name("class A {}"), "");
        assert_eq!(package_name(""), "");
    }

    #[test]
    fn package_name_ignores_comment_text() {
        assert_eq!(package_name("/* package wrong; */ package right;"), "right");
    }

    #[test]
    fn package_name_skips_file_annotations() {
        assert_eq!(
            package_name("@Deprecated\n@Generated(\"tool\")\npackage p.q;"),
            "p.q"
        );
    }

    #[test]
    fn finds_type_declarations_by_name() {
        let text = "package p;\npublic class Outer {\n  interface Inner {}\n}\nenum Color {}\n";
        assert!(contains_class(text, "Outer"));
        assert!(contains_class(text, "Inner"));
        assert!(contains_class(text, "Color"));
        assert!(!contains_class(text, "Missing"));
    }

    #[test]
    fn class_in_string_is_not_a_declaration() {
        assert!(!contains_class("class A { String s = \"class B\"; }", "B"));
    }

    #[test]
    fn reads_imports() {
        let text =
            "package p;\nimport java.util.List;\nimport static java.lang.Math.*;\nclass A {}";
        assert_eq!(
            imports(text),
            vec![
                Import {
                    qualified: "java.util.List".into(),
                    is_static: false,
                    is_star: false,
                },
                Import {
                    qualified: "java.lang.Math".into(),
                    is_static: true,
                    is_star: true,
                },
            ]
        );
    }

    #[test]
    fn lists_top_level_types_with_visibility() {
        let text = "package p;\npublic class A { class Nested {} }\nclass B {}\n";
        let decls = type_declarations(text);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "A");
        assert!(decls[0].is_public);
        assert_eq!(decls[1].name, "B");
        assert!(!decls[1].is_public);
    }

    #[test]
    fn splits_file_names() {
        assert_eq!(file_name("file:///w/src/Main.java"), "Main.java");
        assert_eq!(file_name("Main.java"), "Main.java");
    }
}
