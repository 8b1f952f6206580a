//! Equal-length source erasure.
//!
//! Focused compilation is fast when most of the file is syntactically
//! trivial. `prune` blanks everything outside the cursor's neighborhood
//! while keeping the output byte-for-byte as long as the input, with every
//! newline in place, so diagnostics and queries against the pruned text
//! carry original coordinates.
//!
//! Concretely:
//! - bodies of methods, constructors and initializers that do not contain
//!   the cursor are blanked;
//! - inside the cursor's own body, statements that begin after the
//!   cursor's statement are blanked, recursively inside nested blocks;
//! - the cursor's statement is kept through its terminator, so a member
//!   access keeps its full receiver;
//! - declarations and signatures are kept everywhere.

use javelin_core::{LineIndex, Position};

use crate::lexer::lex;
use crate::structure::{self, Brace, Construct};
use crate::token::{Token, TokenKind};

/// Prunes the file to the neighborhood of the cursor.
pub fn prune(text: &str, line: u32, character: u32) -> String {
    let index = LineIndex::new(text);
    let cursor = index.offset_of_position(text, Position::new(line, character)) as u32;
    let tokens = lex(text);
    let braces = structure::analyze(&tokens, text);

    let mut out = text.as_bytes().to_vec();

    // Blank every body the cursor is not in.
    for brace in &braces {
        if brace.construct == Construct::Method && !brace.contains(&tokens, cursor) {
            blank(
                &mut out,
                tokens[brace.open].end() as usize,
                tokens[brace.close].start() as usize,
            );
        }
    }

    // Inside the cursor's body, blank statements past the cursor.
    if let Some(body) =
        structure::innermost_containing(&braces, &tokens, cursor, Construct::Method)
    {
        erase_after_cursor(text, &tokens, &braces, &braces[body], cursor, &mut out);
    }

    into_string(out)
}

/// Word-mode prune: keep only identifier tokens equal to `word`.
pub fn prune_word(text: &str, word: &str) -> String {
    let tokens = lex(text);
    let mut out = text.as_bytes().to_vec();
    let out_len = out.len();
    blank(&mut out, 0, out_len);
    for token in &tokens {
        if token.kind == TokenKind::Identifier && token.text(text) == word {
            let range = token.start() as usize..token.end() as usize;
            out[range.clone()].copy_from_slice(&text.as_bytes()[range]);
        }
    }
    into_string(out)
}

/// Blanks statements of `block` that begin after the cursor, recursing into
/// the statement that contains it.
fn erase_after_cursor(
    text: &str,
    tokens: &[Token],
    braces: &[Brace],
    block: &Brace,
    cursor: u32,
    out: &mut Vec<u8>,
) {
    for statement in statements(text, tokens, braces, block) {
        if statement.end < cursor {
            continue;
        }
        if statement.start > cursor {
            blank(out, statement.start as usize, statement.end as usize);
            continue;
        }
        // The cursor's statement: keep its text, but recurse into the
        // blocks it owns so trailing branches are blanked too.
        for idx in top_level_braces(braces, statement.first_token, statement.last_token) {
            let inner = &braces[idx];
            if inner.contains(tokens, cursor) {
                erase_after_cursor(text, tokens, braces, inner, cursor, out);
            } else if tokens[inner.open].start() > cursor {
                blank(
                    out,
                    tokens[inner.open].end() as usize,
                    tokens[inner.close].start() as usize,
                );
            }
        }
    }
}

#[derive(Debug)]
struct Statement {
    /// Byte range of the statement, terminator included.
    start: u32,
    end: u32,
    /// Token index range, inclusive.
    first_token: usize,
    last_token: usize,
}

/// Splits the body of `block` into statements.
///
/// A statement runs to a `;` at nesting depth zero, or to the `}` of a
/// block it owns. A chained `}` (`else`, `catch`, `finally`, `while` of a
/// `do`) keeps the chain in one statement. `case` and `default` labels
/// end at their `:`.
fn statements(
    text: &str,
    tokens: &[Token],
    braces: &[Brace],
    block: &Brace,
) -> Vec<Statement> {
    let mut result = Vec::new();
    let mut depth = 0u32;
    let mut first: Option<usize> = None;
    let mut head = "";
    let mut i = block.open + 1;

    let mut finish = |first: &mut Option<usize>, last: usize| {
        if let Some(f) = first.take() {
            result.push(Statement {
                start: tokens[f].start(),
                end: tokens[last].end(),
                first_token: f,
                last_token: last,
            });
        }
    };

    while i < block.close {
        let token = &tokens[i];
        if token.kind.is_trivia() {
            i += 1;
            continue;
        }
        if first.is_none() {
            first = Some(i);
            head = token.text(text);
        }
        match token.kind {
            TokenKind::LParen | TokenKind::LBracket => depth += 1,
            TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
            TokenKind::Semicolon if depth == 0 => {
                finish(&mut first, i);
            }
            TokenKind::Colon if depth == 0 && matches!(head, "case" | "default") => {
                finish(&mut first, i);
            }
            TokenKind::LBrace => {
                // Jump over the owned block.
                let close = braces
                    .iter()
                    .find(|b| b.open == i)
                    .map(|b| b.close)
                    .unwrap_or(block.close);
                i = close;
                if i >= block.close {
                    break;
                }
                let continues = next_significant_text(text, tokens, i + 1, block.close)
                    .is_some_and(|word| {
                        matches!(word, "else" | "catch" | "finally")
                            || (word == "while" && head == "do")
                    });
                if !continues {
                    finish(&mut first, i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    // Dangling statement with no terminator (typically the edit in
    // progress at the cursor).
    if let Some(f) = first {
        let last = last_significant_before_idx(tokens, f, block.close);
        finish(&mut Some(f), last);
    }
    result
}

fn next_significant_text<'a>(
    text: &'a str,
    tokens: &[Token],
    from: usize,
    limit: usize,
) -> Option<&'a str> {
    tokens[from..limit]
        .iter()
        .find(|t| !t.kind.is_trivia())
        .map(|t| t.text(text))
}

/// Last non-trivia token index in `[from, limit)`, or `from` itself.
fn last_significant_before_idx(tokens: &[Token], from: usize, limit: usize) -> usize {
    (from..limit)
        .rev()
        .find(|&i| !tokens[i].kind.is_trivia())
        .unwrap_or(from)
}

/// Braces whose open token lies in `[first, last]` and which are not nested
/// inside another such brace.
fn top_level_braces(braces: &[Brace], first: usize, last: usize) -> Vec<usize> {
    let mut result: Vec<usize> = Vec::new();
    let mut skip_until = 0usize;
    for (idx, brace) in braces.iter().enumerate() {
        if brace.open < first || brace.open > last {
            continue;
        }
        if brace.open < skip_until {
            continue;
        }
        result.push(idx);
        skip_until = brace.close;
    }
    result
}

/// Replaces every byte in `[start, end)` with a space, preserving newlines.
fn blank(out: &mut [u8], start: usize, end: usize) {
    for byte in &mut out[start..end] {
        if *byte != b'\n' && *byte != b'\r' {
            *byte = b' ';
        }
    }
}

fn into_string(out: Vec<u8>) -> String {
    // Blanked spans align with token boundaries and replace whole bytes,
    // so the buffer stays valid UTF-8.
    String::from_utf8(out).expect("blanking preserves UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Collapse whitespace, the way the outputs are compared against
    /// hand-written erased fixtures.
    fn squash(text: &str) -> String {
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn assert_shape_preserved(original: &str, pruned: &str) {
        assert_eq!(original.len(), pruned.len());
        let newlines = |s: &str| -> Vec<usize> {
            s.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i)
                .collect()
        };
        assert_eq!(newlines(original), newlines(pruned));
    }

    #[test]
    fn prunes_other_method_bodies() {
        let original = "\
class PruneMethods {
    void prunedMethod() {
        int a = 1;
    }

    void unprunedMethod() {
        int b = 2;
    }
}
";
        // Cursor inside unprunedMethod's body.
        let pruned = prune(original, 6, 19);
        assert_shape_preserved(original, &pruned);
        let expected = "\
class PruneMethods {
    void prunedMethod() {
    }

    void unprunedMethod() {
        int b = 2;
    }
}
";
        assert_eq!(squash(&pruned), squash(expected));
    }

    #[test]
    fn prunes_statements_to_end_of_block() {
        let original = "\
class PruneToEndOfBlock {
    void test() {
        int before = 1;
        int after = 2;
        int last = 3;
    }
}
";
        // Cursor on the `int after` statement.
        let pruned = prune(original, 3, 18);
        assert_shape_preserved(original, &pruned);
        let expected = "\
class PruneToEndOfBlock {
    void test() {
        int before = 1;
        int after = 2;
    }
}
";
        assert_eq!(squash(&pruned), squash(expected));
    }

    #[test]
    fn prunes_middle_method_only() {
        let original = "\
class PruneMiddle {
    void first() {
        int a = 1;
    }
    void second() {
        int b = 2;
    }
    void third() {
        int c = 3;
    }
}
";
        let pruned = prune(original, 5, 12);
        assert_shape_preserved(original, &pruned);
        let expected = "\
class PruneMiddle {
    void first() {
    }
    void second() {
        int b = 2;
    }
    void third() {
    }
}
";
        assert_eq!(squash(&pruned), squash(expected));
    }

    #[test]
    fn keeps_receiver_of_dangling_member_access() {
        let original = "\
class PruneDot {
    void test() {
        value.
    }
}
";
        let pruned = prune(original, 2, 14);
        assert_shape_preserved(original, &pruned);
        assert!(pruned.contains("value."));
    }

    #[test]
    fn keeps_branch_containing_cursor_and_blanks_siblings() {
        let original = "\
class Branches {
    void test(boolean c) {
        if (c) {
            int here = 1;
        } else {
            int there = 2;
        }
    }
}
";
        let pruned = prune(original, 3, 24);
        assert_shape_preserved(original, &pruned);
        assert!(pruned.contains("int here = 1;"));
        assert!(!pruned.contains("int there = 2;"));
        assert!(pruned.contains("else"));
    }

    #[test]
    fn cursor_at_class_level_blanks_every_body(){
        let original = "\
class Outside {
    void a() {
        int x = 1;
    }
    int fie
    void b() {
        int y = 2;
    }
}
";
        let pruned = prune(original, 4, 11);
        assert_shape_preserved(original, &pruned);
        assert!(!pruned.contains("int x = 1;"));
        assert!(!pruned.contains("int y = 2;"));
        assert!(pruned.contains("int fie"));
        assert!(pruned.contains("void a()"));
    }

    #[test]
    fn word_prune_keeps_only_the_word() {
        let original = "\
class PruneWords {
    void test() {
        int word = other + word;
    }
}
";
        let pruned = prune_word(original, "word");
        assert_shape_preserved(original, &pruned);
        assert_eq!(squash(&pruned), "word word");
    }

    #[test]
    fn pruned_output_length_is_stable_for_multibyte_text() {
        let original = "\
class Unicode {
    void a() {
        String s = \"héllo wörld\";
    }
    void b() {
        int x = 1;
    }
}
";
        let pruned = prune(original, 5, 12);
        assert_eq!(original.len(), pruned.len());
        assert!(!pruned.contains("héllo"));
    }
}
