//! The partial expression grammar.
//!
//! The type checker in `javelin-ide` reasons about a deliberately small
//! expression language: identifiers, member selects, invocations, array
//! accesses, conditionals and parentheses. Everything else is `Opaque`,
//! still carried in the tree so a caller can resolve it through the full
//! compiler and feed the result back in.
//!
//! `expression_ending_at` recovers the largest such expression ending at a
//! byte offset, which is exactly what member completion needs: the
//! receiver chain to the left of the cursor.

use javelin_core::{Name, TextRange};

use crate::lexer::lex;
use crate::token::{Token, TokenKind};

/// Discriminant of [`PartialExpr`], used to match a retained type back to
/// the subtree it was computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprKind {
    Identifier,
    Select,
    Invoke,
    Index,
    Conditional,
    Paren,
    Opaque,
}

/// An expression in the partial grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialExpr {
    /// A bare name, including the `this` and `super` pseudo-variables.
    Identifier { name: Name, range: TextRange },
    /// `receiver.name`.
    Select {
        receiver: Box<PartialExpr>,
        name: Name,
        range: TextRange,
    },
    /// `select(args...)`, where `select` is an identifier or member select.
    Invoke {
        select: Box<PartialExpr>,
        args: Vec<PartialExpr>,
        range: TextRange,
    },
    /// `receiver[...]`.
    Index {
        receiver: Box<PartialExpr>,
        range: TextRange,
    },
    /// `cond ? then : otherwise`. The condition does not influence the
    /// type, so only the branches are kept.
    Conditional {
        then: Box<PartialExpr>,
        otherwise: Box<PartialExpr>,
        range: TextRange,
    },
    /// `(inner)`.
    Paren {
        inner: Box<PartialExpr>,
        range: TextRange,
    },
    /// Anything outside the grammar: literals, object creation, operators.
    Opaque {
        description: &'static str,
        range: TextRange,
    },
}

impl PartialExpr {
    pub fn kind(&self) -> ExprKind {
        match self {
            PartialExpr::Identifier { .. } => ExprKind::Identifier,
            PartialExpr::Select { .. } => ExprKind::Select,
            PartialExpr::Invoke { .. } => ExprKind::Invoke,
            PartialExpr::Index { .. } => ExprKind::Index,
            PartialExpr::Conditional { .. } => ExprKind::Conditional,
            PartialExpr::Paren { .. } => ExprKind::Paren,
            PartialExpr::Opaque { .. } => ExprKind::Opaque,
        }
    }

    pub fn range(&self) -> TextRange {
        match self {
            PartialExpr::Identifier { range, .. }
            | PartialExpr::Select { range, .. }
            | PartialExpr::Invoke { range, .. }
            | PartialExpr::Index { range, .. }
            | PartialExpr::Conditional { range, .. }
            | PartialExpr::Paren { range, .. }
            | PartialExpr::Opaque { range, .. } => *range,
        }
    }
}

/// Parses the largest grammar expression ending at byte offset `end`.
pub fn expression_ending_at(text: &str, end: u32) -> Option<PartialExpr> {
    let tokens: Vec<Token> = lex(text)
        .into_iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .collect();
    let last = tokens.iter().rposition(|t| t.end() <= end)?;
    let first = chain_start(text, &tokens, last);
    let mut parser = Parser {
        text,
        tokens: &tokens[first..=last],
        pos: 0,
    };
    let expr = parser.parse_expr();
    // The chain scan can overshoot on malformed input; only trust a parse
    // that consumed the whole chain.
    if parser.pos == parser.tokens.len() {
        Some(expr)
    } else {
        None
    }
}

/// Parses the receiver chain of a member access whose `.`/`::` lies just
/// before `offset`, skipping the separator itself.
pub fn receiver_before(text: &str, offset: u32) -> Option<PartialExpr> {
    let tokens = lex(text);
    let separator = tokens
        .iter()
        .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Eof)
        .take_while(|t| t.end() <= offset)
        .last()?;
    match separator.kind {
        TokenKind::Dot | TokenKind::DoubleColon => expression_ending_at(text, separator.start()),
        _ => None,
    }
}

/// Walks backwards from `last` over one postfix chain and returns the index
/// of its first token.
fn chain_start(text: &str, tokens: &[Token], last: usize) -> usize {
    let mut i = last;
    loop {
        // Consume one postfix unit ending at `i`.
        let unit_is_group = match tokens[i].kind {
            TokenKind::RParen => {
                match match_backwards(tokens, i, TokenKind::LParen, TokenKind::RParen) {
                    Some(open) => {
                        i = open;
                        true
                    }
                    None => return i + 1,
                }
            }
            TokenKind::RBracket => {
                match match_backwards(tokens, i, TokenKind::LBracket, TokenKind::RBracket) {
                    Some(open) => {
                        i = open;
                        true
                    }
                    None => return i + 1,
                }
            }
            TokenKind::Identifier
            | TokenKind::StringLiteral
            | TokenKind::TextBlock
            | TokenKind::CharLiteral
            | TokenKind::NumberLiteral => false,
            TokenKind::Keyword => false,
            _ => return i + 1,
        };

        if i == 0 {
            return 0;
        }
        let prev = &tokens[i - 1];
        if unit_is_group {
            // `f(...)`, `a[...]`, `g()(...)`: the group attaches to whatever
            // completes the postfix expression before it.
            match prev.kind {
                TokenKind::Identifier
                | TokenKind::Keyword
                | TokenKind::RParen
                | TokenKind::RBracket => {
                    i -= 1;
                    continue;
                }
                TokenKind::Dot | TokenKind::DoubleColon => {
                    if i < 2 {
                        return i;
                    }
                    i -= 2;
                    continue;
                }
                _ => return i,
            }
        }
        match prev.kind {
            TokenKind::Dot | TokenKind::DoubleColon => {
                if i < 2 {
                    return i;
                }
                i -= 2;
                continue;
            }
            // `new Foo` keeps the keyword with the chain. Any other
            // keyword (`return`, `case`, ...) precedes the expression.
            TokenKind::Keyword if prev.text(text) == "new" => {
                i -= 1;
                continue;
            }
            _ => return i,
        }
    }
}

/// Finds the opener matching the closer at `close`, scanning backwards.
fn match_backwards(
    tokens: &[Token],
    close: usize,
    open_kind: TokenKind,
    close_kind: TokenKind,
) -> Option<usize> {
    let mut depth = 0u32;
    for i in (0..=close).rev() {
        let kind = tokens[i].kind;
        if kind == close_kind {
            depth += 1;
        } else if kind == open_kind {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

struct Parser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> &Token {
        let token = &self.tokens[self.pos];
        self.pos += 1;
        token
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn parse_expr(&mut self) -> PartialExpr {
        let lhs = self.parse_postfix();
        if self.at(TokenKind::Question) {
            self.bump();
            let then = self.parse_expr();
            if self.at(TokenKind::Colon) {
                self.bump();
            }
            let otherwise = self.parse_expr();
            let range = TextRange::new(lhs.range().start(), otherwise.range().end());
            return PartialExpr::Conditional {
                then: Box::new(then),
                otherwise: Box::new(otherwise),
                range,
            };
        }
        // A binary operator takes the whole expression out of the grammar.
        if self
            .peek()
            .is_some_and(|t| matches!(t.kind, TokenKind::Operator | TokenKind::Arrow))
        {
            let start = lhs.range().start();
            let end = self.swallow_operand_tail();
            return PartialExpr::Opaque {
                description: "operator expression",
                range: TextRange::new(start, end),
            };
        }
        lhs
    }

    /// Consumes to the end of the current operand (a comma, closing
    /// delimiter or colon at depth zero), returning the last byte consumed.
    fn swallow_operand_tail(&mut self) -> u32 {
        let mut depth = 0u32;
        let mut end = self.tokens[self.pos.saturating_sub(1)].end();
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Comma | TokenKind::Colon if depth == 0 => break,
                _ => {}
            }
            end = self.bump().end();
        }
        end
    }

    fn parse_postfix(&mut self) -> PartialExpr {
        let mut expr = self.parse_primary();
        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::Dot) => {
                    self.bump();
                    let (name, end) = match self.peek().map(|t| t.kind) {
                        Some(TokenKind::Identifier) | Some(TokenKind::Keyword) => {
                            let token = *self.bump();
                            (Name::new(token.text(self.text)), token.end())
                        }
                        _ => break,
                    };
                    let range = TextRange::new(expr.range().start(), end);
                    expr = PartialExpr::Select {
                        receiver: Box::new(expr),
                        name,
                        range,
                    };
                }
                Some(TokenKind::LParen) => {
                    let (args, end) = self.parse_args();
                    let range = TextRange::new(expr.range().start(), end);
                    expr = PartialExpr::Invoke {
                        select: Box::new(expr),
                        args,
                        range,
                    };
                }
                Some(TokenKind::LBracket) => {
                    self.bump();
                    if !self.at(TokenKind::RBracket) {
                        let _index = self.parse_expr();
                    }
                    let end = if self.at(TokenKind::RBracket) {
                        self.bump().end()
                    } else {
                        expr.range().end()
                    };
                    let range = TextRange::new(expr.range().start(), end);
                    expr = PartialExpr::Index {
                        receiver: Box::new(expr),
                        range,
                    };
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_args(&mut self) -> (Vec<PartialExpr>, u32) {
        let open = self.bump(); // (
        let mut args = Vec::new();
        let mut end = open.end();
        loop {
            match self.peek().map(|t| t.kind) {
                None => break,
                Some(TokenKind::RParen) => {
                    end = self.bump().end();
                    break;
                }
                Some(TokenKind::Comma) => {
                    end = self.bump().end();
                }
                Some(_) => {
                    let arg = self.parse_expr();
                    end = arg.range().end();
                    args.push(arg);
                }
            }
        }
        (args, end)
    }

    fn parse_primary(&mut self) -> PartialExpr {
        let Some(token) = self.peek() else {
            return PartialExpr::Opaque {
                description: "empty expression",
                range: TextRange::empty(0),
            };
        };
        let token = *token;
        match token.kind {
            TokenKind::Identifier => {
                self.bump();
                PartialExpr::Identifier {
                    name: Name::new(token.text(self.text)),
                    range: token.range,
                }
            }
            TokenKind::Keyword => {
                let text = token.text(self.text);
                match text {
                    // `this`/`super` resolve through the scope like any
                    // other identifier.
                    "this" | "super" => {
                        self.bump();
                        PartialExpr::Identifier {
                            name: Name::new(text),
                            range: token.range,
                        }
                    }
                    "new" => self.parse_object_creation(),
                    _ => {
                        self.bump();
                        PartialExpr::Opaque {
                            description: "keyword",
                            range: token.range,
                        }
                    }
                }
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_expr();
                let end = if self.at(TokenKind::RParen) {
                    self.bump().end()
                } else {
                    inner.range().end()
                };
                PartialExpr::Paren {
                    inner: Box::new(inner),
                    range: TextRange::new(token.start(), end),
                }
            }
            TokenKind::StringLiteral | TokenKind::TextBlock => {
                self.bump();
                PartialExpr::Opaque {
                    description: "string literal",
                    range: token.range,
                }
            }
            TokenKind::CharLiteral => {
                self.bump();
                PartialExpr::Opaque {
                    description: "char literal",
                    range: token.range,
                }
            }
            TokenKind::NumberLiteral => {
                self.bump();
                PartialExpr::Opaque {
                    description: "number literal",
                    range: token.range,
                }
            }
            _ => {
                self.bump();
                PartialExpr::Opaque {
                    description: "unsupported construct",
                    range: token.range,
                }
            }
        }
    }

    /// `new Foo(...)`, `new a.b.Foo(...)`, `new int[...]`: all opaque.
    fn parse_object_creation(&mut self) -> PartialExpr {
        let start = self.bump().start(); // new
        let mut end = start;
        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Identifier | TokenKind::Keyword | TokenKind::Dot => {
                    end = self.bump().end();
                }
                _ => break,
            }
        }
        if self.at(TokenKind::LParen) {
            let (_, args_end) = self.parse_args();
            end = args_end;
        } else if self.at(TokenKind::LBracket) {
            self.bump();
            if !self.at(TokenKind::RBracket) {
                let _ = self.parse_expr();
            }
            if self.at(TokenKind::RBracket) {
                end = self.bump().end();
            }
        }
        PartialExpr::Opaque {
            description: "object creation",
            range: TextRange::new(start, end),
        }
    }
}
