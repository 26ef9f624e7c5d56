//! Lexical analysis: turns the raw input string into a vector of tokens.
//!
//! The tokenizer knows nothing about the grammar beyond classifying words,
//! numbers, quoted literals, operators and punctuation. Two-character
//! operators are matched before single-character ones (maximal munch).
//! Characters outside the alphabet are dropped in lenient mode and recorded,
//! or rejected in strict mode.

use std::fmt;

use tracing::{debug, warn};

use crate::error::{CompileError, CompileResult, LiteralKind, Position};

const KEYWORDS: [&str; 5] = ["if", "else", "while", "for", "return"];
const TWO_CHAR_OPERATORS: [&str; 6] = ["==", "!=", "<=", ">=", "&&", "||"];
const ONE_CHAR_OPERATORS: [char; 7] = ['+', '-', '*', '/', '=', '<', '>'];
const SYMBOLS: [char; 6] = ['(', ')', '{', '}', ';', ','];

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Keyword,
  Identifier,
  Literal,
  Operator,
  Symbol,
  StringLit,
  CharLit,
}

impl fmt::Display for TokenKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TokenKind::Keyword => "Keyword",
      TokenKind::Identifier => "Identifier",
      TokenKind::Literal => "Literal",
      TokenKind::Operator => "Operator",
      TokenKind::Symbol => "Symbol",
      TokenKind::StringLit => "StringLit",
      TokenKind::CharLit => "CharLit",
    };
    f.write_str(name)
  }
}

/// A classified lexeme and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
  pub kind: TokenKind,
  pub lexeme: String,
  pub pos: Position,
}

impl Token {
  pub fn new(kind: TokenKind, lexeme: impl Into<String>, pos: Position) -> Self {
    Self {
      kind,
      lexeme: lexeme.into(),
      pos,
    }
  }

  /// True for an `Operator` or `Symbol` token spelled exactly `text`.
  pub fn is_punct(&self, text: &str) -> bool {
    matches!(self.kind, TokenKind::Operator | TokenKind::Symbol) && self.lexeme == text
  }
}

impl fmt::Display for Token {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}({}) at {}", self.kind, self.lexeme, self.pos)
  }
}

/// How to treat characters that start no token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexMode {
  /// Drop the character and record it in `Lexed::skipped`.
  #[default]
  Lenient,
  /// Fail with `LexIllegalCharacter`.
  Strict,
}

/// A character dropped in lenient mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedChar {
  pub ch: char,
  pub pos: Position,
}

/// Output of a lexing pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
  pub tokens: Vec<Token>,
  pub skipped: Vec<SkippedChar>,
}

/// Lex leniently, discarding the skipped-character diagnostics.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  tokenize_with(input, LexMode::Lenient).map(|lexed| lexed.tokens)
}

/// Lex the whole input into tokens in source order.
pub fn tokenize_with(input: &str, mode: LexMode) -> CompileResult<Lexed> {
  let mut cursor = Cursor::new(input);
  let mut lexed = Lexed::default();

  while let Some(c) = cursor.peek() {
    if c.is_whitespace() {
      cursor.bump();
      continue;
    }

    let start = cursor.pos();

    if c.is_alphabetic() || c == '_' {
      let word = cursor.eat_while(|c| c.is_alphanumeric() || c == '_');
      let kind = if KEYWORDS.contains(&word) {
        TokenKind::Keyword
      } else {
        TokenKind::Identifier
      };
      lexed.tokens.push(Token::new(kind, word, start));
      continue;
    }

    if c.is_ascii_digit() {
      let digits = cursor.eat_while(|c| c.is_ascii_digit());
      lexed
        .tokens
        .push(Token::new(TokenKind::Literal, digits, start));
      continue;
    }

    if c == '"' {
      cursor.bump();
      let text = cursor.eat_while(|c| c != '"');
      if cursor.bump().is_none() {
        return Err(CompileError::LexUnterminatedLiteral {
          kind: LiteralKind::String,
          position: start,
        });
      }
      lexed
        .tokens
        .push(Token::new(TokenKind::StringLit, text, start));
      continue;
    }

    if c == '\'' {
      cursor.bump();
      let value = cursor.bump();
      let (Some(value), Some('\'')) = (value, cursor.bump()) else {
        return Err(CompileError::LexUnterminatedLiteral {
          kind: LiteralKind::Char,
          position: start,
        });
      };
      lexed
        .tokens
        .push(Token::new(TokenKind::CharLit, value.to_string(), start));
      continue;
    }

    if let Some(op) = TWO_CHAR_OPERATORS
      .into_iter()
      .find(|op| cursor.rest().starts_with(op))
    {
      cursor.bump();
      cursor.bump();
      lexed.tokens.push(Token::new(TokenKind::Operator, op, start));
      continue;
    }

    if ONE_CHAR_OPERATORS.contains(&c) || SYMBOLS.contains(&c) {
      let kind = if SYMBOLS.contains(&c) {
        TokenKind::Symbol
      } else {
        TokenKind::Operator
      };
      cursor.bump();
      lexed.tokens.push(Token::new(kind, c.to_string(), start));
      continue;
    }

    match mode {
      LexMode::Strict => {
        return Err(CompileError::LexIllegalCharacter {
          ch: c,
          position: start,
        });
      }
      LexMode::Lenient => {
        warn!(ch = %c.escape_debug(), position = %start, "skipping unrecognized character");
        cursor.bump();
        lexed.skipped.push(SkippedChar { ch: c, pos: start });
      }
    }
  }

  debug!(
    tokens = lexed.tokens.len(),
    skipped = lexed.skipped.len(),
    "tokenized source"
  );
  Ok(lexed)
}

/// Character cursor that keeps line/column in step with the byte offset.
struct Cursor<'a> {
  input: &'a str,
  offset: usize,
  line: usize,
  column: usize,
}

impl<'a> Cursor<'a> {
  fn new(input: &'a str) -> Self {
    Self {
      input,
      offset: 0,
      line: 1,
      column: 1,
    }
  }

  fn pos(&self) -> Position {
    Position::new(self.line, self.column)
  }

  fn rest(&self) -> &'a str {
    &self.input[self.offset..]
  }

  fn peek(&self) -> Option<char> {
    self.rest().chars().next()
  }

  /// Consume one character. A newline starts the next line at column 1.
  fn bump(&mut self) -> Option<char> {
    let c = self.peek()?;
    self.offset += c.len_utf8();
    if c == '\n' {
      self.line += 1;
      self.column = 1;
    } else {
      self.column += 1;
    }
    Some(c)
  }

  /// Consume the longest run matching `pred` and return it as a slice.
  fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
    let start = self.offset;
    while let Some(c) = self.peek() {
      if !pred(c) {
        break;
      }
      self.bump();
    }
    &self.input[start..self.offset]
  }
}
