//! Shared error utilities used across the compilation pipeline.
//!
//! Every stage reports failures as a `CompileError` carrying the position of
//! the offending input where one exists. `render` formats a diagnostic as the
//! offending source line with a caret under the reported column.

use std::fmt;

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

/// A 1-based line/column pair in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
  pub line: usize,
  pub column: usize,
}

impl Position {
  pub fn new(line: usize, column: usize) -> Self {
    Self { line, column }
  }
}

impl fmt::Display for Position {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.column)
  }
}

/// Where a parse error was detected: at a token, or after the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
  Source(Position),
  EndOfInput,
}

impl fmt::Display for Location {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Location::Source(pos) => write!(f, "{pos}"),
      Location::EndOfInput => f.write_str("end of input"),
    }
  }
}

/// Literal flavours that need a closing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
  String,
  Char,
}

impl fmt::Display for LiteralKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      LiteralKind::String => f.write_str("string"),
      LiteralKind::Char => f.write_str("char"),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
  #[snafu(display("illegal character '{ch}' at {position}"))]
  LexIllegalCharacter { ch: char, position: Position },

  #[snafu(display("unterminated {kind} literal starting at {position}"))]
  LexUnterminatedLiteral {
    kind: LiteralKind,
    position: Position,
  },

  #[snafu(display("expected an identifier, but got \"{found}\" at {location}"))]
  ParseExpectedIdentifier { found: String, location: Location },

  #[snafu(display("expected \"=\", but got \"{found}\" at {location}"))]
  ParseExpectedAssignOp { found: String, location: Location },

  #[snafu(display("expected a literal or identifier, but got \"{found}\" at {location}"))]
  ParseExpectedOperand { found: String, location: Location },

  #[snafu(display("unexpected end of input, expected {expected}"))]
  ParseUnexpectedEndOfInput { expected: &'static str },
}

impl CompileError {
  /// Source position of the failure, if it points at actual input.
  pub fn position(&self) -> Option<Position> {
    match self {
      Self::LexIllegalCharacter { position, .. }
      | Self::LexUnterminatedLiteral { position, .. } => Some(*position),
      Self::ParseExpectedIdentifier { location, .. }
      | Self::ParseExpectedAssignOp { location, .. }
      | Self::ParseExpectedOperand { location, .. } => match location {
        Location::Source(pos) => Some(*pos),
        Location::EndOfInput => None,
      },
      Self::ParseUnexpectedEndOfInput { .. } => None,
    }
  }

  /// Format the error against its source: the offending line, then a caret
  /// under the reported column followed by the message. Errors without a
  /// position point just past the end of the last line.
  pub fn render(&self, source: &str) -> String {
    let (line_no, column) = match self.position() {
      Some(pos) => (pos.line, pos.column),
      None => {
        let last = source.lines().count().max(1);
        let width = source.lines().last().map_or(0, |l| l.chars().count());
        (last, width + 1)
      }
    };
    let line = source.lines().nth(line_no - 1).unwrap_or("");
    let marker = format!("{}^", " ".repeat(column.saturating_sub(1)));
    format!("{line}\n{marker} {self}")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn render_points_at_column() {
    let err = CompileError::LexIllegalCharacter {
      ch: '@',
      position: Position::new(2, 3),
    };
    let rendered = err.render("x = 1\ny @= 2");
    assert_eq!(rendered, "y @= 2\n  ^ illegal character '@' at 2:3");
  }

  #[test]
  fn render_end_of_input_points_past_last_line() {
    let err = CompileError::ParseUnexpectedEndOfInput {
      expected: "a literal or identifier",
    };
    let rendered = err.render("y = x +");
    assert_eq!(
      rendered,
      "y = x +\n       ^ unexpected end of input, expected a literal or identifier"
    );
  }

  #[test]
  fn end_of_input_has_no_position() {
    let err = CompileError::ParseExpectedIdentifier {
      found: "end of input".to_string(),
      location: Location::EndOfInput,
    };
    assert_eq!(err.position(), None);
    assert_eq!(
      err.to_string(),
      "expected an identifier, but got \"end of input\" at end of input"
    );
  }
}
