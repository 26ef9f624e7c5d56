//! Recursive-descent parser producing a single assignment AST.
//!
//! The grammar has no precedence levels and no parentheses:
//!
//! ```text
//! assignment := IDENTIFIER "=" expression [";"]
//! expression := primary ( OPERATOR primary )*
//! primary    := LITERAL | IDENTIFIER
//! ```
//!
//! Every operator binds equally, so `x + 2 * 5` folds left into `(x + 2) * 5`.

use tracing::debug;

use crate::ast::Ast;
use crate::error::{CompileError, CompileResult, Location};
use crate::tokenizer::{Token, TokenKind};

/// Parse one assignment, ignoring any tokens after it.
pub fn parse_assignment(tokens: &[Token]) -> CompileResult<Ast> {
  Parser::new(tokens).parse_assignment()
}

/// Parser over a fully materialized token slice.
pub struct Parser<'a> {
  stream: TokenStream<'a>,
}

impl<'a> Parser<'a> {
  pub fn new(tokens: &'a [Token]) -> Self {
    Self {
      stream: TokenStream::new(tokens),
    }
  }

  /// `IDENTIFIER "=" expression [";"]`
  pub fn parse_assignment(&mut self) -> CompileResult<Ast> {
    let stream = &mut self.stream;

    let target = match stream.peek() {
      Some(token) if token.kind == TokenKind::Identifier => token.lexeme.clone(),
      other => {
        return Err(CompileError::ParseExpectedIdentifier {
          found: describe_token(other),
          location: location_of(other),
        });
      }
    };
    stream.advance();

    if !stream.equal("=") {
      let current = stream.peek();
      return Err(CompileError::ParseExpectedAssignOp {
        found: describe_token(current),
        location: location_of(current),
      });
    }

    let expression = parse_expression(stream)?;

    // The terminator is optional.
    stream.equal(";");

    let ast = Ast::assignment(target, expression);
    debug!(
      binary_ops = ast.binary_op_count(),
      remaining = stream.remaining(),
      "parsed assignment"
    );
    Ok(ast)
  }

  /// Tokens not consumed so far.
  pub fn remaining(&self) -> usize {
    self.stream.remaining()
  }
}

fn parse_expression(stream: &mut TokenStream) -> CompileResult<Ast> {
  let mut node = parse_primary(stream)?;

  while let Some(token) = stream.peek()
    && token.kind == TokenKind::Operator
  {
    let operator = token.lexeme.clone();
    stream.advance();
    let rhs = parse_primary(stream)?;
    node = Ast::binary(operator, node, rhs);
  }

  Ok(node)
}

fn parse_primary(stream: &mut TokenStream) -> CompileResult<Ast> {
  let Some(token) = stream.peek() else {
    return Err(CompileError::ParseUnexpectedEndOfInput {
      expected: "a literal or identifier",
    });
  };

  let node = match token.kind {
    TokenKind::Literal => Ast::literal(token.lexeme.clone()),
    TokenKind::Identifier => Ast::identifier(token.lexeme.clone()),
    _ => {
      return Err(CompileError::ParseExpectedOperand {
        found: describe_token(Some(token)),
        location: Location::Source(token.pos),
      });
    }
  };
  stream.advance();
  Ok(node)
}

/// Human-friendly description used in diagnostics, e.g. `StringLit(=)`.
fn describe_token(token: Option<&Token>) -> String {
  match token {
    Some(t) => format!("{}({})", t.kind, t.lexeme),
    None => "end of input".to_string(),
  }
}

fn location_of(token: Option<&Token>) -> Location {
  match token {
    Some(t) => Location::Source(t.pos),
    None => Location::EndOfInput,
  }
}

/// Lightweight cursor over the token slice.
struct TokenStream<'a> {
  tokens: &'a [Token],
  pos: usize,
}

impl<'a> TokenStream<'a> {
  fn new(tokens: &'a [Token]) -> Self {
    Self { tokens, pos: 0 }
  }

  fn peek(&self) -> Option<&'a Token> {
    self.tokens.get(self.pos)
  }

  fn advance(&mut self) {
    if self.pos < self.tokens.len() {
      self.pos += 1;
    }
  }

  /// Consume the current token if it is the operator or symbol `text`.
  fn equal(&mut self, text: &str) -> bool {
    if let Some(token) = self.peek()
      && token.is_punct(text)
    {
      self.pos += 1;
      return true;
    }
    false
  }

  fn remaining(&self) -> usize {
    self.tokens.len() - self.pos
  }
}
