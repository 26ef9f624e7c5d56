//! Crate root: wires together the compilation pipeline.
//!
//! The stages are small and strictly sequential:
//! - `tokenizer` performs lexical analysis and produces a flat token vector.
//! - `parser` consumes the tokens and returns one assignment AST.
//! - `codegen` lowers the AST into three-address code.
//! - `error` holds the error taxonomy and diagnostic rendering.

pub mod ast;
pub mod codegen;
pub mod error;
pub mod parser;
pub mod tokenizer;

use tracing::warn;

pub use ast::Ast;
pub use codegen::{Instruction, IntermediateGenerator, Tac};
pub use error::{CompileError, CompileResult, Location, Position};
pub use tokenizer::{LexMode, SkippedChar, Token, TokenKind};

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
  pub lex_mode: LexMode,
}

/// Everything the pipeline produced for one source text.
#[derive(Debug, Clone)]
pub struct Compilation {
  pub tokens: Vec<Token>,
  pub skipped: Vec<SkippedChar>,
  pub ast: Ast,
  pub tac: Tac,
}

/// Tokenize, parse and lower a source string.
pub fn compile(source: &str, options: &Options) -> CompileResult<Compilation> {
  let lexed = tokenizer::tokenize_with(source, options.lex_mode)?;

  let mut parser = parser::Parser::new(&lexed.tokens);
  let ast = parser.parse_assignment()?;
  let remaining = parser.remaining();
  if remaining > 0 {
    warn!(remaining, "ignoring tokens after the assignment");
  }

  let tac = codegen::generate(&ast);
  Ok(Compilation {
    tokens: lexed.tokens,
    skipped: lexed.skipped,
    ast,
    tac,
  })
}
