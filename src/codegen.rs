//! Intermediate code generation: lower the AST into three-address code.
//!
//! Lowering is a post-order walk. Leaves yield their text as an operand,
//! each `BinaryOp` gets a fresh temporary `t{n}` once both sides are lowered,
//! and the assignment copies the final operand into its target. Instruction
//! order is therefore evaluation order.

use std::fmt;

use tracing::{debug, trace};

use crate::ast::Ast;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
  /// `dest = src`
  Copy { dest: String, src: String },
  /// `dest = lhs op rhs`
  Binary {
    dest: String,
    lhs: String,
    op: String,
    rhs: String,
  },
}

impl Instruction {
  pub fn dest(&self) -> &str {
    match self {
      Instruction::Copy { dest, .. } | Instruction::Binary { dest, .. } => dest,
    }
  }
}

impl fmt::Display for Instruction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Instruction::Copy { dest, src } => write!(f, "{dest} = {src}"),
      Instruction::Binary { dest, lhs, op, rhs } => write!(f, "{dest} = {lhs} {op} {rhs}"),
    }
  }
}

/// An ordered three-address program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tac {
  pub instructions: Vec<Instruction>,
}

impl Tac {
  pub fn len(&self) -> usize {
    self.instructions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.instructions.is_empty()
  }

  /// Instructions rendered as text, one per entry.
  pub fn lines(&self) -> Vec<String> {
    self.instructions.iter().map(ToString::to_string).collect()
  }
}

/// One instruction per line.
impl fmt::Display for Tac {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for instr in &self.instructions {
      writeln!(f, "{instr}")?;
    }
    Ok(())
  }
}

/// Stateful generator. The temporary counter and the instruction buffer
/// persist across `generate` calls on the same instance; use a fresh
/// generator for an independent pass.
#[derive(Debug, Default)]
pub struct IntermediateGenerator {
  temp_count: usize,
  code: Vec<Instruction>,
}

impl IntermediateGenerator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Lower `root`, appending its instructions, and return the operand that
  /// holds its value.
  ///
  /// Walks the tree in post order with an operand stack, so operator chains
  /// of any length are lowered without recursion.
  pub fn generate(&mut self, root: &Ast) -> String {
    let mut operands: Vec<String> = Vec::new();
    for node in root.post_order() {
      let operand = match node {
        Ast::Literal { value } => value.clone(),
        Ast::Identifier { name } => name.clone(),
        Ast::BinaryOp { operator, .. } => {
          let rhs = operands.pop().unwrap_or_default();
          let lhs = operands.pop().unwrap_or_default();
          let dest = self.new_temp();
          self.emit(Instruction::Binary {
            dest: dest.clone(),
            lhs,
            op: operator.clone(),
            rhs,
          });
          dest
        }
        Ast::Assignment { target, .. } => {
          let src = operands.pop().unwrap_or_default();
          self.emit(Instruction::Copy {
            dest: target.clone(),
            src,
          });
          target.clone()
        }
      };
      operands.push(operand);
    }
    operands.pop().unwrap_or_default()
  }

  pub fn instructions(&self) -> &[Instruction] {
    &self.code
  }

  /// Temporaries allocated so far.
  pub fn temp_count(&self) -> usize {
    self.temp_count
  }

  pub fn into_program(self) -> Tac {
    Tac {
      instructions: self.code,
    }
  }

  fn new_temp(&mut self) -> String {
    let temp = format!("t{}", self.temp_count);
    self.temp_count += 1;
    temp
  }

  fn emit(&mut self, instr: Instruction) {
    trace!(%instr, "emit");
    self.code.push(instr);
  }
}

/// Lower a tree with a fresh generator.
pub fn generate(ast: &Ast) -> Tac {
  let mut generator = IntermediateGenerator::new();
  let result = generator.generate(ast);
  debug!(
    instructions = generator.instructions().len(),
    temps = generator.temp_count(),
    %result,
    "generated three-address code"
  );
  generator.into_program()
}
