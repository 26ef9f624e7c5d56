//! Syntax tree produced by the parser.
//!
//! Nodes are plain data. Every child is boxed and owned by its parent, so a
//! tree has no sharing and no cycles.
//!
//! Operator chains fold left, so tree depth grows with the number of
//! operators. Every walk over the tree (including `Clone`, `PartialEq`,
//! formatting and `Drop`) uses an explicit stack instead of recursion.

use std::fmt;
use std::mem;

pub enum Ast {
  Literal {
    value: String,
  },
  Identifier {
    name: String,
  },
  BinaryOp {
    operator: String,
    left: Box<Ast>,
    right: Box<Ast>,
  },
  Assignment {
    target: String,
    expression: Box<Ast>,
  },
}

impl Ast {
  pub fn literal(value: impl Into<String>) -> Self {
    Self::Literal {
      value: value.into(),
    }
  }

  pub fn identifier(name: impl Into<String>) -> Self {
    Self::Identifier { name: name.into() }
  }

  pub fn binary(operator: impl Into<String>, left: Ast, right: Ast) -> Self {
    Self::BinaryOp {
      operator: operator.into(),
      left: Box::new(left),
      right: Box::new(right),
    }
  }

  pub fn assignment(target: impl Into<String>, expression: Ast) -> Self {
    Self::Assignment {
      target: target.into(),
      expression: Box::new(expression),
    }
  }

  /// Number of `BinaryOp` nodes in this tree.
  pub fn binary_op_count(&self) -> usize {
    self
      .post_order()
      .into_iter()
      .filter(|node| matches!(node, Ast::BinaryOp { .. }))
      .count()
  }

  /// Nodes with children before parents and left before right.
  pub fn post_order(&self) -> Vec<&Ast> {
    let mut order = Vec::new();
    let mut work = vec![(self, false)];
    while let Some((node, expanded)) = work.pop() {
      if expanded {
        order.push(node);
        continue;
      }
      work.push((node, true));
      match node {
        Ast::Literal { .. } | Ast::Identifier { .. } => {}
        Ast::BinaryOp { left, right, .. } => {
          work.push((&**right, false));
          work.push((&**left, false));
        }
        Ast::Assignment { expression, .. } => work.push((&**expression, false)),
      }
    }
    order
  }

  fn placeholder() -> Box<Ast> {
    Box::new(Ast::Literal {
      value: String::new(),
    })
  }

  /// Move this node's children into `out`, leaving empty leaves behind.
  fn detach_children(&mut self, out: &mut Vec<Box<Ast>>) {
    match self {
      Ast::Literal { .. } | Ast::Identifier { .. } => {}
      Ast::BinaryOp { left, right, .. } => {
        out.push(mem::replace(left, Ast::placeholder()));
        out.push(mem::replace(right, Ast::placeholder()));
      }
      Ast::Assignment { expression, .. } => {
        out.push(mem::replace(expression, Ast::placeholder()));
      }
    }
  }
}

impl Drop for Ast {
  fn drop(&mut self) {
    let mut pending = Vec::new();
    self.detach_children(&mut pending);
    while let Some(mut node) = pending.pop() {
      node.detach_children(&mut pending);
    }
  }
}

impl Clone for Ast {
  fn clone(&self) -> Self {
    let mut built: Vec<Ast> = Vec::new();
    for node in self.post_order() {
      let copy = match node {
        Ast::Literal { value } => Ast::literal(value.clone()),
        Ast::Identifier { name } => Ast::identifier(name.clone()),
        Ast::BinaryOp { operator, .. } => {
          let right = built.pop().unwrap_or_else(|| *Ast::placeholder());
          let left = built.pop().unwrap_or_else(|| *Ast::placeholder());
          Ast::binary(operator.clone(), left, right)
        }
        Ast::Assignment { target, .. } => {
          let expression = built.pop().unwrap_or_else(|| *Ast::placeholder());
          Ast::assignment(target.clone(), expression)
        }
      };
      built.push(copy);
    }
    built.pop().unwrap_or_else(|| *Ast::placeholder())
  }
}

impl PartialEq for Ast {
  fn eq(&self, other: &Self) -> bool {
    let mut pairs = vec![(self, other)];
    while let Some(pair) = pairs.pop() {
      match pair {
        (Ast::Literal { value: a }, Ast::Literal { value: b })
        | (Ast::Identifier { name: a }, Ast::Identifier { name: b }) => {
          if a != b {
            return false;
          }
        }
        (
          Ast::BinaryOp {
            operator: op_a,
            left: left_a,
            right: right_a,
          },
          Ast::BinaryOp {
            operator: op_b,
            left: left_b,
            right: right_b,
          },
        ) => {
          if op_a != op_b {
            return false;
          }
          pairs.push((&**left_a, &**left_b));
          pairs.push((&**right_a, &**right_b));
        }
        (
          Ast::Assignment {
            target: a,
            expression: expr_a,
          },
          Ast::Assignment {
            target: b,
            expression: expr_b,
          },
        ) => {
          if a != b {
            return false;
          }
          pairs.push((&**expr_a, &**expr_b));
        }
        _ => return false,
      }
    }
    true
  }
}

impl Eq for Ast {}

/// Canonical one-line form, e.g. `Assignment(y, BinaryOp(+, x, 2))`.
impl fmt::Display for Ast {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    enum Piece<'a> {
      Node(&'a Ast),
      Text(&'static str),
    }

    let mut work = vec![Piece::Node(self)];
    while let Some(piece) = work.pop() {
      match piece {
        Piece::Text(text) => f.write_str(text)?,
        Piece::Node(Ast::Literal { value }) => f.write_str(value)?,
        Piece::Node(Ast::Identifier { name }) => f.write_str(name)?,
        Piece::Node(Ast::BinaryOp {
          operator,
          left,
          right,
        }) => {
          write!(f, "BinaryOp({operator}, ")?;
          work.push(Piece::Text(")"));
          work.push(Piece::Node(&**right));
          work.push(Piece::Text(", "));
          work.push(Piece::Node(&**left));
        }
        Piece::Node(Ast::Assignment { target, expression }) => {
          write!(f, "Assignment({target}, ")?;
          work.push(Piece::Text(")"));
          work.push(Piece::Node(&**expression));
        }
      }
    }
    Ok(())
  }
}

impl fmt::Debug for Ast {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    fmt::Display::fmt(self, f)
  }
}
