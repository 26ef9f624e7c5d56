use tacfront::codegen::{self, IntermediateGenerator};
use tacfront::parser::parse_assignment;
use tacfront::tokenizer::{tokenize, tokenize_with};
use tacfront::{Ast, CompileError, LexMode, Options, Position, TokenKind, compile};

#[test]
fn compiles_sample_assignment() {
  let out = compile("y = x * 2 + 5;", &Options::default()).unwrap();

  let tokens: Vec<_> = out
    .tokens
    .iter()
    .map(|t| format!("{}({})", t.kind, t.lexeme))
    .collect();
  assert_eq!(
    tokens,
    vec![
      "Identifier(y)",
      "Operator(=)",
      "Identifier(x)",
      "Operator(*)",
      "Literal(2)",
      "Operator(+)",
      "Literal(5)",
      "Symbol(;)",
    ]
  );
  assert_eq!(
    out.ast.to_string(),
    "Assignment(y, BinaryOp(+, BinaryOp(*, x, 2), 5))"
  );
  assert_eq!(out.tac.to_string(), "t0 = x * 2\nt1 = t0 + 5\ny = t1\n");
  assert!(out.skipped.is_empty());
}

#[test]
fn no_precedence_between_operators() {
  let out = compile("y = x + 2 * 5;", &Options::default()).unwrap();
  assert_eq!(
    out.ast.to_string(),
    "Assignment(y, BinaryOp(*, BinaryOp(+, x, 2), 5))"
  );
  assert_eq!(out.tac.lines(), vec!["t0 = x + 2", "t1 = t0 * 5", "y = t1"]);
}

#[test]
fn semicolon_does_not_change_the_tree() {
  let with = compile("total = a / b - c;", &Options::default()).unwrap();
  let without = compile("total = a / b - c", &Options::default()).unwrap();
  assert_eq!(with.ast, without.ast);
  assert_eq!(with.tac, without.tac);
}

#[test]
fn instruction_count_matches_tree_shape() {
  for src in ["a = 1", "a = b + c", "a = b + c - d * e / f", "n = n == 0 || m"] {
    let out = compile(src, &Options::default()).unwrap();
    assert_eq!(out.tac.len(), out.ast.binary_op_count() + 1, "{src}");
  }
}

#[test]
fn empty_source() {
  assert!(tokenize("").unwrap().is_empty());
  let err = compile("", &Options::default()).unwrap_err();
  assert!(matches!(err, CompileError::ParseExpectedIdentifier { .. }));
}

#[test]
fn unknown_character_leniency_and_strictness() {
  let lenient = compile("x@=1", &Options::default()).unwrap();
  let kinds: Vec<_> = lenient.tokens.iter().map(|t| t.kind).collect();
  assert_eq!(
    kinds,
    vec![TokenKind::Identifier, TokenKind::Operator, TokenKind::Literal]
  );
  assert_eq!(lenient.skipped.len(), 1);
  assert_eq!(lenient.tac.lines(), vec!["x = 1"]);

  let strict = Options {
    lex_mode: LexMode::Strict,
  };
  let err = compile("x@=1", &strict).unwrap_err();
  assert_eq!(err.position(), Some(Position::new(1, 2)));
  assert_eq!(err.render("x@=1"), "x@=1\n ^ illegal character '@' at 1:2");
}

#[test]
fn errors_carry_positions() {
  let err = compile("a = b +\n  ;", &Options::default()).unwrap_err();
  assert_eq!(
    err,
    CompileError::ParseExpectedOperand {
      found: "Symbol(;)".to_string(),
      location: tacfront::Location::Source(Position::new(2, 3)),
    }
  );

  let err = tokenize_with("c = 'x", LexMode::Lenient).unwrap_err();
  assert_eq!(err.position(), Some(Position::new(1, 5)));
}

#[test]
fn fresh_generators_are_independent() {
  let tokens = tokenize("v = p * q").unwrap();
  let ast = parse_assignment(&tokens).unwrap();

  let first = codegen::generate(&ast);
  let second = codegen::generate(&ast);
  assert_eq!(first, second);

  let mut shared = IntermediateGenerator::new();
  shared.generate(&ast);
  shared.generate(&ast);
  assert_eq!(shared.temp_count(), 2);
  assert_eq!(shared.instructions().len(), 4);
}

#[test]
fn keywords_are_tokenized_but_not_parsed() {
  let tokens = tokenize("while (x < 3) { x = x + 1; }").unwrap();
  assert_eq!(tokens[0].kind, TokenKind::Keyword);
  let err = parse_assignment(&tokens).unwrap_err();
  assert!(matches!(err, CompileError::ParseExpectedIdentifier { .. }));
}

#[test]
fn ast_built_by_hand_matches_parser() {
  let tokens = tokenize("r = s").unwrap();
  assert_eq!(
    parse_assignment(&tokens).unwrap(),
    Ast::assignment("r", Ast::identifier("s"))
  );
}

#[test]
fn newline_inside_string_literal_advances_line() {
  let tokens = tokenize("\"a\nb\" x").unwrap();
  assert_eq!(tokens[0].kind, TokenKind::StringLit);
  assert_eq!(tokens[0].lexeme, "a\nb");
  assert_eq!(tokens[0].pos, Position::new(1, 1));
  assert_eq!(tokens[1].lexeme, "x");
  assert_eq!(tokens[1].pos, Position::new(2, 4));
}

#[test]
fn long_operator_chain_compiles() {
  let worker = std::thread::Builder::new()
    .stack_size(512 * 1024)
    .spawn(|| {
      let operators = 100_000;
      let source = format!("y = a{}", " + a".repeat(operators));
      let out = compile(&source, &Options::default()).unwrap();
      assert_eq!(out.ast.binary_op_count(), operators);
      assert_eq!(out.tac.len(), operators + 1);
      assert_eq!(
        out.tac.instructions[operators].to_string(),
        format!("y = t{}", operators - 1)
      );
      assert_eq!(out.ast, out.ast.clone());
    })
    .unwrap();
  worker.join().unwrap();
}
