use opparen_engine::{FailureKind, Grammar, MatchNode, MatchTree};
use pretty_assertions::assert_eq;

const ARITH: &str = r#"Arith {
  Exp
    = Exp1

  Exp1
    = Exp1 ("+" | "-") Exp2  -- left
    | Exp2

  Exp2
    = Exp2 "*" Exp3  -- left
    | Exp3

  Exp3
    = Primary "^" Exp3  -- right
    | Primary

  Primary
    = number
    | ident
    | ParenExp

  ParenExp
    = "(" Exp ")"

  number
    = digit+

  ident
    = letter (letter | digit)*

  space
    += " " | "\t" | "\n"
}
"#;

fn arith() -> Grammar {
    let _ = env_logger::builder().is_test(true).try_init();
    Grammar::from_source(ARITH).expect("arith grammar should resolve")
}

/// Re-renders a match, wrapping every case rule in parentheses.
fn bracket(tree: &MatchTree<'_>, node: &MatchNode) -> String {
    match node {
        MatchNode::Rule { name, children, .. }
            if name.ends_with("_left") || name.ends_with("_right") =>
        {
            let parts: Vec<String> = children.iter().map(|c| bracket(tree, c)).collect();
            format!("({})", parts.join(" "))
        }
        MatchNode::Terminal { .. } => tree.text(node).to_string(),
        _ => node.children().iter().map(|c| bracket(tree, c)).collect(),
    }
}

fn bracketed(grammar: &Grammar, input: &str) -> String {
    let tree = grammar
        .match_input(input)
        .unwrap_or_else(|e| panic!("{input:?} should match: {e}"));
    bracket(&tree, tree.root())
}

#[test]
fn test_precedence_levels() {
    let grammar = arith();
    assert_eq!(bracketed(&grammar, "1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(bracketed(&grammar, "1 * 2 + 3"), "((1 * 2) + 3)");
}

#[test]
fn test_left_recursion_grows_left_chains() {
    let grammar = arith();
    assert_eq!(bracketed(&grammar, "1 - 2 + 3"), "((1 - 2) + 3)");
    assert_eq!(bracketed(&grammar, "a*b*c*d"), "(((a * b) * c) * d)");
}

#[test]
fn test_right_recursion() {
    let grammar = arith();
    assert_eq!(bracketed(&grammar, "2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
}

#[test]
fn test_groups_and_whitespace() {
    let grammar = arith();
    assert_eq!(bracketed(&grammar, "  (1)  "), "(1)");
    assert_eq!(bracketed(&grammar, "(1 +\n2)\t* x1"), "(((1 + 2)) * x1)");
}

#[test]
fn test_root_and_atom_spans() {
    let grammar = arith();
    let tree = grammar.match_input("  42 ").unwrap();
    assert_eq!(tree.root().rule_name(), Some("Exp"));
    assert_eq!(tree.text(tree.root()), "42");
    assert!(tree.outline().contains("number \"42\""));
}

#[test]
fn test_failure_reports_furthest_expectations() {
    let grammar = arith();
    let err = grammar.match_input("1 +").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Line 1, col 4: expected a digit, a letter, or \"(\""
    );
    assert_eq!(err.offset(), 3);

    let err = grammar.match_input("1 2").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Line 1, col 3: expected \"^\", \"*\", \"+\", \"-\", or end of input"
    );
}

#[test]
fn test_failure_lists_operators_tried() {
    let grammar = arith();
    let err = grammar.match_input("(1 2)").unwrap_err();
    assert_eq!(err.location.column, 4);
    assert_eq!(
        err.expected(),
        &["\"^\"", "\"*\"", "\"+\"", "\"-\"", "\")\""]
    );
}

#[test]
fn test_lexical_rules_do_not_skip_spaces() {
    let grammar = Grammar::from_source("G { Pair = pair  pair = letter letter }").unwrap();
    assert!(grammar.match_input(" ab ").is_ok());
    let err = grammar.match_input("a b").unwrap_err();
    assert_eq!(err.to_string(), "Line 1, col 2: expected a letter");
}

#[test]
fn test_space_extension() {
    let grammar = Grammar::from_source(r#"G { Sum = digit "+" digit  space += "_" }"#).unwrap();
    assert!(grammar.match_input("1_+_2").is_ok());
    assert!(grammar.match_input("1 + 2").is_ok());
}

#[test]
fn test_depth_limit() {
    let grammar = arith().with_max_depth(6);
    let err = grammar.match_input("((((((((1))))))))").unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooDeep { limit: 6 }));
    assert!(grammar.match_input("((((( 1 + 2 )))))").is_ok());
}

/// `E1 = E2`, `E2 = E3`, ... down to a parenthesized primary.
fn tower(levels: usize) -> String {
    let mut source = String::from("Tower {\n");
    for level in 1..levels {
        source.push_str(&format!("  E{level} = E{}\n", level + 1));
    }
    source.push_str(&format!("  E{levels} = P\n"));
    source.push_str("  P = digit | \"(\" E1 \")\"\n}");
    source
}

#[test]
fn test_depth_counts_nesting_not_rules() {
    let grammar = Grammar::from_source(&tower(50)).unwrap().with_max_depth(10);
    let ten = format!("{}1{}", "(".repeat(10), ")".repeat(10));
    assert!(grammar.match_input(&ten).is_ok());

    let eleven = format!("({ten})");
    let err = grammar.match_input(&eleven).unwrap_err();
    assert!(matches!(err.kind, FailureKind::TooDeep { limit: 10 }));
}

#[test]
fn test_case_rule_reentered_at_its_offset_fails() {
    let grammar = Grammar::from_source("G { S = T  -- loop\n | digit  T = S_loop }").unwrap();
    assert!(grammar.match_input("7").is_ok());
    assert!(grammar.match_input("x").is_err());
}

#[test]
fn test_iteration_nodes() {
    let grammar = Grammar::from_source(r#"G { List = "[" digit* "]" }"#).unwrap();
    let tree = grammar.match_input("[123]").unwrap();
    let children = tree.root().children();
    assert_eq!(children.len(), 3);
    assert!(children[1].is_iter());
    assert_eq!(children[1].children().len(), 3);
    assert_eq!(tree.text(&children[1]), "123");

    let tree = grammar.match_input("[]").unwrap();
    assert!(tree.root().children()[1].children().is_empty());
}
