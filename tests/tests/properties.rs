use opparen_ast::{Operator, OperatorTable};
use opparen_grammar::compile;
use opparen_render::{
    parse_and_parenthesize, try_parse_and_parenthesize, Pipeline, PipelineError, PipelineOptions,
};
use pretty_assertions::assert_eq;
use tests::{arithmetic, init_logger, table, with_power};

#[test]
fn determinism() {
    init_logger();
    let table = with_power();
    assert_eq!(compile(&table).text(), compile(&table.clone()).text());

    let input = "a * (b + 2) ** c - 4 / d";
    let first = parse_and_parenthesize(&table, input);
    let second = parse_and_parenthesize(&table, input);
    assert_eq!(first, second);
    assert_eq!(first, "((a * (((b + 2)) ** c)) - (4 / d))");

    let mut pipeline = Pipeline::default();
    assert_eq!(pipeline.parenthesize(&table, input), first);
    assert_eq!(pipeline.parenthesize(&table, input), first);
}

#[test]
fn full_parenthesization() {
    let table = arithmetic();
    assert_eq!(parse_and_parenthesize(&table, "1 + 2"), "(1 + 2)");
    assert_eq!(parse_and_parenthesize(&table, "x / y"), "(x / y)");
}

#[test]
fn atom_preservation() {
    let table = arithmetic();
    assert_eq!(parse_and_parenthesize(&table, "42"), "42");
    assert_eq!(parse_and_parenthesize(&table, "007"), "007");
    assert_eq!(parse_and_parenthesize(&table, "foo1"), "foo1");
    assert_eq!(parse_and_parenthesize(&table, "  x  "), "x");
}

#[test]
fn grouping_non_collapse() {
    let table = arithmetic();
    assert_eq!(parse_and_parenthesize(&table, "(1)"), "(1)");
    assert_eq!(parse_and_parenthesize(&table, "((1))"), "((1))");
    assert_eq!(parse_and_parenthesize(&table, "(1 + 2)"), "((1 + 2))");
    assert_eq!(parse_and_parenthesize(&table, "(1 + 2) * 3"), "(((1 + 2)) * 3)");
}

#[test]
fn left_associativity() {
    let table = table(&[("+", 1, false), ("*", 2, false)]);
    assert_eq!(parse_and_parenthesize(&table, "1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(parse_and_parenthesize(&table, "1 * 2 + 3"), "((1 * 2) + 3)");
    assert_eq!(parse_and_parenthesize(&table, "1 + 2 + 3"), "((1 + 2) + 3)");
}

#[test]
fn right_associativity() {
    let table = table(&[("**", 3, true)]);
    assert_eq!(parse_and_parenthesize(&table, "2 ** 3 ** 2"), "(2 ** (3 ** 2))");
}

#[test]
fn failure_path() {
    let output = parse_and_parenthesize(&OperatorTable::empty(), "1 + 1");
    assert!(output.starts_with("Error:"), "{output}");
    assert_eq!(output, "Error: Line 1, col 3: expected end of input");
}

#[test]
fn empty_table_pass_through() {
    let table = OperatorTable::empty();
    assert_eq!(parse_and_parenthesize(&table, "42"), "42");
    assert_eq!(parse_and_parenthesize(&table, "(42)"), "(42)");
}

#[test]
fn precedence_gaps_are_transparent() {
    let table = table(&[("+", 1, false), ("^", 4, true)]);
    assert_eq!(compile(&table).levels().len(), 4);
    assert_eq!(parse_and_parenthesize(&table, "1 + 2 ^ 3"), "(1 + (2 ^ 3))");
    assert_eq!(parse_and_parenthesize(&table, "1 ^ 2 + 3"), "((1 ^ 2) + 3)");
}

#[test]
fn prefix_symbols_at_different_levels() {
    let table = with_power();
    assert_eq!(parse_and_parenthesize(&table, "2**3*4"), "((2 ** 3) * 4)");
    assert_eq!(parse_and_parenthesize(&table, "2 * 3 ** 2"), "(2 * (3 ** 2))");
}

#[test]
fn longer_symbols_win_within_a_level() {
    let table = table(&[("<", 1, false), ("<=", 1, false)]);
    assert_eq!(parse_and_parenthesize(&table, "a <= b < c"), "((a <= b) < c)");
}

#[test]
fn same_symbol_at_two_levels_binds_at_the_tighter() {
    let table = table(&[("-", 1, false), ("-", 2, true)]);
    assert_eq!(parse_and_parenthesize(&table, "a - b - c"), "(a - (b - c))");
}

#[test]
fn whitespace_is_insignificant_between_tokens() {
    let table = arithmetic();
    assert_eq!(parse_and_parenthesize(&table, "1+2*3"), "(1 + (2 * 3))");
    assert_eq!(parse_and_parenthesize(&table, "\t1 +\n 2 "), "(1 + 2)");
}

#[test]
fn parse_errors_carry_location_and_expectations() {
    let table = arithmetic();
    assert_eq!(
        parse_and_parenthesize(&table, "1 +"),
        "Error: Line 1, col 4: expected a digit, a letter, or \"(\""
    );
    let err = try_parse_and_parenthesize(&table, "(1\n+ 2").unwrap_err();
    let PipelineError::Parse(failure) = &err else {
        panic!("expected a parse failure, got {err:?}");
    };
    assert_eq!(failure.location.line, 2);
    assert!(failure.expected().contains(&"\")\"".to_string()));
    assert!(parse_and_parenthesize(&table, "").starts_with("Error: Line 1, col 1:"));
}

#[test]
fn degenerate_table_is_a_compile_error() {
    let table = OperatorTable::new(vec![Operator::left("", 1)]);
    let err = try_parse_and_parenthesize(&table, "1").unwrap_err();
    assert!(matches!(err, PipelineError::GrammarCompile(_)));
    assert!(parse_and_parenthesize(&table, "1").starts_with("Error: "));
}

#[test]
fn symbols_that_need_quoting() {
    let table = table(&[("\"", 1, false), ("\\", 2, true)]);
    assert_eq!(parse_and_parenthesize(&table, "a \" b \\ c"), "(a \" (b \\ c))");
}

#[test]
fn nesting_beyond_the_limit_is_reported() {
    let mut pipeline = Pipeline::new(PipelineOptions {
        max_depth: 64,
        cache_capacity: 1,
    });
    let deep = format!("{}1{}", "(".repeat(65), ")".repeat(65));
    let output = pipeline.parenthesize(&arithmetic(), &deep);
    assert!(output.starts_with("Error: "), "{output}");
    assert!(output.contains("limit of 64"), "{output}");

    let at_limit = format!("{}1{}", "(".repeat(64), ")".repeat(64));
    assert_eq!(pipeline.parenthesize(&arithmetic(), &at_limit), at_limit);
}

#[test]
fn nesting_allowance_does_not_shrink_with_precedence_levels() {
    // Every group descends through all 100 levels; debug frames are large.
    let worker = std::thread::Builder::new()
        .stack_size(32 << 20)
        .spawn(|| {
            let table = OperatorTable::new(vec![Operator::left("+", 100)]);
            let nested = format!("{}1{}", "(".repeat(10), ")".repeat(10));
            assert_eq!(parse_and_parenthesize(&table, &nested), nested);
            assert_eq!(
                parse_and_parenthesize(&table, "((((a + 1)))) + 2"),
                "((((((a + 1))))) + 2)"
            );
        })
        .unwrap();
    worker.join().unwrap();
}
