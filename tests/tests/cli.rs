use std::ffi::OsString;
use std::io::Write;

use clap::Parser;
use opparen::{normalize_cli_args, run, Cli};
use pretty_assertions::assert_eq;

fn opparen(args: &[&str]) -> (i32, String, String) {
    let mut argv = vec![OsString::from("opparen")];
    argv.extend(args.iter().map(|a| OsString::from(*a)));
    let cli = Cli::parse_from(normalize_cli_args(argv));
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(cli, &mut out, &mut err).unwrap();
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn run_with_flags() {
    let (code, out, err) = opparen(&["--op", "+:1", "--op", "*:2", "1 + 2 * 3"]);
    assert_eq!((code, out.as_str(), err.as_str()), (0, "(1 + (2 * 3))\n", ""));
}

#[test]
fn run_reports_parse_errors() {
    let (code, out, err) = opparen(&["run", "--op", "+:1", "1 +"]);
    assert_eq!(code, 1);
    assert_eq!(out, "Error: Line 1, col 4: expected a digit, a letter, or \"(\"\n");
    assert!(err.starts_with("error: expected a digit"), "{err}");
    assert!(err.contains("1 | 1 +"), "{err}");
}

#[test]
fn run_refuses_invalid_tables() {
    let (code, out, err) = opparen(&["--op", "+:0", "1 + 1"]);
    assert_eq!(code, 1);
    assert!(out.is_empty());
    assert!(err.contains("precedence 0"), "{err}");
}

#[test]
fn grammar_subcommand_prints_rule_text() {
    let (code, out, _) = opparen(&["grammar", "--op", "^:2:right"]);
    assert_eq!(code, 0);
    assert!(out.starts_with("OperatorGrammar {\n  Exp\n    = Exp1\n"), "{out}");
    assert!(out.contains("Exp2\n    = Primary \"^\" Exp2  -- right\n    | Primary\n"), "{out}");
}

#[test]
fn grammar_refuses_precedences_above_the_limit() {
    let (code, out, err) = opparen(&["grammar", "--op", "+:4000000000"]);
    assert_eq!(code, 1);
    assert!(out.is_empty(), "{out}");
    assert!(err.contains("above the limit of 100"), "{err}");
}

#[test]
fn check_reads_table_files() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[{{"symbol": "+", "precedence": 1}}, {{"symbol": "+", "precedence": 2}}]"#
    )
    .unwrap();
    let path = file.path().to_string_lossy().to_string();

    let (code, out, _) = opparen(&["check", "--table", &path]);
    assert_eq!(code, 0);
    assert!(out.starts_with("warning: operator '+' is defined as"), "{out}");
    assert!(out.ends_with("ok: 2 operators across 2 precedence levels\n"), "{out}");
}

#[test]
fn missing_files_exit_with_2() {
    let (code, out, err) = opparen(&["check", "--config", "does-not-exist.toml"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("error: failed to read 'does-not-exist.toml'"), "{err}");
}
