//! Command-line front end.
//!
//! The binary only parses arguments and sets up logging; everything else lives
//! here so that it can be driven from tests with in-memory writers.

use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use opparen_ast::validate::{has_errors, validate_table};
use opparen_ast::{render_snippet, OperatorTable};
use opparen_grammar::compile;
use opparen_render::{Pipeline, PipelineError};
use serde::Serialize;

use crate::config::{Config, ConfigError, DEFAULT_CONFIG_FILE};

#[derive(Debug, Parser)]
#[command(
    name = "opparen",
    version,
    about = "Parenthesize expressions according to a user-defined operator table",
    long_about = "opparen compiles a table of binary operators into a precedence-climbing\n\
        grammar, parses expressions with it and prints them with every binary\n\
        application wrapped in parentheses.\n\n\
        EXAMPLES:\n\
        \n  opparen --op +:1 --op '*:2' '1 + 2 * 3'      prints (1 + (2 * 3))\n\
        \n  opparen grammar --table ops.toml             show the generated grammar\n\
        \n  opparen check --table ops.json               validate a table\n\
        \n  cat exprs.txt | opparen run --json           one JSON object per line"
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parenthesize an expression, or each line of stdin
    Run(RunArgs),

    /// Print the grammar generated for the operator table
    Grammar(TableArgs),

    /// Validate the operator table
    Check(TableArgs),
}

#[derive(Debug, Args, Clone, Default)]
pub struct TableArgs {
    /// Config file with limits and operators (default: ./opparen.toml if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Additional operator table file (.toml or .json)
    #[arg(long, value_name = "FILE")]
    pub table: Option<PathBuf>,

    /// Operator as SYMBOL:PRECEDENCE[:left|right]; may be repeated
    #[arg(long = "op", value_name = "OP")]
    pub ops: Vec<String>,
}

#[derive(Debug, Args, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Print one JSON object per input instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Also print the parse tree as JSON
    #[arg(long)]
    pub tree: bool,

    /// Expression to parenthesize (reads stdin lines if omitted)
    #[arg(value_name = "EXPR")]
    pub expr: Option<String>,
}

/// Inserts `run` when the first argument is not a known subcommand, so that
/// `opparen '1 + 2'` works.
pub fn normalize_cli_args(args: Vec<OsString>) -> Vec<OsString> {
    if args.len() <= 1 {
        return args;
    }
    let first = args[1].to_string_lossy();
    let known = matches!(
        first.as_ref(),
        "run" | "grammar" | "check" | "help" | "--help" | "-h" | "--version" | "-V"
    );
    if known {
        return args;
    }
    let mut out = Vec::with_capacity(args.len() + 1);
    let mut args = args.into_iter();
    out.extend(args.next());
    out.push(OsString::from("run"));
    out.extend(args);
    out
}

/// Builds the effective config: file, then extra table, then flags, then
/// environment.
pub fn load_config(args: &TableArgs) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            Config::load(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Config::default(),
    };
    if let Some(path) = &args.table {
        config.merge_operators(Config::load(path)?);
    }
    for flag in &args.ops {
        config.push_flag(flag)?;
    }
    config.apply_env();
    log::info!(
        "operator table has {} entries, max depth {}",
        config.operators.len(),
        config.limits.max_depth
    );
    Ok(config)
}

#[derive(Serialize)]
struct JsonLine<'a> {
    input: &'a str,
    output: &'a str,
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<serde_json::Value>,
}

/// Runs a parsed command line and returns the process exit code.
pub fn run(cli: Cli, out: &mut dyn Write, err: &mut dyn Write) -> io::Result<i32> {
    let command = cli.command.unwrap_or(Command::Run(RunArgs::default()));
    let table_args = match &command {
        Command::Run(args) => &args.table,
        Command::Grammar(args) | Command::Check(args) => args,
    };
    let config = match load_config(table_args) {
        Ok(config) => config,
        Err(e) => {
            writeln!(err, "error: {e}")?;
            return Ok(2);
        }
    };

    match command {
        Command::Check(_) => run_check(&config, out),
        Command::Grammar(_) => {
            if report_invalid(&config, err)? {
                return Ok(1);
            }
            write!(out, "{}", compile(&config.table()).text())?;
            Ok(0)
        }
        Command::Run(args) => {
            if report_invalid(&config, err)? {
                return Ok(1);
            }
            let inputs = match &args.expr {
                Some(expr) => vec![expr.clone()],
                None => read_stdin_lines()?,
            };
            run_inputs(&config, &args, &inputs, out, err)
        }
    }
}

fn run_check(config: &Config, out: &mut dyn Write) -> io::Result<i32> {
    let diags = validate_table(&config.table(), &config.validation_limits());
    for diag in &diags {
        writeln!(out, "{}", render_snippet(diag, ""))?;
    }
    if has_errors(&diags) {
        return Ok(1);
    }
    writeln!(
        out,
        "ok: {} operators across {} precedence levels",
        config.operators.len(),
        config.table().max_precedence()
    )?;
    Ok(0)
}

/// Prints validation errors; true when the table must not be used.
fn report_invalid(config: &Config, err: &mut dyn Write) -> io::Result<bool> {
    let diags = validate_table(&config.table(), &config.validation_limits());
    for diag in &diags {
        if diag.is_error() {
            writeln!(err, "{}", render_snippet(diag, ""))?;
        } else {
            log::warn!("{diag}");
        }
    }
    Ok(has_errors(&diags))
}

fn read_stdin_lines() -> io::Result<Vec<String>> {
    io::stdin()
        .lock()
        .lines()
        .filter(|line| line.as_ref().map_or(true, |l| !l.trim().is_empty()))
        .collect()
}

/// Parenthesizes each input; the exit code is 1 if any of them failed.
pub fn run_inputs(
    config: &Config,
    args: &RunArgs,
    inputs: &[String],
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> io::Result<i32> {
    let table = config.table();
    let mut pipeline = Pipeline::new(config.pipeline_options());
    let mut failed = false;

    for input in inputs {
        let result = parenthesize_one(&mut pipeline, &table, input, args.tree);
        let (output, tree) = match &result {
            Ok((output, tree)) => (output.clone(), tree.clone()),
            Err(e) => {
                failed = true;
                writeln!(err, "{}", render_snippet(&e.to_diagnostic(input), input))?;
                (format!("Error: {e}"), None)
            }
        };

        if args.json {
            let line = JsonLine {
                input,
                output: &output,
                ok: result.is_ok(),
                tree,
            };
            let text = serde_json::to_string(&line).map_err(io::Error::other)?;
            writeln!(out, "{text}")?;
        } else {
            writeln!(out, "{output}")?;
            if let Some(tree) = tree {
                let text = serde_json::to_string_pretty(&tree).map_err(io::Error::other)?;
                writeln!(out, "{text}")?;
            }
        }
    }
    Ok(if failed { 1 } else { 0 })
}

fn parenthesize_one(
    pipeline: &mut Pipeline,
    table: &OperatorTable,
    input: &str,
    with_tree: bool,
) -> Result<(String, Option<serde_json::Value>), PipelineError> {
    let node = pipeline.parse(table, input)?;
    let output = pipeline.render(&node)?;
    let tree = if with_tree {
        serde_json::to_value(&node).ok()
    } else {
        None
    };
    Ok((output, tree))
}
