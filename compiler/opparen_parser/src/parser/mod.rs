// Rule-text parser built from nom combinators over lexer token slices.
//
//   grammar  := Ident "{" rule* "}"
//   rule     := Ident ("=" | "+=") "|"? case_alt ("|" case_alt)*
//   case_alt := seq ("--" Ident)?
//   alt      := seq ("|" seq)*
//   seq      := iter*
//   iter     := base ("*" | "+" | "?")?
//   base     := Ident | String | "(" alt ")"
//
// A rule body ends where the next `Ident "="` or `Ident "+="` starts.

pub mod diagnostics;

use nom::branch::alt;
use nom::combinator::{cut, map, not, opt};
use nom::error::{Error as NomError, ErrorKind};
use nom::multi::{many0, separated_list1};
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;
use opparen_ast::{Diagnostic, GrammarDef, PExpr, RuleDef, RuleOp};
use opparen_lexer::{Lexer, Token, TokenType};

pub use diagnostics::diagnostic_from_nom_error;

/// Parser input: the not-yet-consumed tail of the token list.
pub type TokenSlice<'a> = &'a [Token];

pub type PResult<'a, T> = IResult<TokenSlice<'a>, T>;

/// Consume one token if `pred` accepts its type.
pub fn take_token_if<'a, F>(pred: F, kind: ErrorKind) -> impl Fn(TokenSlice<'a>) -> PResult<'a, &'a Token>
where
    F: Fn(&TokenType) -> bool,
{
    move |input: TokenSlice<'a>| match input.split_first() {
        Some((token, rest)) if pred(&token.token_type) => Ok((rest, token)),
        _ => Err(nom::Err::Error(NomError::new(input, kind))),
    }
}

/// Consume one token of exactly this type.
fn punct<'a>(expected: TokenType) -> impl Fn(TokenSlice<'a>) -> PResult<'a, &'a Token> {
    take_token_if(move |tt| *tt == expected, ErrorKind::Tag)
}

fn identifier(input: TokenSlice<'_>) -> PResult<'_, String> {
    match input.split_first() {
        Some((
            Token {
                token_type: TokenType::Identifier(name),
                ..
            },
            rest,
        )) => Ok((rest, name.clone())),
        _ => Err(nom::Err::Error(NomError::new(input, ErrorKind::Alpha))),
    }
}

fn string_literal(input: TokenSlice<'_>) -> PResult<'_, String> {
    match input.split_first() {
        Some((
            Token {
                token_type: TokenType::String(text),
                ..
            },
            rest,
        )) => Ok((rest, text.clone())),
        _ => Err(nom::Err::Error(NomError::new(input, ErrorKind::Char))),
    }
}

fn rule_op(input: TokenSlice<'_>) -> PResult<'_, RuleOp> {
    alt((
        map(punct(TokenType::Equal), |_| RuleOp::Define),
        map(punct(TokenType::PlusEqual), |_| RuleOp::Extend),
    ))(input)
}

/// A rule application: an identifier that does not start the next definition.
fn application(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    map(terminated(identifier, not(rule_op)), PExpr::Apply)(input)
}

fn group(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    preceded(
        punct(TokenType::LeftParen),
        cut(terminated(parse_alt, punct(TokenType::RightParen))),
    )(input)
}

fn base(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    alt((application, map(string_literal, PExpr::Terminal), group))(input)
}

fn iter(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    let (input, expr) = base(input)?;
    let (input, suffix) = opt(take_token_if(
        |tt| matches!(tt, TokenType::Star | TokenType::Plus | TokenType::Question),
        ErrorKind::Tag,
    ))(input)?;
    let expr = match suffix.map(|t| &t.token_type) {
        Some(TokenType::Star) => PExpr::Star(Box::new(expr)),
        Some(TokenType::Plus) => PExpr::Plus(Box::new(expr)),
        Some(TokenType::Question) => PExpr::Opt(Box::new(expr)),
        _ => expr,
    };
    Ok((input, expr))
}

fn seq(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    map(many0(iter), |mut items| {
        if items.len() == 1 {
            items.remove(0)
        } else {
            PExpr::Seq(items)
        }
    })(input)
}

/// Alternatives inside parentheses; case names are not allowed here.
fn parse_alt(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    map(separated_list1(punct(TokenType::Pipe), seq), PExpr::alt)(input)
}

fn case_alt(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    let (input, body) = seq(input)?;
    let (input, case) = opt(preceded(punct(TokenType::CaseMarker), cut(identifier)))(input)?;
    Ok((
        input,
        match case {
            Some(name) => PExpr::case(name, body),
            None => body,
        },
    ))
}

fn rule_body(input: TokenSlice<'_>) -> PResult<'_, PExpr> {
    preceded(
        opt(punct(TokenType::Pipe)),
        map(separated_list1(punct(TokenType::Pipe), case_alt), PExpr::alt),
    )(input)
}

fn rule_def(input: TokenSlice<'_>) -> PResult<'_, RuleDef> {
    map(
        tuple((identifier, rule_op, cut(rule_body))),
        |(name, op, body)| RuleDef { name, op, body },
    )(input)
}

fn grammar_def(input: TokenSlice<'_>) -> PResult<'_, GrammarDef> {
    map(
        pair(
            identifier,
            delimited(
                punct(TokenType::LeftBrace),
                many0(rule_def),
                cut(punct(TokenType::RightBrace)),
            ),
        ),
        |(name, rules)| GrammarDef { name, rules },
    )(input)
}

/// Parses one grammar from already-lexed tokens.
pub fn parse_tokens(tokens: &[Token]) -> PResult<'_, GrammarDef> {
    let (rest, grammar) = grammar_def(tokens)?;
    if !rest.is_empty() {
        return Err(nom::Err::Failure(NomError::new(rest, ErrorKind::Eof)));
    }
    Ok((rest, grammar))
}

/// Lexes and parses rule text into a [`GrammarDef`].
///
/// The first problem found is returned as a diagnostic anchored in `source`.
pub fn parse_grammar(source: &str) -> Result<GrammarDef, Diagnostic> {
    let tokens = Lexer::tokenize(source);
    if let Some(bad) = tokens.iter().find(|t| t.token_type.is_error()) {
        return Err(diagnostics::lexer_error(bad));
    }
    match parse_tokens(&tokens) {
        Ok((_, grammar)) => {
            log::debug!(
                "parsed grammar '{}' with {} rules",
                grammar.name,
                grammar.rules.len()
            );
            Ok(grammar)
        }
        Err(err) => {
            let diag = diagnostic_from_nom_error(&err, source);
            log::debug!("rule text rejected: {diag}");
            Err(diag)
        }
    }
}
