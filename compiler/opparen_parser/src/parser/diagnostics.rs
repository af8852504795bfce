use nom::error::{Error as NomError, ErrorKind};
use nom::Err as NomErr;
use opparen_ast::{Diagnostic, Span};
use opparen_lexer::{Token, TokenType};

use super::TokenSlice;

/// Convert a nom error into a single diagnostic anchored in `source`
pub fn diagnostic_from_nom_error(err: &NomErr<NomError<TokenSlice<'_>>>, source: &str) -> Diagnostic {
    match err {
        NomErr::Error(NomError { input, code }) | NomErr::Failure(NomError { input, code }) => {
            match input.first() {
                Some(token) => from_error_kind(token, *code),
                None => end_of_input(source),
            }
        }
        NomErr::Incomplete(_) => end_of_input(source),
    }
}

/// Diagnostic for a token the lexer could not recognize
pub fn lexer_error(token: &Token) -> Diagnostic {
    let message = match &token.token_type {
        TokenType::Error(msg) => msg.clone(),
        other => format!("Unexpected {other}"),
    };
    let diag = Diagnostic::at_span(span_from_token(token), message);
    if token.lexeme.starts_with('"') {
        diag.with_help("terminals are JSON strings: escape '\"' and '\\' and control characters")
    } else {
        diag
    }
}

fn from_error_kind(token: &Token, kind: ErrorKind) -> Diagnostic {
    let message = match kind {
        ErrorKind::Alpha => format!("Expected a rule name, found {}", token.token_type),
        ErrorKind::Eof => format!("Unexpected {} after the closing '}}'", token.token_type),
        _ => format!("Unexpected {}", token.token_type),
    };
    let diag = Diagnostic::at_span(span_from_token(token), message);
    match default_help_for_token(&token.token_type) {
        Some(help) => diag.with_help(help),
        None => diag,
    }
}

fn end_of_input(source: &str) -> Diagnostic {
    Diagnostic::at_span(
        Span::in_source(source, source.len(), source.len()),
        "Unexpected end of rule text",
    )
    .with_help("Did you forget the closing '}' of the grammar?")
}

/// Provide a default help message for a token type
fn default_help_for_token(tt: &TokenType) -> Option<&'static str> {
    match tt {
        TokenType::RightParen => Some("Did you forget a matching '(' earlier?"),
        TokenType::RightBrace => Some("Did you forget a matching '{' earlier?"),
        TokenType::CaseMarker => {
            Some("Case names ('-- name') may only follow a top-level alternative of a rule")
        }
        TokenType::Equal | TokenType::PlusEqual => {
            Some("A rule definition looks like 'Name = body'")
        }
        TokenType::Star | TokenType::Plus | TokenType::Question => {
            Some("Repetition operators follow the expression they repeat")
        }
        _ => None,
    }
}

/// Build a Span that covers an entire token
fn span_from_token(token: &Token) -> Span {
    Span {
        start: token.location.offset,
        end: token.end_offset(),
        line: token.location.line as u32,
        column: token.location.column as u32,
    }
}
