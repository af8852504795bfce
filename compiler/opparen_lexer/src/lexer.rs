//! Lexer for rule text using the 'logos' crate.
//! Recognizes rule names, quoted terminals, definition operators and the PEG
//! punctuation; whitespace and `//` comments are skipped.

use crate::token::{Location, Token, TokenType};
use logos::Logos;

/// Raw token type used by the logos lexer
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum LogosToken {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Identifier,

    // Terminals use JSON string syntax, escapes included.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| serde_json::from_str::<String>(lex.slice()).ok())]
    String(String),

    #[token("=")]
    Equal,
    #[token("+=")]
    PlusEqual,
    #[token("|")]
    Pipe,
    #[token("--")]
    CaseMarker,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("*")]
    Star,
    #[token("+")]
    Plus,
    #[token("?")]
    Question,
}

/// Rule-text lexer
pub struct Lexer<'source> {
    source: &'source str,
    logos_lexer: logos::Lexer<'source, LogosToken>,
    /// Current line number (1-based)
    line: usize,
    /// Current column number (1-based)
    column: usize,
    /// Byte offset that `line`/`column` describe
    offset: usize,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source text
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            logos_lexer: LogosToken::lexer(source),
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Lex the whole input, error tokens included.
    pub fn tokenize(source: &'source str) -> Vec<Token> {
        let tokens: Vec<Token> = Lexer::new(source).collect();
        #[cfg(feature = "logging")]
        log::trace!("lexed {} tokens from {} bytes", tokens.len(), source.len());
        tokens
    }

    /// Convert a LogosToken to our semantic Token type
    fn convert_token(&self, logos_token: LogosToken, lexeme: &str) -> TokenType {
        match logos_token {
            LogosToken::Identifier => TokenType::Identifier(lexeme.to_string()),
            LogosToken::String(text) => TokenType::String(text),
            LogosToken::Equal => TokenType::Equal,
            LogosToken::PlusEqual => TokenType::PlusEqual,
            LogosToken::Pipe => TokenType::Pipe,
            LogosToken::CaseMarker => TokenType::CaseMarker,
            LogosToken::LParen => TokenType::LeftParen,
            LogosToken::RParen => TokenType::RightParen,
            LogosToken::LBrace => TokenType::LeftBrace,
            LogosToken::RBrace => TokenType::RightBrace,
            LogosToken::Star => TokenType::Star,
            LogosToken::Plus => TokenType::Plus,
            LogosToken::Question => TokenType::Question,
        }
    }

    /// Move the tracked position forward to byte offset `to`.
    fn advance_to(&mut self, to: usize) {
        let skipped = self.source.get(self.offset..to).unwrap_or_default();
        for c in skipped.chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset = to;
    }

    fn location(&self) -> Location {
        Location {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.logos_lexer.next()?;
        let span = self.logos_lexer.span();
        let lexeme = self.logos_lexer.slice();
        self.advance_to(span.start);
        let location = self.location();
        let token_type = match logos_token {
            Ok(token) => self.convert_token(token, lexeme),
            Err(()) if lexeme.starts_with('"') => TokenType::Error(format!(
                "Invalid string literal at {}:{}",
                self.line, self.column
            )),
            Err(()) => TokenType::Error(format!(
                "Invalid token '{}' at {}:{}",
                lexeme, self.line, self.column
            )),
        };
        let token = Token::new(token_type, lexeme, location);
        self.advance_to(span.end);
        Some(token)
    }
}
