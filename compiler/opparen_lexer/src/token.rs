use std::fmt;

pub use opparen_ast::Location;

/// The kind of a rule-text token, with its decoded payload where it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenType {
    /// A rule or grammar name.
    Identifier(String),
    /// A quoted terminal, already unescaped.
    String(String),
    /// `=`
    Equal,
    /// `+=`
    PlusEqual,
    /// `|`
    Pipe,
    /// `--`, introducing a case name.
    CaseMarker,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Star,
    Plus,
    Question,
    /// Text the lexer could not make sense of.
    Error(String),
}

impl TokenType {
    pub fn is_error(&self) -> bool {
        matches!(self, TokenType::Error(_))
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenType::Identifier(name) => write!(f, "identifier '{name}'"),
            TokenType::String(_) => f.write_str("string literal"),
            TokenType::Equal => f.write_str("'='"),
            TokenType::PlusEqual => f.write_str("'+='"),
            TokenType::Pipe => f.write_str("'|'"),
            TokenType::CaseMarker => f.write_str("'--'"),
            TokenType::LeftParen => f.write_str("'('"),
            TokenType::RightParen => f.write_str("')'"),
            TokenType::LeftBrace => f.write_str("'{'"),
            TokenType::RightBrace => f.write_str("'}'"),
            TokenType::Star => f.write_str("'*'"),
            TokenType::Plus => f.write_str("'+'"),
            TokenType::Question => f.write_str("'?'"),
            TokenType::Error(msg) => f.write_str(msg),
        }
    }
}

/// A token together with the exact source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, location: Location) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Byte offset one past the end of the token.
    pub fn end_offset(&self) -> usize {
        self.location.offset + self.lexeme.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self.token_type, self.location.line, self.location.column
        )
    }
}
