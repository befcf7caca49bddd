use strum_macros::{Display, EnumDiscriminants};

/// A single lexed token: its kind (with literal payload where relevant)
/// plus the line/column of its first character, for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn is(&self, token_type: TokenType) -> bool {
        TokenType::from(&self.kind) == token_type
    }
}

#[derive(Debug, Display, Clone, PartialEq, EnumDiscriminants)]
#[strum_discriminants(derive(Hash, Display))]
#[strum_discriminants(name(TokenType))]
pub enum TokenKind {
    Eof,

    // Identifiers and literals
    Ident(String),
    Number(String),
    Str(String),

    // Keywords
    Let,
    Func,
    Say,
    Return,
    If,
    Else,
    While,
    In,
    True,
    False,

    // Operators
    Assign,
    Eq,
    Plus,
    Minus,
    Asterisk,
    Slash,
    LT,
    GT,
    PipeOp,
    DotDot,

    // Delimiters
    Pipe,
    Colon,
    Comma,
    Semicolon,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
}

impl From<&str> for TokenKind {
    fn from(text: &str) -> Self {
        // Several keywords accept single-letter and short aliases.
        match text {
            "let" | "l" => Self::Let,
            "func" | "fn" => Self::Func,
            "say" | "print" | "p" => Self::Say,
            "return" | "ret" => Self::Return,
            "if" => Self::If,
            "else" | "e" => Self::Else,
            "while" => Self::While,
            "in" => Self::In,
            "true" => Self::True,
            "false" => Self::False,
            identifier => Self::Ident(identifier.to_owned()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        let cases = vec![
            ("let", TokenKind::Let),
            ("l", TokenKind::Let),
            ("func", TokenKind::Func),
            ("fn", TokenKind::Func),
            ("say", TokenKind::Say),
            ("print", TokenKind::Say),
            ("p", TokenKind::Say),
            ("return", TokenKind::Return),
            ("ret", TokenKind::Return),
            ("in", TokenKind::In),
            ("true", TokenKind::True),
            ("squares", TokenKind::Ident("squares".to_owned())),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(TokenKind::from(input), expected);
        }
    }

    #[test]
    fn test_token_type_discriminants() {
        let token = Token {
            kind: TokenKind::Ident("row".to_owned()),
            line: 1,
            column: 1,
        };
        assert!(token.is(TokenType::Ident));
        assert!(!token.is(TokenType::Number));
    }
}
