use crate::token::{Token, TokenKind, TokenType};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexError

    UnexpectedCharacter{ch: char, line: usize, column: usize} = "unexpected character '{ch}' at {line}:{column}",
    UnterminatedString{line: usize, column: usize} = "unterminated string literal starting at {line}:{column}",
}

fn is_letter(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

pub struct Lexer {
    input: String,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(input: String) -> Self {
        let mut lexer = Self {
            input,
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
        };
        lexer.read_char();
        lexer
    }

    /// Eagerly lexes the whole input, ending with an Eof token.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.is(TokenType::Eof);
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.ch = *self.input.as_bytes().get(self.read_position).unwrap_or(&0);
        self.position = self.read_position;
        self.read_position += 1;
    }

    fn peek_char(&self) -> u8 {
        *self.input.as_bytes().get(self.read_position).unwrap_or(&0)
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia();

        let line = self.line;
        let column = self.column;

        let kind = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    TokenKind::Eq
                } else {
                    TokenKind::Assign
                }
            }
            b'|' => {
                if self.peek_char() == b'>' {
                    self.read_char();
                    TokenKind::PipeOp
                } else {
                    TokenKind::Pipe
                }
            }
            b'.' => {
                // A lone '.' has no meaning in the language; only the
                // two-character range operator is valid.
                if self.peek_char() == b'.' {
                    self.read_char();
                    TokenKind::DotDot
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: '.',
                        line,
                        column,
                    });
                }
            }
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Asterisk,
            b'/' => TokenKind::Slash,
            b'<' => TokenKind::LT,
            b'>' => TokenKind::GT,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b';' => TokenKind::Semicolon,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'"' => {
                let kind = self.read_string(line, column)?;
                return Ok(Token { kind, line, column });
            }
            0 => TokenKind::Eof,
            c => {
                if is_letter(c) {
                    let kind = TokenKind::from(self.read_identifier());
                    return Ok(Token { kind, line, column });
                } else if c.is_ascii_digit() {
                    let kind = TokenKind::Number(self.read_number());
                    return Ok(Token { kind, line, column });
                } else {
                    return Err(LexError::UnexpectedCharacter {
                        ch: c as char,
                        line,
                        column,
                    });
                }
            }
        };
        self.read_char();
        Ok(Token { kind, line, column })
    }

    fn read_identifier(&mut self) -> &str {
        let start = self.position;
        while is_letter(self.ch) || self.ch.is_ascii_digit() {
            self.read_char()
        }
        &self.input[start..self.position]
    }

    fn read_number(&mut self) -> String {
        let start = self.position;
        while self.ch.is_ascii_digit() {
            self.read_char()
        }
        // A fractional part only when a digit follows the dot, so that
        // `1..5` still lexes as NUMBER DOTDOT NUMBER.
        if self.ch == b'.' && self.peek_char().is_ascii_digit() {
            self.read_char();
            while self.ch.is_ascii_digit() {
                self.read_char()
            }
        }
        self.input[start..self.position].to_owned()
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<TokenKind, LexError> {
        self.read_char(); // opening quote
        let start = self.position;
        while self.ch != b'"' {
            if self.ch == 0 {
                return Err(LexError::UnterminatedString { line, column });
            }
            self.read_char();
        }
        let literal = self.input[start..self.position].to_owned();
        self.read_char(); // closing quote
        Ok(TokenKind::Str(literal))
    }

    fn skip_trivia(&mut self) {
        loop {
            if self.ch.is_ascii_whitespace() {
                self.read_char();
            } else if self.ch == b'#' {
                self.skip_line_comment();
            } else if self.ch == b'/' && self.peek_char() == b'/' {
                self.skip_line_comment();
            } else if self.ch == b'/' && self.peek_char() == b'*' {
                self.skip_block_comment();
            } else {
                break;
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while self.ch != b'\n' && self.ch != 0 {
            self.read_char();
        }
    }

    fn skip_block_comment(&mut self) {
        self.read_char();
        self.read_char();
        while self.ch != 0 {
            if self.ch == b'*' && self.peek_char() == b'/' {
                self.read_char();
                self.read_char();
                return;
            }
            self.read_char();
        }
    }
}
