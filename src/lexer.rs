//! Lexer for tokenizing preference declaration files
//!
//! Converts a character stream into tokens for the `pref()` declaration
//! syntax shared by `autoconfig.js`, `prefs.js` and the default-pref files
//! shipped with the browser. Handles the JavaScript escape sequences the
//! browser's own parser accepts and tracks line/column of every token for
//! error reporting.

use crate::error::{Error, Result};
use std::iter::Peekable;
use std::str::Chars;

/// Token types produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (pref, user_pref, lockPref, locked, sticky, ...)
    Identifier(String),
    /// String value with escape sequences already processed
    String(String),
    /// Integer literal (no fraction, no exponent)
    Integer(i64),
    /// Finite floating point literal
    Number(f64),
    Boolean(bool),
    Null,
    LeftParen,
    RightParen,
    Comma,
    Semicolon,
    Eof,
}

/// Lexer for tokenizing preference declaration files
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current line number (1-indexed)
    line: usize,
    /// Current column number (1-indexed)
    column: usize,
    /// Position where the last returned token started
    token_line: usize,
    token_column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Lexer {
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
        }
    }

    /// Line and column where the most recent token started
    pub fn token_position(&self) -> (usize, usize) {
        (self.token_line, self.token_column)
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace_and_comments()?;

        self.token_line = self.line;
        self.token_column = self.column;

        let c = match self.chars.peek() {
            Some(&c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            '(' => {
                self.bump();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.bump();
                Ok(Token::RightParen)
            }
            ',' => {
                self.bump();
                Ok(Token::Comma)
            }
            ';' => {
                self.bump();
                Ok(Token::Semicolon)
            }
            '"' | '\'' => self.lex_string(c),
            '-' | '+' | '0'..='9' => self.lex_number(),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.lex_identifier()),
            _ => Err(self.error(format!("Unexpected character: '{}'", c))),
        }
    }

    /// Consume one character, keeping line/column in sync
    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Lexer {
            line: self.line,
            column: self.column,
            message: message.into(),
        }
    }

    /// Skip whitespace, `//` and `#` line comments and `/* */` block comments
    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            while let Some(&c) = self.chars.peek() {
                if c.is_whitespace() {
                    self.bump();
                } else {
                    break;
                }
            }

            match self.chars.peek() {
                Some(&'#') => self.skip_line(),
                Some(&'/') => {
                    self.bump();
                    match self.chars.peek() {
                        Some(&'/') => self.skip_line(),
                        Some(&'*') => {
                            self.bump();
                            let (start_line, start_column) = (self.line, self.column);
                            loop {
                                match self.bump() {
                                    Some('*') if self.chars.peek() == Some(&'/') => {
                                        self.bump();
                                        break;
                                    }
                                    Some(_) => {}
                                    None => {
                                        return Err(Error::Lexer {
                                            line: start_line,
                                            column: start_column,
                                            message: "Unterminated block comment".to_string(),
                                        })
                                    }
                                }
                            }
                        }
                        _ => return Err(self.error("Unexpected character: '/'")),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    /// Lex an identifier or keyword (true, false, null)
    fn lex_identifier(&mut self) -> Token {
        let mut ident = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                ident.push(c);
                self.bump();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "true" => Token::Boolean(true),
            "false" => Token::Boolean(false),
            "null" => Token::Null,
            _ => Token::Identifier(ident),
        }
    }

    /// Lex a string literal delimited by `quote`
    fn lex_string(&mut self, quote: char) -> Result<Token> {
        let (start_line, start_column) = (self.line, self.column);
        self.bump();

        let mut result = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(Token::String(result)),
                Some('\\') => self.lex_escape(&mut result)?,
                Some(c) => result.push(c),
                None => {
                    return Err(Error::Lexer {
                        line: start_line,
                        column: start_column,
                        message: "Unterminated string literal".to_string(),
                    })
                }
            }
        }
    }

    /// Decode the escape sequence following a backslash
    fn lex_escape(&mut self, out: &mut String) -> Result<()> {
        match self.bump() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('0') => {
                if self.chars.peek() == Some(&'0') {
                    return Err(
                        self.error("Octal escape sequences are not supported. Use \\x00 instead.")
                    );
                }
                out.push('\x00');
            }
            Some('x') => {
                let code = self.lex_hex_digits(2)?;
                out.push(char::from(code as u8));
            }
            Some('u') => {
                let code = self.lex_hex_digits(4)?;
                out.push(char::from_u32(code).unwrap_or('\u{FFFD}'));
            }
            Some(c) => return Err(self.error(format!("Invalid escape sequence: \\{}", c))),
            None => return Err(self.error("Unexpected end of input in escape sequence")),
        }
        Ok(())
    }

    fn lex_hex_digits(&mut self, count: usize) -> Result<u32> {
        let mut hex = String::with_capacity(count);
        for _ in 0..count {
            match self.chars.peek() {
                Some(&c) if c.is_ascii_hexdigit() => {
                    hex.push(c);
                    self.bump();
                }
                _ => break,
            }
        }
        if hex.len() != count {
            return Err(self.error(format!("Incomplete hex escape: {}", hex)));
        }
        u32::from_str_radix(&hex, 16).map_err(|_| self.error(format!("Invalid hex escape: {}", hex)))
    }

    /// Lex a number (integer or float, including scientific notation)
    fn lex_number(&mut self) -> Result<Token> {
        let start_column = self.column;
        let mut num_str = String::new();
        let mut is_float = false;

        if let Some(&sign @ ('-' | '+')) = self.chars.peek() {
            num_str.push(sign);
            self.bump();
        }

        self.take_digits(&mut num_str);

        if self.chars.peek() == Some(&'.') {
            is_float = true;
            num_str.push('.');
            self.bump();
            self.take_digits(&mut num_str);
        }

        if let Some(&('e' | 'E')) = self.chars.peek() {
            is_float = true;
            num_str.push('e');
            self.bump();
            if let Some(&sign @ ('+' | '-')) = self.chars.peek() {
                num_str.push(sign);
                self.bump();
            }
            if self.take_digits(&mut num_str) == 0 {
                return Err(self.error("Missing exponent digits in scientific notation"));
            }
        }

        let error = |message: String| Error::Lexer {
            line: self.line,
            column: start_column,
            message,
        };

        if !is_float {
            return num_str
                .parse::<i64>()
                .map(Token::Integer)
                .map_err(|e| error(format!("Invalid integer {}: {}", num_str, e)));
        }

        match num_str.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Token::Number(n)),
            Ok(_) => Err(error(format!("Number out of range: {}", num_str))),
            Err(_) => Err(error(format!("Failed to parse number: {}", num_str))),
        }
    }

    fn take_digits(&mut self, out: &mut String) -> usize {
        let mut taken = 0;
        while let Some(&c) = self.chars.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            out.push(c);
            self.bump();
            taken += 1;
        }
        taken
    }
}
