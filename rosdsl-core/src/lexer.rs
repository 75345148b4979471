//! Tokenizer for the indentation based configuration language.
//!
//! Indentation changes are turned into explicit `Indent`/`Dedent` tokens so
//! the parser can stay a plain recursive descent over a token list. Newlines
//! and indentation inside `[...]` are ignored so lists may span lines.

use std::str::Chars;

use crate::parser::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Bare name, possibly containing dots (`wan.address`).
    Ident(String),
    Str(String),
    Number(i64),
    Bool(bool),
    IpAddress(String),
    IpCidr(String),
    IpRange(String),
    Ipv6Address(String),
    Ipv6Cidr(String),
    Ipv6Range(String),
    Colon,
    Equals,
    LBracket,
    RBracket,
    Comma,
    Newline,
    Indent,
    Dedent,
    Eof,
}

impl Token {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Token::Ident(name) => format!("name '{name}'"),
            Token::Str(_) => "string".to_string(),
            Token::Number(n) => format!("number {n}"),
            Token::Bool(b) => format!("boolean {b}"),
            Token::IpAddress(v)
            | Token::IpCidr(v)
            | Token::IpRange(v)
            | Token::Ipv6Address(v)
            | Token::Ipv6Cidr(v)
            | Token::Ipv6Range(v) => format!("address {v}"),
            Token::Colon => "':'".to_string(),
            Token::Equals => "'='".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Newline => "end of line".to_string(),
            Token::Indent => "indentation".to_string(),
            Token::Dedent => "dedent".to_string(),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// Token with the 1-based position where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

pub struct Lexer<'a> {
    input: Chars<'a>,
    peek: Option<char>,
    line: usize,
    column: usize,
    indents: Vec<usize>,
    bracket_depth: usize,
    /// Set after `=` until end of line; changes how words are classified.
    in_value: bool,
    at_line_start: bool,
    tokens: Vec<Spanned>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            input: input.chars(),
            peek: None,
            line: 1,
            column: 1,
            indents: vec![0],
            bracket_depth: 0,
            in_value: false,
            at_line_start: true,
            tokens: Vec::new(),
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    /// Consume the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, ParseError> {
        loop {
            if self.at_line_start && self.bracket_depth == 0 {
                if !self.handle_line_start()? {
                    break;
                }
                continue;
            }

            self.skip_inline_space()?;
            let (line, column) = (self.line, self.column);
            let Some(ch) = self.peek else {
                break;
            };

            match ch {
                '\n' => {
                    self.bump();
                    if self.bracket_depth == 0 {
                        self.push(Token::Newline, line, column);
                        self.in_value = false;
                        self.at_line_start = true;
                    }
                }
                '#' => self.skip_line_comment(),
                ':' => {
                    self.bump();
                    self.push(Token::Colon, line, column);
                }
                '=' => {
                    self.bump();
                    self.in_value = true;
                    self.push(Token::Equals, line, column);
                }
                '[' => {
                    self.bump();
                    self.bracket_depth += 1;
                    self.push(Token::LBracket, line, column);
                }
                ']' => {
                    self.bump();
                    self.bracket_depth = self.bracket_depth.saturating_sub(1);
                    self.push(Token::RBracket, line, column);
                }
                ',' => {
                    self.bump();
                    self.push(Token::Comma, line, column);
                }
                '"' => {
                    let text = self.read_string(line, column)?;
                    self.push(Token::Str(text), line, column);
                }
                c if is_word_char(c) => {
                    let word = self.read_word();
                    let token = if self.in_value {
                        classify_value(&word)
                    } else {
                        Token::Ident(word)
                    };
                    self.push(token, line, column);
                }
                other => {
                    return Err(ParseError::UnexpectedCharacter {
                        found: other,
                        line,
                        column,
                    })
                }
            }
        }

        let (line, column) = (self.line, self.column);
        if self.tokens.last().is_some_and(|t| t.token != Token::Newline) {
            self.push(Token::Newline, line, column);
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(Token::Dedent, line, column);
        }
        self.push(Token::Eof, line, column);
        Ok(self.tokens)
    }

    /// Measure indentation of the next non-blank line and emit indent tokens.
    ///
    /// Returns false at end of input.
    fn handle_line_start(&mut self) -> Result<bool, ParseError> {
        let mut width = 0;
        while let Some(c) = self.peek {
            match c {
                ' ' => width += 1,
                '\t' => width += 4,
                _ => break,
            }
            self.bump();
        }

        match self.peek {
            None => return Ok(false),
            Some('\n') | Some('\r') => {
                self.bump();
                return Ok(true);
            }
            Some('#') => {
                self.skip_line_comment();
                if self.peek == Some('\n') {
                    self.bump();
                }
                return Ok(true);
            }
            Some('"') if self.block_comment_ahead() => {
                self.skip_block_comment()?;
                return Ok(true);
            }
            _ => {}
        }

        let (line, column) = (self.line, self.column);
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(Token::Indent, line, column);
        } else if width < current {
            while self.indents.last().is_some_and(|&level| level > width) {
                self.indents.pop();
                self.push(Token::Dedent, line, column);
            }
            if self.indents.last().copied().unwrap_or(0) != width {
                return Err(ParseError::InconsistentDedent { line });
            }
        }
        self.at_line_start = false;
        Ok(true)
    }

    fn push(&mut self, token: Token, line: usize, column: usize) {
        self.tokens.push(Spanned {
            token,
            line,
            column,
        });
    }

    fn bump(&mut self) -> Option<char> {
        let curr = self.peek;
        if let Some(c) = curr {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.peek = self.input.next();
        curr
    }

    fn skip_inline_space(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek {
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' if self.bracket_depth > 0 => {
                    self.bump();
                }
                '#' if self.bracket_depth > 0 => self.skip_line_comment(),
                '"' if self.block_comment_ahead() => self.skip_block_comment()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    fn block_comment_ahead(&self) -> bool {
        let mut ahead = self.input.clone();
        self.peek == Some('"') && ahead.next() == Some('"') && ahead.next() == Some('"')
    }

    /// Skip a `"""..."""` comment, which may span lines.
    fn skip_block_comment(&mut self) -> Result<(), ParseError> {
        let line = self.line;
        for _ in 0..3 {
            self.bump();
        }
        let mut quotes = 0;
        while let Some(c) = self.bump() {
            if c == '"' {
                quotes += 1;
                if quotes == 3 {
                    return Ok(());
                }
            } else {
                quotes = 0;
            }
        }
        Err(ParseError::UnterminatedComment { line })
    }

    fn read_string(&mut self, line: usize, column: usize) -> Result<String, ParseError> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(text),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some(other) => text.push(other),
                    None => return Err(ParseError::UnterminatedString { line, column }),
                },
                Some('\n') | None => return Err(ParseError::UnterminatedString { line, column }),
                Some(c) => text.push(c),
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(c) = self.peek {
            let accept = is_word_char(c) || (self.in_value && c == ':');
            if !accept {
                break;
            }
            word.push(c);
            self.bump();
        }
        word
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/')
}

/// Decide what a bare word in value position is.
fn classify_value(word: &str) -> Token {
    if let Ok(n) = word.parse::<i64>() {
        return Token::Number(n);
    }
    match word {
        "true" => return Token::Bool(true),
        "false" => return Token::Bool(false),
        _ => {}
    }
    if let Some((start, end)) = word.split_once('-') {
        if is_ipv4(start) && is_ipv4(end) {
            return Token::IpRange(word.to_string());
        }
        if is_ipv6(start) && is_ipv6(end) {
            return Token::Ipv6Range(word.to_string());
        }
    }
    if let Some((addr, prefix)) = word.split_once('/') {
        if let Ok(bits) = prefix.parse::<u8>() {
            if is_ipv4(addr) && bits <= 32 {
                return Token::IpCidr(word.to_string());
            }
            if is_ipv6(addr) && bits <= 128 {
                return Token::Ipv6Cidr(word.to_string());
            }
        }
    }
    if is_ipv4(word) {
        return Token::IpAddress(word.to_string());
    }
    if is_mac(word) {
        return Token::Ident(word.to_string());
    }
    if is_ipv6(word) {
        return Token::Ipv6Address(word.to_string());
    }
    Token::Ident(word.to_string())
}

fn is_ipv4(text: &str) -> bool {
    let parts: Vec<&str> = text.split('.').collect();
    parts.len() == 4
        && parts.iter().all(|part| {
            !part.is_empty()
                && part.len() <= 3
                && part.chars().all(|c| c.is_ascii_digit())
                && part.parse::<u16>().is_ok_and(|n| n <= 255)
        })
}

fn is_mac(text: &str) -> bool {
    let groups: Vec<&str> = text.split(':').collect();
    groups.len() == 6
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_ipv6(text: &str) -> bool {
    text.contains(':')
        && text.split(':').count() <= 8
        && text.chars().all(|c| c.is_ascii_hexdigit() || c == ':')
}
