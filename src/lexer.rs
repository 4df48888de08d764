use crate::error::{BelError, BelResult};

/// Splits source text into token strings with one token of lookahead.
///
/// Tokens carry no meaning yet; the reader decides whether `12` is an
/// integer or `\a` a character.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    current: Option<String>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> BelResult<Self> {
        let mut lexer = Lexer {
            input,
            pos: 0,
            current: None,
        };
        lexer.advance()?;
        Ok(lexer)
    }

    /// The token under the cursor, or None at end of input.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Move to the next token.
    pub fn advance(&mut self) -> BelResult<()> {
        self.current = self.scan()?;
        Ok(())
    }

    /// Rewind to the first token.
    pub fn reset(&mut self) -> BelResult<()> {
        self.pos = 0;
        self.advance()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.bump();
            } else if ch == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn scan(&mut self) -> BelResult<Option<String>> {
        self.skip_whitespace_and_comments();
        let start = self.pos;
        let ch = match self.bump() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        match ch {
            '"' => self.scan_string(start)?,
            '\\' => {
                // The next character always belongs to the literal, even a delimiter.
                if let Some(next) = self.bump() {
                    if is_ident_char(next) {
                        self.scan_ident_run();
                    }
                }
            }
            c if is_ident_char(c) => self.scan_ident_run(),
            _ => {}
        }

        Ok(Some(self.input[start..self.pos].to_string()))
    }

    fn scan_ident_run(&mut self) {
        while let Some(ch) = self.peek() {
            if !is_ident_char(ch) {
                break;
            }
            self.bump();
        }
    }

    /// Consume up to and including the closing quote. Escapes stay in the token.
    fn scan_string(&mut self, start: usize) -> BelResult<()> {
        loop {
            match self.bump() {
                Some('"') => return Ok(()),
                Some('\\') => {
                    if self.bump().is_none() {
                        break;
                    }
                }
                Some(_) => {}
                None => break,
            }
        }
        Err(BelError::ReadError(format!(
            "unterminated string starting at byte {}",
            start
        )))
    }
}

fn is_ident_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

/// Tokenize a whole input eagerly.
pub fn tokenize(input: &str) -> BelResult<Vec<String>> {
    let mut lexer = Lexer::new(input)?;
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.current() {
        tokens.push(tok.to_string());
        lexer.advance()?;
    }
    Ok(tokens)
}

/// Net count of open parentheses in `input`, counted over tokens so that
/// parens inside strings, character literals and comments are ignored.
///
/// An unterminated string is a `ReadError`; an interactive caller should
/// treat that as "more input needed".
pub fn paren_depth(input: &str) -> BelResult<i32> {
    let mut lexer = Lexer::new(input)?;
    let mut depth = 0;
    while let Some(tok) = lexer.current() {
        match tok {
            "(" => depth += 1,
            ")" => depth -= 1,
            _ => {}
        }
        lexer.advance()?;
    }
    Ok(depth)
}
