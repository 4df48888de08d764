use tracing::debug;

use crate::chars::CharTable;
use crate::error::{BelError, BelResult};
use crate::heap::Heap;
use crate::lexer::Lexer;
use crate::symbol::{sym, SymbolTable};
use crate::value::BelValue;

/// Recursive-descent reader: turns the lexer's tokens into values.
pub struct Reader<'a> {
    lexer: Lexer<'a>,
    heap: &'a mut Heap,
    symbols: &'a mut SymbolTable,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a str, heap: &'a mut Heap, symbols: &'a mut SymbolTable) -> BelResult<Self> {
        Ok(Reader {
            lexer: Lexer::new(input)?,
            heap,
            symbols,
        })
    }

    /// Read one expression. Returns None at EOF.
    pub fn read(&mut self) -> BelResult<Option<BelValue>> {
        if self.lexer.at_end() {
            return Ok(None);
        }
        self.read_expr().map(Some)
    }

    /// Read all expressions from input, in source order.
    pub fn read_all(&mut self) -> BelResult<Vec<BelValue>> {
        let mut results = Vec::new();
        while let Some(val) = self.read()? {
            results.push(val);
        }
        debug!(count = results.len(), "read top-level expressions");
        Ok(results)
    }

    fn read_expr(&mut self) -> BelResult<BelValue> {
        let tok = self
            .lexer
            .current()
            .ok_or_else(|| BelError::ReadError("unexpected end of input".into()))?
            .to_string();

        match tok.as_str() {
            "'" => {
                self.lexer.advance()?;
                self.read_quote()
            }
            "(" => {
                self.lexer.advance()?;
                self.read_list()
            }
            ")" => Err(BelError::ReadError("unexpected ')'".into())),
            "." => Err(BelError::ReadError("unexpected '.'".into())),
            t if t.starts_with('"') => {
                let val = self.read_string(t)?;
                self.lexer.advance()?;
                Ok(val)
            }
            t => {
                let val = self.read_atom(t);
                self.lexer.advance()?;
                Ok(val)
            }
        }
    }

    /// 'expr -> (quote expr)
    fn read_quote(&mut self) -> BelResult<BelValue> {
        let expr = self.read_expr()?;
        self.heap.list(&[BelValue::Symbol(sym::QUOTE), expr])
    }

    /// Read the rest of a list after its '(': (a b c), (a . b) or (a b . c).
    fn read_list(&mut self) -> BelResult<BelValue> {
        let mut elements = Vec::new();
        let mut tail = BelValue::Nil;

        loop {
            match self.lexer.current() {
                None => return Err(BelError::ReadError("unterminated list".into())),
                Some(")") => {
                    self.lexer.advance()?;
                    break;
                }
                Some(".") if !elements.is_empty() => {
                    self.lexer.advance()?;
                    tail = self.read_expr()?;
                    if self.lexer.current() != Some(")") {
                        return Err(BelError::ReadError("expected ')' after dotted tail".into()));
                    }
                    self.lexer.advance()?;
                    break;
                }
                Some(_) => elements.push(self.read_expr()?),
            }
        }

        self.heap.list_with_tail(&elements, tail)
    }

    /// Read a string token into a list of characters. `\"` and `\\` drop
    /// the backslash; the empty string is nil.
    fn read_string(&mut self, tok: &str) -> BelResult<BelValue> {
        let body = &tok[1..tok.len() - 1];
        let mut chars = Vec::new();
        let mut iter = body.chars().peekable();

        while let Some(ch) = iter.next() {
            if ch == '\\' {
                if let Some(&esc) = iter.peek() {
                    if esc == '"' || esc == '\\' {
                        iter.next();
                        chars.push(BelValue::Char(esc));
                        continue;
                    }
                }
            }
            chars.push(BelValue::Char(ch));
        }

        self.heap.list(&chars)
    }

    /// nil, integer, character or symbol.
    fn read_atom(&mut self, tok: &str) -> BelValue {
        if tok == "nil" {
            return BelValue::Nil;
        }
        if let Ok(n) = tok.parse::<i64>() {
            return BelValue::Int(n);
        }
        if let Some(body) = tok.strip_prefix('\\') {
            return BelValue::Char(CharTable::decode(body));
        }
        BelValue::Symbol(self.symbols.intern(tok))
    }
}

/// Read a single expression from a string.
pub fn read_str(input: &str, heap: &mut Heap, symbols: &mut SymbolTable) -> BelResult<BelValue> {
    let mut reader = Reader::new(input, heap, symbols)?;
    reader.read()?.ok_or_else(|| BelError::ReadError("empty input".into()))
}

/// Read all expressions from a string.
pub fn read_all(input: &str, heap: &mut Heap, symbols: &mut SymbolTable) -> BelResult<Vec<BelValue>> {
    let mut reader = Reader::new(input, heap, symbols)?;
    reader.read_all()
}
