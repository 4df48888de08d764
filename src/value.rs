use std::fmt;

use crate::error::{BelError, BelResult};

/// Unique identifier for an interned symbol.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// Index into the cons-cell heap.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairId(pub u32);

/// Index into the machine's environment frame arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub u32);

/// Index into the machine's closure table.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClosureId(pub u32);

/// Id for the next slot of an arena currently holding `len` entries.
/// Ids are 32-bit; an arena that outgrows them is full.
pub(crate) fn arena_index(len: usize) -> BelResult<u32> {
    u32::try_from(len).map_err(|_| BelError::HeapOverflow)
}

/// Operators whose operands reach the handler unevaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    Quote,
    Set,
    Define,
    Lambda,
    If,
}

/// Built-in procedures applied to already-evaluated arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Prim {
    Add,
    Sub,
    Cons,
    Car,
    Cdr,
}

impl Form {
    pub fn name(self) -> &'static str {
        match self {
            Form::Quote => "quote",
            Form::Set => "set",
            Form::Define => "define",
            Form::Lambda => "lambda",
            Form::If => "if",
        }
    }
}

impl Prim {
    pub fn name(self) -> &'static str {
        match self {
            Prim::Add => "+",
            Prim::Sub => "-",
            Prim::Cons => "cons",
            Prim::Car => "car",
            Prim::Cdr => "cdr",
        }
    }
}

/// The fundamental value. Copy semantics: pair data lives in the heap,
/// closures and frames live in the machine's tables.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum BelValue {
    Nil,
    Int(i64),
    Char(char),
    Symbol(SymbolId),
    Pair(PairId),
    Form(Form),
    Prim(Prim),
    Closure(ClosureId),
}

impl BelValue {
    pub fn is_nil(self) -> bool {
        matches!(self, BelValue::Nil)
    }

    pub fn is_pair(self) -> bool {
        matches!(self, BelValue::Pair(_))
    }

    pub fn is_char(self) -> bool {
        matches!(self, BelValue::Char(_))
    }

    pub fn as_pair(self) -> Option<PairId> {
        match self {
            BelValue::Pair(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_symbol(self) -> Option<SymbolId> {
        match self {
            BelValue::Symbol(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            BelValue::Int(n) => Some(n),
            _ => None,
        }
    }

    /// Short kind name used in error messages.
    pub fn kind(self) -> &'static str {
        match self {
            BelValue::Nil => "nil",
            BelValue::Int(_) => "integer",
            BelValue::Char(_) => "character",
            BelValue::Symbol(_) => "symbol",
            BelValue::Pair(_) => "pair",
            BelValue::Form(_) => "special form",
            BelValue::Prim(_) => "primitive",
            BelValue::Closure(_) => "closure",
        }
    }
}

impl fmt::Debug for BelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BelValue::Nil => write!(f, "Nil"),
            BelValue::Int(n) => write!(f, "Int({})", n),
            BelValue::Char(c) => write!(f, "Char({:?})", c),
            BelValue::Symbol(id) => write!(f, "Sym({})", id.0),
            BelValue::Pair(id) => write!(f, "Pair({})", id.0),
            BelValue::Form(form) => write!(f, "Form({})", form.name()),
            BelValue::Prim(prim) => write!(f, "Prim({})", prim.name()),
            BelValue::Closure(id) => write!(f, "Closure({})", id.0),
        }
    }
}

impl fmt::Debug for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymbolId({})", self.0)
    }
}

impl fmt::Debug for PairId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairId({})", self.0)
    }
}

impl fmt::Debug for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameId({})", self.0)
    }
}

impl fmt::Debug for ClosureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClosureId({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nil_is_not_a_pair() {
        assert!(BelValue::Nil.is_nil());
        assert!(!BelValue::Nil.is_pair());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn arena_ids_stop_at_u32_max() {
        let last = u32::MAX as usize;
        assert_eq!(arena_index(0), Ok(0));
        assert_eq!(arena_index(last), Ok(u32::MAX));
        assert_eq!(arena_index(last + 1), Err(BelError::HeapOverflow));
    }

    #[test]
    fn names_match_source_syntax() {
        assert_eq!(Form::Lambda.name(), "lambda");
        assert_eq!(Prim::Sub.name(), "-");
        assert_eq!(format!("{:?}", BelValue::Prim(Prim::Add)), "Prim(+)");
    }
}
