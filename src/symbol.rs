use std::collections::HashMap;
use crate::value::SymbolId;

/// Interned symbol names. Equal names share one `SymbolId`, so comparing
/// symbols never touches the strings.
#[derive(Debug, Default)]
pub struct SymbolTable {
    ids: HashMap<String, SymbolId>,
    names: Vec<String>,
}

/// Names of the global operators, interned first so their ids are fixed.
pub mod sym {
    use crate::value::SymbolId;

    pub const QUOTE: SymbolId = SymbolId(0);
    pub const SET: SymbolId = SymbolId(1);
    pub const DEFINE: SymbolId = SymbolId(2);
    pub const LAMBDA: SymbolId = SymbolId(3);
    pub const IF: SymbolId = SymbolId(4);
    pub const PLUS: SymbolId = SymbolId(5);
    pub const MINUS: SymbolId = SymbolId(6);
    pub const CONS: SymbolId = SymbolId(7);
    pub const CAR: SymbolId = SymbolId(8);
    pub const CDR: SymbolId = SymbolId(9);

    /// Indexed by the constants above.
    pub(crate) const WELL_KNOWN: [&str; 10] = [
        "quote", "set", "define", "lambda", "if", "+", "-", "cons", "car", "cdr",
    ];
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = SymbolTable::default();
        for name in sym::WELL_KNOWN {
            table.intern(name);
        }
        table
    }

    pub fn intern(&mut self, name: &str) -> SymbolId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = SymbolId(self.names.len() as u32);
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    pub fn name(&self, id: SymbolId) -> &str {
        &self.names[id.0 as usize]
    }

    /// Find an already-interned name.
    pub fn lookup(&self, name: &str) -> Option<SymbolId> {
        self.ids.get(name).copied()
    }

    pub fn count(&self) -> usize {
        self.names.len()
    }
}
