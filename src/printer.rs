use crate::heap::Heap;
use crate::symbol::SymbolTable;
use crate::value::BelValue;

/// Print a value to a string.
///
/// Cdr chains are walked iteratively; nesting in car position recurses,
/// so the output always reads back to an equal value.
///
/// With `strings` set, a non-empty proper list made only of characters is
/// printed as a double-quoted string; otherwise it prints as a list of
/// character literals.
pub fn print_val(val: BelValue, heap: &Heap, symbols: &SymbolTable, strings: bool) -> String {
    let mut out = String::new();
    print_inner(val, heap, symbols, strings, &mut out);
    out
}

fn print_inner(
    val: BelValue,
    heap: &Heap,
    symbols: &SymbolTable,
    strings: bool,
    out: &mut String,
) {
    match val {
        BelValue::Nil => out.push_str("()"),
        BelValue::Int(n) => out.push_str(&n.to_string()),
        BelValue::Char(c) => {
            out.push('\\');
            out.push(c);
        }
        BelValue::Symbol(id) => out.push_str(symbols.name(id)),
        BelValue::Form(form) => {
            out.push_str("#<form ");
            out.push_str(form.name());
            out.push('>');
        }
        BelValue::Prim(prim) => {
            out.push_str("#<prim ");
            out.push_str(prim.name());
            out.push('>');
        }
        BelValue::Closure(_) => out.push_str("#<closure>"),
        BelValue::Pair(id) => {
            if strings && is_string(val, heap) {
                print_string(val, heap, out);
                return;
            }

            out.push('(');
            print_inner(heap.car(id), heap, symbols, strings, out);

            let mut current = heap.cdr(id);
            loop {
                match current {
                    BelValue::Nil => break,
                    BelValue::Pair(pid) => {
                        out.push(' ');
                        print_inner(heap.car(pid), heap, symbols, strings, out);
                        current = heap.cdr(pid);
                    }
                    tail => {
                        out.push_str(" . ");
                        print_inner(tail, heap, symbols, strings, out);
                        break;
                    }
                }
            }
            out.push(')');
        }
    }
}

/// Check if a value is a non-empty proper list of characters.
fn is_string(val: BelValue, heap: &Heap) -> bool {
    let mut current = val;
    let mut has_chars = false;
    loop {
        match current {
            BelValue::Nil => return has_chars,
            BelValue::Pair(id) => {
                if !heap.car(id).is_char() {
                    return false;
                }
                has_chars = true;
                current = heap.cdr(id);
            }
            _ => return false,
        }
    }
}

/// Print a character list as a string.
fn print_string(val: BelValue, heap: &Heap, out: &mut String) {
    out.push('"');
    let mut current = val;
    while let BelValue::Pair(id) = current {
        if let BelValue::Char(c) = heap.car(id) {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        current = heap.cdr(id);
    }
    out.push('"');
}
