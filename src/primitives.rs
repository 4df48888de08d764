use crate::error::{BelError, BelResult};
use crate::heap::Heap;
use crate::value::{BelValue, Prim};

/// Dispatch a primitive call on an already-evaluated argument list.
///
/// Arities:
///   variadic: + -
///   2 args:   cons
///   1 arg:    car cdr
pub fn call_primitive(prim: Prim, args: BelValue, heap: &mut Heap) -> BelResult<BelValue> {
    let args = heap
        .list_to_vec(args)
        .ok_or_else(|| BelError::Internal(format!("{} applied to an improper argument list", prim.name())))?;

    match prim {
        Prim::Add => prim_add(&args),
        Prim::Sub => prim_sub(&args),
        Prim::Cons => {
            let [a, b] = fixed_args::<2>(&args)?;
            heap.cons(a, b)
        }
        Prim::Car => {
            let [a] = fixed_args::<1>(&args)?;
            prim_car(a, heap)
        }
        Prim::Cdr => {
            let [a] = fixed_args::<1>(&args)?;
            prim_cdr(a, heap)
        }
    }
}

fn fixed_args<const N: usize>(args: &[BelValue]) -> BelResult<[BelValue; N]> {
    if args.len() < N {
        return Err(BelError::UnderArgs);
    }
    if args.len() > N {
        return Err(BelError::OverArgs);
    }
    let mut out = [BelValue::Nil; N];
    out.copy_from_slice(args);
    Ok(out)
}

fn int_arg(prim: &str, val: BelValue) -> BelResult<i64> {
    val.as_int()
        .ok_or_else(|| BelError::TypeError(format!("{} expects integers, got {}", prim, val.kind())))
}

fn overflow(prim: &str) -> BelError {
    BelError::TypeError(format!("integer overflow in {}", prim))
}

/// (+ a b ...): sum, 0 for no arguments.
fn prim_add(args: &[BelValue]) -> BelResult<BelValue> {
    let mut sum: i64 = 0;
    for &arg in args {
        sum = sum.checked_add(int_arg("+", arg)?).ok_or_else(|| overflow("+"))?;
    }
    Ok(BelValue::Int(sum))
}

/// (- a b ...): 0 for no arguments, negation for one, left fold otherwise.
fn prim_sub(args: &[BelValue]) -> BelResult<BelValue> {
    let (first, rest) = match args.split_first() {
        Some(split) => split,
        None => return Ok(BelValue::Int(0)),
    };
    let first = int_arg("-", *first)?;
    if rest.is_empty() {
        return first.checked_neg().map(BelValue::Int).ok_or_else(|| overflow("-"));
    }
    let mut result = first;
    for &arg in rest {
        result = result.checked_sub(int_arg("-", arg)?).ok_or_else(|| overflow("-"))?;
    }
    Ok(BelValue::Int(result))
}

fn prim_car(a: BelValue, heap: &Heap) -> BelResult<BelValue> {
    match a {
        BelValue::Pair(id) => Ok(heap.car(id)),
        other => Err(BelError::TypeError(format!("car of {}", other.kind()))),
    }
}

fn prim_cdr(a: BelValue, heap: &Heap) -> BelResult<BelValue> {
    match a {
        BelValue::Pair(id) => Ok(heap.cdr(id)),
        other => Err(BelError::TypeError(format!("cdr of {}", other.kind()))),
    }
}
