use crate::error::{BelError, BelResult};
use crate::value::{arena_index, BelValue, PairId};

/// A single cons cell on the heap. Never mutated once allocated.
#[derive(Debug, Clone, Copy)]
pub struct ConsCell {
    pub car: BelValue,
    pub cdr: BelValue,
}

/// The cons cell heap. All pairs are allocated here.
/// PairId is an index into `cells`.
#[derive(Debug)]
pub struct Heap {
    cells: Vec<ConsCell>,
    capacity: usize,
}

impl Heap {
    pub fn new(capacity: usize) -> Self {
        Heap {
            cells: Vec::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Allocate a new cons cell. Returns a PairId.
    /// Returns Err(HeapOverflow) if capacity is exceeded.
    pub fn alloc(&mut self, car: BelValue, cdr: BelValue) -> BelResult<PairId> {
        if self.cells.len() >= self.capacity {
            return Err(BelError::HeapOverflow);
        }

        let id = PairId(arena_index(self.cells.len())?);
        self.cells.push(ConsCell { car, cdr });
        Ok(id)
    }

    /// Allocate a pair and wrap it as a value.
    pub fn cons(&mut self, car: BelValue, cdr: BelValue) -> BelResult<BelValue> {
        Ok(BelValue::Pair(self.alloc(car, cdr)?))
    }

    #[inline]
    pub fn car(&self, id: PairId) -> BelValue {
        self.cells[id.0 as usize].car
    }

    #[inline]
    pub fn cdr(&self, id: PairId) -> BelValue {
        self.cells[id.0 as usize].cdr
    }

    /// Build a proper list from a slice of values.
    pub fn list(&mut self, values: &[BelValue]) -> BelResult<BelValue> {
        self.list_with_tail(values, BelValue::Nil)
    }

    /// Build a list from a slice of values ending in `tail` instead of nil.
    pub fn list_with_tail(&mut self, values: &[BelValue], tail: BelValue) -> BelResult<BelValue> {
        let mut result = tail;
        for &val in values.iter().rev() {
            result = self.cons(val, result)?;
        }
        Ok(result)
    }

    /// Returns true if this value is a proper list.
    pub fn is_proper_list(&self, val: BelValue) -> bool {
        let mut current = val;
        loop {
            match current {
                BelValue::Nil => return true,
                BelValue::Pair(id) => current = self.cdr(id),
                _ => return false,
            }
        }
    }

    /// Collect a proper list into a Vec. Returns None if not a proper list.
    pub fn list_to_vec(&self, val: BelValue) -> Option<Vec<BelValue>> {
        let mut result = Vec::new();
        let mut current = val;
        loop {
            match current {
                BelValue::Nil => return Some(result),
                BelValue::Pair(id) => {
                    result.push(self.car(id));
                    current = self.cdr(id);
                }
                _ => return None,
            }
        }
    }

    /// Structural equality: pairs compare by contents, everything else by
    /// identity. Walks the cdr chain iteratively.
    pub fn equal(&self, a: BelValue, b: BelValue) -> bool {
        let (mut a, mut b) = (a, b);
        loop {
            match (a, b) {
                (BelValue::Pair(x), BelValue::Pair(y)) => {
                    if x == y {
                        return true;
                    }
                    if !self.equal(self.car(x), self.car(y)) {
                        return false;
                    }
                    a = self.cdr(x);
                    b = self.cdr(y);
                }
                _ => return a == b,
            }
        }
    }

    /// Returns the number of allocated cells.
    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_builds_in_order() {
        let mut heap = Heap::new(16);
        let list = heap.list(&[BelValue::Int(1), BelValue::Int(2)]).unwrap();
        assert_eq!(
            heap.list_to_vec(list),
            Some(vec![BelValue::Int(1), BelValue::Int(2)])
        );
        assert!(heap.is_proper_list(list));
    }

    #[test]
    fn dotted_tail_is_not_a_proper_list() {
        let mut heap = Heap::new(16);
        let dotted = heap
            .list_with_tail(&[BelValue::Int(1)], BelValue::Int(2))
            .unwrap();
        assert!(!heap.is_proper_list(dotted));
        assert_eq!(heap.list_to_vec(dotted), None);
        assert!(heap.is_proper_list(BelValue::Nil));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut heap = Heap::new(1);
        assert!(heap.alloc(BelValue::Nil, BelValue::Nil).is_ok());
        assert_eq!(
            heap.alloc(BelValue::Nil, BelValue::Nil),
            Err(BelError::HeapOverflow)
        );
    }

    #[test]
    fn equality_is_structural_for_pairs() {
        let mut heap = Heap::new(64);
        let inner_a = heap.list(&[BelValue::Int(1)]).unwrap();
        let inner_b = heap.list(&[BelValue::Int(1)]).unwrap();
        let a = heap.list(&[inner_a, BelValue::Char('x')]).unwrap();
        let b = heap.list(&[inner_b, BelValue::Char('x')]).unwrap();
        let c = heap.list(&[inner_b, BelValue::Char('y')]).unwrap();
        assert!(heap.equal(a, b));
        assert!(!heap.equal(a, c));
        assert!(!heap.equal(a, BelValue::Nil));
        assert!(heap.equal(BelValue::Nil, BelValue::Nil));
    }
}
