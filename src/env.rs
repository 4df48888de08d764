use std::collections::HashMap;

use crate::error::BelResult;
use crate::value::{arena_index, BelValue, FrameId, SymbolId};

/// One link in an environment chain.
#[derive(Debug, Default)]
pub struct Frame {
    outer: Option<FrameId>,
    bindings: HashMap<SymbolId, BelValue>,
}

impl Frame {
    pub fn outer(&self) -> Option<FrameId> {
        self.outer
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Arena of environment frames. Frames are addressed by stable index, so
/// closures and child frames can share a parent without owning it.
#[derive(Debug, Default)]
pub struct Frames {
    frames: Vec<Frame>,
}

impl Frames {
    pub fn new() -> Self {
        Frames { frames: Vec::new() }
    }

    /// Create a frame whose lookups fall back to `outer`. The outer link is
    /// fixed here and never changes, so chains stay acyclic.
    pub fn push(&mut self, outer: Option<FrameId>) -> BelResult<FrameId> {
        let id = FrameId(arena_index(self.frames.len())?);
        self.frames.push(Frame {
            outer,
            bindings: HashMap::new(),
        });
        Ok(id)
    }

    pub fn get(&self, id: FrameId) -> &Frame {
        &self.frames[id.0 as usize]
    }

    /// Walk outward from `frame`; the innermost binding wins.
    pub fn lookup(&self, frame: FrameId, name: SymbolId) -> Option<BelValue> {
        let mut current = Some(frame);
        while let Some(id) = current {
            let frame = self.get(id);
            if let Some(&val) = frame.bindings.get(&name) {
                return Some(val);
            }
            current = frame.outer;
        }
        None
    }

    /// Bind `name` in exactly this frame, shadowing any outer binding.
    pub fn bind(&mut self, frame: FrameId, name: SymbolId, val: BelValue) {
        self.frames[frame.0 as usize].bindings.insert(name, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: SymbolId = SymbolId(100);
    const Y: SymbolId = SymbolId(101);

    #[test]
    fn lookup_falls_back_to_outer_frames() {
        let mut frames = Frames::new();
        let global = frames.push(None).unwrap();
        let local = frames.push(Some(global)).unwrap();
        frames.bind(global, X, BelValue::Int(1));

        assert_eq!(frames.lookup(local, X), Some(BelValue::Int(1)));
        assert_eq!(frames.lookup(local, Y), None);
        assert_eq!(frames.get(local).outer(), Some(global));
    }

    #[test]
    fn inner_bindings_shadow_outer_ones() {
        let mut frames = Frames::new();
        let global = frames.push(None).unwrap();
        let local = frames.push(Some(global)).unwrap();
        frames.bind(global, X, BelValue::Int(1));
        frames.bind(local, X, BelValue::Int(2));

        assert_eq!(frames.lookup(local, X), Some(BelValue::Int(2)));
        assert_eq!(frames.lookup(global, X), Some(BelValue::Int(1)));
    }

    #[test]
    fn bind_only_touches_the_given_frame() {
        let mut frames = Frames::new();
        let global = frames.push(None).unwrap();
        let local = frames.push(Some(global)).unwrap();
        frames.bind(local, Y, BelValue::Nil);

        assert!(frames.get(global).is_empty());
        assert_eq!(frames.get(local).len(), 1);
        assert_eq!(frames.lookup(global, Y), None);
        assert_eq!(frames.lookup(local, Y), Some(BelValue::Nil));
    }
}
