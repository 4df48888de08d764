use tracing::debug;

use crate::env::Frames;
use crate::error::BelResult;
use crate::symbol::sym;
use crate::value::{BelValue, FrameId, Form, Prim};

/// Build a fresh global environment in `frames` and return its root frame.
///
/// Pre-installs:
///   - special forms: quote set define lambda if
///   - primitives: + - cons car cdr
pub fn build_globals(frames: &mut Frames) -> BelResult<FrameId> {
    let globe = frames.push(None)?;

    let forms = [
        (sym::QUOTE, Form::Quote),
        (sym::SET, Form::Set),
        (sym::DEFINE, Form::Define),
        (sym::LAMBDA, Form::Lambda),
        (sym::IF, Form::If),
    ];
    for (name, form) in forms {
        frames.bind(globe, name, BelValue::Form(form));
    }

    let prims = [
        (sym::PLUS, Prim::Add),
        (sym::MINUS, Prim::Sub),
        (sym::CONS, Prim::Cons),
        (sym::CAR, Prim::Car),
        (sym::CDR, Prim::Cdr),
    ];
    for (name, prim) in prims {
        frames.bind(globe, name, BelValue::Prim(prim));
    }

    debug!(frame = globe.0, bindings = frames.get(globe).len(), "built global environment");
    Ok(globe)
}
