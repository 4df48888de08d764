use tracing::{debug, trace};

use crate::config::Config;
use crate::env::Frames;
use crate::error::{BelError, BelResult};
use crate::globals;
use crate::heap::Heap;
use crate::primitives;
use crate::printer;
use crate::reader;
use crate::symbol::{sym, SymbolTable};
use crate::value::{arena_index, BelValue, ClosureId, FrameId, Form};

/// A user-defined procedure: defining frame, parameters and body.
#[derive(Debug, Clone, Copy)]
pub struct Closure {
    pub frame: FrameId,
    /// A single symbol (collects all arguments) or a proper list of symbols.
    pub params: BelValue,
    /// Proper list of body expressions.
    pub body: BelValue,
}

/// The evaluation machine.
/// Owns every arena values point into; environments are passed explicitly.
pub struct Machine {
    pub heap: Heap,
    pub symbols: SymbolTable,
    pub frames: Frames,
    closures: Vec<Closure>,

    /// Step counter for the current top-level evaluation.
    pub fuel: u64,
    pub max_fuel: u64,
    /// Print character lists as strings.
    pub print_strings: bool,
}

impl Machine {
    pub fn new(config: &Config) -> Self {
        Machine {
            heap: Heap::new(config.heap_capacity),
            symbols: SymbolTable::new(),
            frames: Frames::new(),
            closures: Vec::new(),
            fuel: 0,
            max_fuel: config.max_fuel,
            print_strings: config.print_strings,
        }
    }

    /// Build a fresh global environment and return its root frame.
    pub fn global_env(&mut self) -> BelResult<FrameId> {
        globals::build_globals(&mut self.frames)
    }

    /// Read every top-level expression in `input`.
    pub fn read(&mut self, input: &str) -> BelResult<Vec<BelValue>> {
        reader::read_all(input, &mut self.heap, &mut self.symbols)
    }

    /// Read and evaluate a whole program, returning the last value.
    pub fn run(&mut self, input: &str, env: FrameId) -> BelResult<BelValue> {
        let exprs = self.read(input)?;
        self.eval_all(&exprs, env)
    }

    /// Print a value using the machine's print mode.
    pub fn print(&self, val: BelValue) -> String {
        printer::print_val(val, &self.heap, &self.symbols, self.print_strings)
    }

    /// Structural equality.
    pub fn equal(&self, a: BelValue, b: BelValue) -> bool {
        self.heap.equal(a, b)
    }

    pub fn closure(&self, id: ClosureId) -> &Closure {
        &self.closures[id.0 as usize]
    }

    // ========================================================================
    // Core evaluation entry points
    // ========================================================================

    /// Evaluate expressions in order against `env`; only the last value is
    /// returned. An empty sequence evaluates to nil.
    pub fn eval_all(&mut self, exprs: &[BelValue], env: FrameId) -> BelResult<BelValue> {
        self.fuel = 0;
        let mut result = BelValue::Nil;
        for &expr in exprs {
            result = self.eval(expr, env)?;
        }
        Ok(result)
    }

    /// Evaluate one expression in `env`.
    pub fn eval(&mut self, expr: BelValue, env: FrameId) -> BelResult<BelValue> {
        self.tick()?;
        trace!(?expr, frame = env.0, "eval");

        match expr {
            BelValue::Nil | BelValue::Int(_) | BelValue::Char(_) => Ok(expr),
            BelValue::Symbol(name) => self
                .frames
                .lookup(env, name)
                .ok_or_else(|| BelError::Unbound(self.symbols.name(name).to_string())),
            BelValue::Pair(id) => {
                let head = self.heap.car(id);
                let operands = self.heap.cdr(id);
                let op = self.eval(head, env)?;
                match op {
                    BelValue::Form(form) => self.eval_form(form, operands, env),
                    _ => {
                        let args = self.eval_args(operands, env)?;
                        self.apply(op, args)
                    }
                }
            }
            BelValue::Form(_) | BelValue::Prim(_) | BelValue::Closure(_) => Err(BelError::Malformed(
                format!("{} is not an expression", self.print(expr)),
            )),
        }
    }

    /// Apply a procedure to an evaluated argument list.
    pub fn apply(&mut self, f: BelValue, args: BelValue) -> BelResult<BelValue> {
        match f {
            BelValue::Prim(prim) => {
                trace!(prim = prim.name(), "apply primitive");
                primitives::call_primitive(prim, args, &mut self.heap)
            }
            BelValue::Closure(id) => self.apply_closure(id, args),
            BelValue::Form(form) => Err(BelError::Internal(format!(
                "special form {} reached apply",
                form.name()
            ))),
            other => Err(BelError::NotAProcedure(self.print(other))),
        }
    }

    fn tick(&mut self) -> BelResult<()> {
        self.fuel += 1;
        if self.fuel > self.max_fuel {
            return Err(BelError::FuelExhausted);
        }
        Ok(())
    }

    /// Evaluate each operand left to right into a fresh list.
    fn eval_args(&mut self, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        let mut values = Vec::new();
        let mut current = operands;
        loop {
            match current {
                BelValue::Nil => break,
                BelValue::Pair(id) => {
                    let operand = self.heap.car(id);
                    values.push(self.eval(operand, env)?);
                    current = self.heap.cdr(id);
                }
                _ => {
                    return Err(BelError::Malformed(
                        "arguments must form a proper list".into(),
                    ))
                }
            }
        }
        self.heap.list(&values)
    }

    // ========================================================================
    // Closures
    // ========================================================================

    fn make_closure(
        &mut self,
        frame: FrameId,
        params: BelValue,
        body: BelValue,
    ) -> BelResult<BelValue> {
        let id = ClosureId(arena_index(self.closures.len())?);
        self.closures.push(Closure { frame, params, body });
        debug!(closure = id.0, frame = frame.0, "made closure");
        Ok(BelValue::Closure(id))
    }

    fn apply_closure(&mut self, id: ClosureId, args: BelValue) -> BelResult<BelValue> {
        let Closure { frame, params, body } = *self.closure(id);
        let local = self.frames.push(Some(frame))?;
        debug!(closure = id.0, frame = local.0, outer = frame.0, "apply closure");

        self.bind_params(local, params, args)?;
        self.eval_body(body, local)
    }

    /// Bind parameters in `local`: a lone symbol takes the whole argument
    /// list, a list of symbols binds positionally.
    fn bind_params(&mut self, local: FrameId, params: BelValue, args: BelValue) -> BelResult<()> {
        if let BelValue::Symbol(name) = params {
            trace!(param = self.symbols.name(name), "bind rest parameter");
            self.frames.bind(local, name, args);
            return Ok(());
        }

        let mut pat = params;
        let mut arg = args;
        loop {
            match (pat, arg) {
                (BelValue::Nil, BelValue::Nil) => return Ok(()),
                (BelValue::Nil, _) => return Err(BelError::OverArgs),
                (BelValue::Pair(_), BelValue::Nil) => return Err(BelError::UnderArgs),
                (BelValue::Pair(pid), BelValue::Pair(aid)) => {
                    let name = self.heap.car(pid).as_symbol().ok_or_else(|| {
                        BelError::Malformed("parameters must be symbols".into())
                    })?;
                    let val = self.heap.car(aid);
                    trace!(param = self.symbols.name(name), value = ?val, "bind parameter");
                    self.frames.bind(local, name, val);
                    pat = self.heap.cdr(pid);
                    arg = self.heap.cdr(aid);
                }
                _ => return Err(BelError::Malformed("bad parameter list".into())),
            }
        }
    }

    /// Evaluate body expressions in order, returning the last value.
    fn eval_body(&mut self, body: BelValue, env: FrameId) -> BelResult<BelValue> {
        let mut result = BelValue::Nil;
        let mut current = body;
        while let BelValue::Pair(id) = current {
            let expr = self.heap.car(id);
            result = self.eval(expr, env)?;
            current = self.heap.cdr(id);
        }
        Ok(result)
    }

    // ========================================================================
    // Special forms: operands arrive unevaluated
    // ========================================================================

    fn eval_form(&mut self, form: Form, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        trace!(form = form.name(), "special form");
        match form {
            Form::Quote => self.form_quote(operands),
            Form::Set => self.form_set(operands, env),
            Form::Define => self.form_define(operands, env),
            Form::Lambda => self.form_lambda(operands, env),
            Form::If => self.form_if(operands, env),
        }
    }

    fn operand_vec(&self, form: Form, operands: BelValue) -> BelResult<Vec<BelValue>> {
        self.heap.list_to_vec(operands).ok_or_else(|| {
            BelError::Malformed(format!("{} operands must form a proper list", form.name()))
        })
    }

    /// (quote x) -> x, unevaluated.
    fn form_quote(&mut self, operands: BelValue) -> BelResult<BelValue> {
        match self.operand_vec(Form::Quote, operands)?.as_slice() {
            [x] => Ok(*x),
            _ => Err(BelError::Malformed("quote takes exactly one operand".into())),
        }
    }

    /// (set name expr): bind in the current frame, return the value.
    fn form_set(&mut self, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        let (target, expr) = match self.operand_vec(Form::Set, operands)?.as_slice() {
            [target, expr] => (*target, *expr),
            _ => return Err(BelError::Malformed("set takes a name and a value".into())),
        };
        let name = target.as_symbol().ok_or_else(|| {
            BelError::TypeError(format!("cannot set a {}", target.kind()))
        })?;
        let val = self.eval(expr, env)?;
        debug!(name = self.symbols.name(name), frame = env.0, "set");
        self.frames.bind(env, name, val);
        Ok(val)
    }

    /// (define name params body...) -> (set name (lambda params body...))
    fn form_define(&mut self, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        let (name, lambda_tail) = match operands {
            BelValue::Pair(id) => (self.heap.car(id), self.heap.cdr(id)),
            _ => return Err(BelError::Malformed("define needs a name".into())),
        };
        if !lambda_tail.is_pair() {
            return Err(BelError::Malformed("define needs a parameter list".into()));
        }
        let lambda = self.heap.cons(BelValue::Symbol(sym::LAMBDA), lambda_tail)?;
        let set = self.heap.list(&[BelValue::Symbol(sym::SET), name, lambda])?;
        self.eval(set, env)
    }

    /// (lambda params body...) -> closure over the current frame.
    fn form_lambda(&mut self, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        let (params, body) = match operands {
            BelValue::Pair(id) => (self.heap.car(id), self.heap.cdr(id)),
            _ => return Err(BelError::Malformed("lambda needs a parameter list".into())),
        };
        self.check_params(params)?;
        if !self.heap.is_proper_list(body) {
            return Err(BelError::Malformed("lambda body must be a proper list".into()));
        }
        self.make_closure(env, params, body)
    }

    fn check_params(&self, params: BelValue) -> BelResult<()> {
        if params.as_symbol().is_some() {
            return Ok(());
        }
        let names = self.heap.list_to_vec(params).ok_or_else(|| {
            BelError::Malformed("parameters must be a symbol or a proper list".into())
        })?;
        if names.iter().all(|p| p.as_symbol().is_some()) {
            Ok(())
        } else {
            Err(BelError::Malformed("parameters must be symbols".into()))
        }
    }

    /// (if c1 e1 c2 e2 ... [else]): the first non-nil condition picks its
    /// branch; a trailing odd operand is the else branch; otherwise nil.
    fn form_if(&mut self, operands: BelValue, env: FrameId) -> BelResult<BelValue> {
        let clauses = self.operand_vec(Form::If, operands)?;
        if clauses.is_empty() {
            return Err(BelError::Malformed("if needs at least one operand".into()));
        }

        let mut rest = clauses.as_slice();
        loop {
            match rest {
                [] => return Ok(BelValue::Nil),
                [otherwise] => return self.eval(*otherwise, env),
                [test, then, tail @ ..] => {
                    if !self.eval(*test, env)?.is_nil() {
                        return self.eval(*then, env);
                    }
                    rest = tail;
                }
            }
        }
    }
}
