//! A small Bel-flavoured Lisp.
//!
//! Source text goes through the [`lexer`] and [`reader`] into values on the
//! cons-cell [`heap`]; [`eval::Machine`] evaluates them against an explicit
//! environment frame built by [`globals::build_globals`].
//!
//! ```
//! use bel::config::Config;
//! use bel::eval::Machine;
//! use bel::value::BelValue;
//!
//! let mut machine = Machine::new(&Config::default());
//! let env = machine.global_env().unwrap();
//! let val = machine.run("(define double (x) (+ x x)) (double 4)", env).unwrap();
//! assert_eq!(val, BelValue::Int(8));
//! ```

pub mod chars;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod globals;
pub mod heap;
pub mod lexer;
pub mod primitives;
pub mod printer;
pub mod reader;
pub mod symbol;
pub mod value;
