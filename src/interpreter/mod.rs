pub mod environment;
pub mod error;
pub mod evaluator;
pub mod natives;
pub mod parser;
pub mod units;

pub use environment::Environment;
pub use error::RuntimeError;
pub use evaluator::{
    parse_and_run, parse_and_run_with_diagnostics, parse_program, Interpreter,
};
pub use natives::NativeRegistry;
pub use parser::{ParseError, Parser};
