use drim::interpreter::{parse_program, Interpreter, RuntimeError};
use std::io::Cursor;

/// Runs `source` feeding `input` to its drim statements; returns the output
/// captured so far along with how the run ended.
pub fn try_run(source: &str, input: &str) -> (String, Result<(), RuntimeError>) {
    let statements = parse_program(source).expect("program should parse");
    let mut out = Vec::new();
    let result = {
        let mut interpreter = Interpreter::with_io(
            Box::new(Cursor::new(input.to_string())),
            Box::new(&mut out),
        );
        interpreter.run(&statements)
    };
    (
        String::from_utf8(out).expect("output should be utf-8"),
        result,
    )
}

pub fn run_with_input(source: &str, input: &str) -> String {
    let (output, result) = try_run(source, input);
    result.expect("program should run");
    output
}

pub fn run_program(source: &str) -> String {
    run_with_input(source, "")
}

pub fn run_failure(source: &str) -> RuntimeError {
    try_run(source, "").1.expect_err("program should fail")
}
