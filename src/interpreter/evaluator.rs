use super::environment::Environment;
use super::error::RuntimeError;
use super::natives::NativeRegistry;
use super::parser::Parser;
use super::units;
use crate::ast::{BinaryOp, Expr, ExprKind, Stmt, UnaryOp};
use crate::diagnostic::{Diagnostic, Span};
use crate::value::Value;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Walks the AST. Owns the scope chain, the native-function registry and
/// the IO handles; nothing lives in process-wide state, so independent runs
/// can coexist and tests can capture output.
pub struct Interpreter<'io> {
    env: Environment,
    natives: NativeRegistry,
    input: Box<dyn BufRead + 'io>,
    output: Box<dyn Write + 'io>,
}

impl Interpreter<'static> {
    pub fn new() -> Self {
        Self::with_io(
            Box::new(io::BufReader::new(io::stdin())),
            Box::new(io::stdout()),
        )
    }
}

impl Default for Interpreter<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'io> Interpreter<'io> {
    pub fn with_io(input: Box<dyn BufRead + 'io>, output: Box<dyn Write + 'io>) -> Self {
        Self {
            env: Environment::new(),
            natives: NativeRegistry::new(),
            input,
            output,
        }
    }

    /// Executes the statements strictly in order. The first fatal condition
    /// aborts the run; whatever was already printed stays printed.
    pub fn run(&mut self, statements: &[Stmt]) -> Result<(), RuntimeError> {
        for statement in statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&mut self, statement: &Stmt) -> Result<(), RuntimeError> {
        match statement {
            Stmt::Input { name } => {
                // End of stream leaves the target unbound.
                if let Some(line) = self.read_line()? {
                    self.env.assign(name, parse_input(&line));
                }
                Ok(())
            }
            Stmt::Print(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "{}", value.to_text())
                    .map_err(|e| RuntimeError::io(e.to_string()))
            }
            Stmt::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value);
                Ok(())
            }
            Stmt::TypeQuery(expr) => {
                let value = self.evaluate(expr)?;
                writeln!(self.output, "<type '{}'>", value.type_name())
                    .map_err(|e| RuntimeError::io(e.to_string()))
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let cond = self.evaluate(condition)?;
                if cond.is_truthy() {
                    self.run(then_branch)
                } else if let Some(else_statements) = else_branch {
                    self.run(else_statements)
                } else {
                    Ok(())
                }
            }
            // Blocks run in the enclosing scope; a name first assigned
            // inside stays visible after the block.
            Stmt::Block(statements) => self.run(statements),
        }
    }

    fn read_line(&mut self) -> Result<Option<String>, RuntimeError> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .map_err(|e| RuntimeError::io(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(
            line.trim_end_matches('\n').trim_end_matches('\r').to_string(),
        ))
    }

    fn evaluate(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match &expr.kind {
            ExprKind::Literal(value) => Ok(value.clone()),

            ExprKind::Variable(name) => self
                .env
                .get(name.as_ref())
                .ok_or_else(|| RuntimeError::undefined_variable(name.to_string(), expr.span)),

            ExprKind::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match (op, &value) {
                    (UnaryOp::BitNot, Value::Int(n)) => Ok(Value::Int(!n)),
                    (UnaryOp::BitNot, other) => Err(RuntimeError::type_error_at(
                        format!("operand of `~` must be an integer, got {}", other.type_name()),
                        expr.span,
                    )),
                }
            }

            ExprKind::Call { name, args } => {
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.evaluate(arg)?);
                }
                self.natives
                    .call(name.as_ref(), &values)
                    .map_err(|e| e.at(expr.span))
            }

            ExprKind::Convert { value, mode } => {
                let value_val = self.evaluate(value)?;
                let mode_val = self.evaluate(mode)?;
                let mode_str = mode_val.as_str().ok_or_else(|| {
                    RuntimeError::type_error_at(
                        format!(
                            "conversion mode must be a string, got {}",
                            mode_val.type_name()
                        ),
                        mode.span,
                    )
                })?;
                let number = value_val.as_number().ok_or_else(|| {
                    RuntimeError::type_error_at(
                        format!("cannot convert a {} value", value_val.type_name()),
                        value.span,
                    )
                })?;
                match units::convert(number, mode_str) {
                    Some(result) => Ok(Value::Float(result)),
                    None => Err(RuntimeError::unknown_conversion(mode_str, expr.span)),
                }
            }

            ExprKind::Binary { left, op, right } => {
                // Both sides are evaluated eagerly; and/or do not short-circuit.
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                eval_binary_op(&left_val, *op, &right_val, expr.span)
            }
        }
    }
}

fn bool_int(b: bool) -> Value {
    Value::Int(b as i64)
}

fn eval_binary_op(
    left: &Value,
    op: BinaryOp,
    right: &Value,
    span: Span,
) -> Result<Value, RuntimeError> {
    // Logical operators accept any operand mix via truthiness.
    match op {
        BinaryOp::And => return Ok(bool_int(left.is_truthy() && right.is_truthy())),
        BinaryOp::Or => return Ok(bool_int(left.is_truthy() || right.is_truthy())),
        _ => {}
    }

    if let (Some(l), Some(r)) = (left.as_number(), right.as_number()) {
        // Comparisons work on doubles regardless of the operand mix.
        match op {
            BinaryOp::Less => return Ok(bool_int(l < r)),
            BinaryOp::Greater => return Ok(bool_int(l > r)),
            BinaryOp::LessEq => return Ok(bool_int(l <= r)),
            BinaryOp::GreaterEq => return Ok(bool_int(l >= r)),
            BinaryOp::Eq => return Ok(bool_int(l == r)),
            BinaryOp::NotEq => return Ok(bool_int(l != r)),
            _ => {}
        }

        // Power always computes in double precision.
        if op == BinaryOp::Pow {
            return Ok(Value::Float(l.powf(r)));
        }

        if op == BinaryOp::Div && r == 0.0 {
            return Err(RuntimeError::division_by_zero(span));
        }

        let use_float = matches!(left, Value::Float(_)) || matches!(right, Value::Float(_));
        if use_float {
            match op {
                BinaryOp::Add => return Ok(Value::Float(l + r)),
                BinaryOp::Sub => return Ok(Value::Float(l - r)),
                BinaryOp::Mul => return Ok(Value::Float(l * r)),
                BinaryOp::Div => return Ok(Value::Float(l / r)),
                // Bitwise operators reject floats; fall through to the
                // invalid-operation error.
                _ => {}
            }
        } else if let (Value::Int(li), Value::Int(ri)) = (left, right) {
            match op {
                BinaryOp::Add => return Ok(Value::Int(li.wrapping_add(*ri))),
                BinaryOp::Sub => return Ok(Value::Int(li.wrapping_sub(*ri))),
                BinaryOp::Mul => return Ok(Value::Int(li.wrapping_mul(*ri))),
                BinaryOp::Div => return Ok(Value::Int(li.wrapping_div(*ri))),
                BinaryOp::BitAnd => return Ok(Value::Int(li & ri)),
                BinaryOp::BitOr => return Ok(Value::Int(li | ri)),
                BinaryOp::Shl => return Ok(Value::Int(li.wrapping_shl(*ri as u32))),
                BinaryOp::Shr => return Ok(Value::Int(li.wrapping_shr(*ri as u32))),
                _ => {}
            }
        }
    }

    // `+` concatenates when a string is involved.
    if op == BinaryOp::Add {
        if let Some(result) = concat_with_string(left, right) {
            return Ok(result);
        }
    }

    Err(RuntimeError::invalid_operation(
        format!(
            "cannot apply `{}` to {} and {}",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ),
        span,
    ))
}

/// String concatenation for `+`: at least one side must be a string, the
/// other sides must be strings or numbers. Floats use the fixed six-decimal
/// form.
fn concat_with_string(left: &Value, right: &Value) -> Option<Value> {
    if !matches!(left, Value::Str(_)) && !matches!(right, Value::Str(_)) {
        return None;
    }
    let mut out = String::new();
    for side in [left, right] {
        match side {
            Value::Str(s) => out.push_str(s),
            Value::Int(n) => out.push_str(&n.to_string()),
            Value::Float(n) => out.push_str(&format!("{:.6}", n)),
            Value::Bool(_) => return None,
        }
    }
    Some(Value::Str(Rc::from(out.as_str())))
}

/// Auto-types a line read by `drim`: digits with at most one `.` become
/// Int or Float, everything else stays text.
fn parse_input(text: &str) -> Value {
    if text.is_empty() {
        return Value::Str(Rc::from(text));
    }

    let mut is_number = true;
    let mut has_dot = false;
    for c in text.chars() {
        if !c.is_ascii_digit() {
            if c == '.' && !has_dot {
                has_dot = true;
            } else {
                is_number = false;
                break;
            }
        }
    }

    if is_number {
        if has_dot {
            if let Ok(n) = text.parse::<f64>() {
                return Value::Float(n);
            }
        } else if let Ok(n) = text.parse::<i64>() {
            return Value::Int(n);
        }
    }
    Value::Str(Rc::from(text))
}

/// Lexes and parses a program, reporting failures as diagnostics.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, Vec<Diagnostic>> {
    let tokens = crate::lexer::tokenize(source)?;
    let mut parser = Parser::from_lexer_output(tokens, source.len());
    parser.parse().map_err(|e| vec![e.to_diagnostic()])
}

/// Parses and runs against real stdin/stdout, with plain-string errors.
pub fn parse_and_run(source: &str) -> Result<(), String> {
    let tokens = crate::lexer::tokenize(source)
        .map_err(|diagnostics| format!("Lex error: {}", diagnostics[0].message))?;
    let mut parser = Parser::from_lexer_output(tokens, source.len());
    let statements = parser.parse().map_err(|e| format!("Parse error: {}", e.message))?;
    Interpreter::new()
        .run(&statements)
        .map_err(|e| format!("Runtime error: {}", e))
}

/// Parses and runs against real stdin/stdout; failures come back as
/// diagnostics for the driver to render and turn into the exit code.
pub fn parse_and_run_with_diagnostics(source: &str) -> Result<(), Vec<Diagnostic>> {
    let statements = parse_program(source)?;
    let mut interpreter = Interpreter::new();
    interpreter.run(&statements).map_err(|e| vec![e.to_diagnostic()])
}
