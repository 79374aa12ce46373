//! Tree‑walking evaluator.
//!
//! Every `eval_*` function takes the node and the environment to run it in and
//! hands back a [`Value`].  Faults are not Rust errors: they come back as
//! [`Value::Error`] and short‑circuit every enclosing block, call and program,
//! exactly like a `return` does through [`Value::ReturnValue`].  The two signals
//! differ only in where they stop: a return value is unwrapped at the nearest
//! call boundary (or by the program), an error never is.
//!
//! Recursion depth follows the user program's, so unbounded recursion in Monkey
//! code ends in a host stack overflow.
//!
//! [`Interpreter`] wraps one session: a global environment plus the
//! scan → parse → define macros → expand macros → eval pipeline.

use log::{debug, info};

use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};
use crate::environment::{Env, Environment};
use crate::error::Result;
use crate::macros;
use crate::parser;
use crate::value::{Function, Value, FALSE, NULL, TRUE};

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::rc::Rc;

// ─────────────────────────────────────────────────────────────────────────────
// Session
// ─────────────────────────────────────────────────────────────────────────────

/// One interactive session: every line evaluated through the same interpreter
/// sees the bindings (and macros) of the lines before it.
pub struct Interpreter {
    environment: Env,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        info!("Initializing Interpreter");

        Self {
            environment: Environment::new(),
        }
    }

    /// Global environment of this session.
    pub fn environment(&self) -> &Env {
        &self.environment
    }

    /// Run one unit of source.  `Ok(None)` means the program produced nothing
    /// to print; a runtime fault is `Ok(Some(Value::Error(..)))`.  `Err` is
    /// reserved for source that never reached evaluation.
    pub fn run(&mut self, source: &str) -> Result<Option<Value>> {
        let mut program: Program = parser::parse_source(source)?;

        macros::define_macros(&mut program, &self.environment);
        let program: Program = macros::expand_macros(program, &self.environment)?;

        debug!("Evaluating expanded program: {}", program);

        let result = eval_program(&program, &self.environment);

        info!(
            "Program evaluated to: {}",
            result
                .as_ref()
                .map_or_else(|| "<nothing>".to_string(), |v| v.to_string())
        );

        Ok(result)
    }

    /// [`run`](Self::run) the contents of a source file.
    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Result<Option<Value>> {
        let source = read_source(path)?;

        self.run(&source)
    }
}

/// Read a source file as UTF‑8 text.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    info!("Reading source file: {:?}", path);

    let mut reader = BufReader::new(File::open(path)?);
    let mut buf = Vec::new();
    let bytes = reader.read_to_end(&mut buf)?;

    info!("Read {} bytes from {:?}", bytes, path);

    Ok(String::from_utf8(buf)?)
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// Evaluate a whole program.  A `return` at top level ends the program with
/// its (unwrapped) value; an error ends it with the error.
pub fn eval_program(program: &Program, env: &Env) -> Option<Value> {
    debug!("Interpreting {} statements", program.statements.len());

    let mut result: Option<Value> = None;

    for stmt in &program.statements {
        match eval_statement(stmt, env) {
            Some(Value::ReturnValue(inner)) => return Some(*inner),
            Some(err @ Value::Error(_)) => return Some(err),
            other => result = other,
        }
    }

    result
}

/// Evaluate a block.  Return values and errors stop it but are passed up
/// still wrapped, so the enclosing call (or program) decides what to do.
pub fn eval_block(block: &BlockStatement, env: &Env) -> Option<Value> {
    let mut result: Option<Value> = None;

    for stmt in &block.statements {
        result = eval_statement(stmt, env);

        if let Some(Value::ReturnValue(_) | Value::Error(_)) = result {
            return result;
        }
    }

    result
}

/// Evaluate one statement.  `let` yields nothing unless its value is a
/// signal (see [`Value::is_signal`]).
pub fn eval_statement(stmt: &Statement, env: &Env) -> Option<Value> {
    match stmt {
        Statement::Expression(expr) => Some(eval_expression(expr, env)),

        Statement::Let { name, value } => {
            let val = eval_expression(value, env);
            if val.is_signal() {
                return Some(val);
            }

            env.borrow_mut().define(name, val);

            None
        }

        Statement::Return(value) => {
            let val = eval_expression(value, env);
            if val.is_signal() {
                return Some(val);
            }

            debug!("Returning value: {}", val);

            Some(Value::ReturnValue(Box::new(val)))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

pub fn eval_expression(expr: &Expression, env: &Env) -> Value {
    match expr {
        Expression::IntegerLiteral(n) => Value::Integer(*n),

        Expression::BooleanLiteral(b) => Value::from_bool(*b),

        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env);
            if right.is_signal() {
                return right;
            }

            eval_prefix(*operator, right)
        }

        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let left = eval_expression(left, env);
            if left.is_signal() {
                return left;
            }

            let right = eval_expression(right, env);
            if right.is_signal() {
                return right;
            }

            eval_infix(*operator, &left, &right)
        }

        Expression::If {
            condition,
            consequence,
            alternative,
        } => eval_if(condition, consequence, alternative.as_ref(), env),

        Expression::Identifier(name) => eval_identifier(name, env),

        Expression::FunctionLiteral { parameters, body } => Value::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: Rc::clone(body),
            env: Rc::clone(env),
        })),

        Expression::Call {
            function,
            arguments,
        } => {
            if let Some("quote") = expr.callee_name() {
                return match arguments.as_slice() {
                    [node] => macros::quote(node, env),
                    _ => Value::error(format!(
                        "wrong number of arguments to quote: want=1, got={}",
                        arguments.len()
                    )),
                };
            }

            let callee = eval_expression(function, env);
            if callee.is_signal() {
                return callee;
            }

            let args = match eval_arguments(arguments, env) {
                Ok(args) => args,
                Err(err) => return err,
            };

            apply_function(&callee, args)
        }

        // Only reachable when a macro literal is not the direct value of a
        // top-level `let`, which the definition pass leaves in place.
        Expression::MacroLiteral { .. } => {
            Value::error("macro literal outside of a top-level let binding")
        }
    }
}

fn eval_prefix(operator: PrefixOperator, right: Value) -> Value {
    match operator {
        PrefixOperator::Bang => match right {
            Value::Boolean(true) => FALSE,
            Value::Boolean(false) | Value::Null => TRUE,
            _ => FALSE,
        },

        PrefixOperator::Minus => match right {
            Value::Integer(n) => n
                .checked_neg()
                .map(Value::Integer)
                .unwrap_or_else(|| Value::error(format!("integer overflow: -({})", n))),
            other => Value::error(format!("unknown operator: -{}", other.type_name())),
        },
    }
}

fn eval_infix(operator: InfixOperator, left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => eval_integer_infix(operator, *a, *b),

        _ if left.type_name() != right.type_name() => Value::error(format!(
            "type mismatch: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),

        _ if operator == InfixOperator::Equal => Value::from_bool(left.is_identical(right)),

        _ if operator == InfixOperator::NotEqual => Value::from_bool(!left.is_identical(right)),

        _ => Value::error(format!(
            "unknown operator: {} {} {}",
            left.type_name(),
            operator,
            right.type_name()
        )),
    }
}

fn eval_integer_infix(operator: InfixOperator, a: i64, b: i64) -> Value {
    debug!("Integer operation: {} {} {}", a, operator, b);

    let checked = |result: Option<i64>| {
        result
            .map(Value::Integer)
            .unwrap_or_else(|| Value::error(format!("integer overflow: {} {} {}", a, operator, b)))
    };

    match operator {
        InfixOperator::Plus => checked(a.checked_add(b)),
        InfixOperator::Minus => checked(a.checked_sub(b)),
        InfixOperator::Star => checked(a.checked_mul(b)),
        InfixOperator::Slash => {
            if b == 0 {
                Value::error(format!("division by zero: {} / 0", a))
            } else {
                checked(a.checked_div(b))
            }
        }
        InfixOperator::Less => Value::from_bool(a < b),
        InfixOperator::LessEqual => Value::from_bool(a <= b),
        InfixOperator::Greater => Value::from_bool(a > b),
        InfixOperator::GreaterEqual => Value::from_bool(a >= b),
        InfixOperator::Equal => Value::from_bool(a == b),
        InfixOperator::NotEqual => Value::from_bool(a != b),
    }
}

fn eval_if(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Env,
) -> Value {
    let condition = eval_expression(condition, env);
    if condition.is_signal() {
        return condition;
    }

    let branch = if condition.is_truthy() {
        Some(consequence)
    } else {
        alternative
    };

    match branch {
        Some(block) => eval_block(block, env).unwrap_or(NULL),
        None => NULL,
    }
}

fn eval_identifier(name: &str, env: &Env) -> Value {
    env.borrow()
        .get(name)
        .unwrap_or_else(|| Value::error(format!("identifier not found: {}", name)))
}

/// Evaluate call arguments left to right.  The first signal is handed back as
/// `Err` so the caller can return it as is.
fn eval_arguments(arguments: &[Expression], env: &Env) -> std::result::Result<Vec<Value>, Value> {
    let mut values = Vec::with_capacity(arguments.len());

    for arg in arguments {
        let value = eval_expression(arg, env);
        if value.is_signal() {
            return Err(value);
        }

        debug!("Evaluated argument => {}", value);
        values.push(value);
    }

    Ok(values)
}

/// Call `callee` with already evaluated `args`.  The body runs in a fresh
/// frame enclosing the *captured* environment, and a `return` inside it stops
/// here.
pub fn apply_function(callee: &Value, args: Vec<Value>) -> Value {
    let function = match callee {
        Value::Function(function) => function,
        other => return Value::error(format!("not a function: {}", other.type_name())),
    };

    if function.parameters.len() != args.len() {
        return Value::error(format!(
            "wrong number of arguments: want={}, got={}",
            function.parameters.len(),
            args.len()
        ));
    }

    let frame: Env = Environment::with_enclosing(Rc::clone(&function.env));
    {
        let mut scope = frame.borrow_mut();
        for (param, arg) in function.parameters.iter().zip(args) {
            scope.define(param, arg);
        }
    }

    debug!("Executing function body");

    match eval_block(&function.body, &frame) {
        Some(Value::ReturnValue(inner)) => *inner,
        Some(value) => value,
        None => NULL,
    }
}
