//! Compile‑time macros: the definition pass, the expansion pass, and the
//! `quote` / `unquote` intrinsic they share with ordinary evaluation.
//!
//! A front end runs [`define_macros`] and then [`expand_macros`] on every
//! program before evaluating it.  Definition pulls top‑level
//! `let name = macro(...) {...}` statements out of the program and binds them
//! in the environment.  Expansion then replaces each call to such a binding by
//! the syntax its body quotes, with the call's arguments handed over
//! *unevaluated*, each wrapped in a `Quote`.

use std::rc::Rc;

use log::{debug, info};

use crate::ast::{Expression, Program, Statement};
use crate::environment::{Env, Environment};
use crate::error::{MonkeyError, Result};
use crate::fold::{self, Fold};
use crate::interpreter;
use crate::value::{Macro, Value};

// ─────────────────────────────────────────────────────────────────────────────
// Definition
// ─────────────────────────────────────────────────────────────────────────────

/// Bind every top‑level macro definition in `env` and drop it from `program`.
/// The remaining statements keep their relative order.
pub fn define_macros(program: &mut Program, env: &Env) {
    let before = program.statements.len();

    program.statements.retain(|stmt| match stmt {
        Statement::Let {
            name,
            value: Expression::MacroLiteral { parameters, body },
        } => {
            debug!("Defining macro '{}'", name);

            let mac = Macro {
                parameters: parameters.clone(),
                body: Rc::clone(body),
                env: Rc::clone(env),
            };
            env.borrow_mut().define(name, Value::Macro(Rc::new(mac)));

            false
        }
        _ => true,
    });

    let defined = before - program.statements.len();
    if defined > 0 {
        info!("Defined {} macro(s)", defined);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Expansion
// ─────────────────────────────────────────────────────────────────────────────

struct MacroExpander<'e> {
    env: &'e Env,
}

impl MacroExpander<'_> {
    /// The macro a call targets, if its callee names one in scope.
    fn lookup(&self, expr: &Expression) -> Option<Rc<Macro>> {
        let name = expr.callee_name()?;

        match self.env.borrow().get(name) {
            Some(Value::Macro(mac)) => Some(mac),
            _ => None,
        }
    }
}

impl Fold for MacroExpander<'_> {
    type Error = MonkeyError;

    fn fold_expression(&mut self, expr: Expression) -> Result<Expression> {
        let Some(mac) = self.lookup(&expr) else {
            return Ok(expr);
        };
        let (function, arguments) = match expr {
            Expression::Call {
                function,
                arguments,
            } => (function, arguments),
            other => return Ok(other),
        };

        debug!("Expanding macro call {}(..{} args)", function, arguments.len());

        if mac.parameters.len() != arguments.len() {
            return Err(MonkeyError::macro_usage(format!(
                "macro {} takes {} argument(s), got {}",
                function,
                mac.parameters.len(),
                arguments.len()
            )));
        }

        let frame: Env = Environment::with_enclosing(Rc::clone(&mac.env));
        {
            let mut scope = frame.borrow_mut();
            for (param, arg) in mac.parameters.iter().zip(arguments) {
                scope.define(param, Value::Quote(Rc::new(arg)));
            }
        }

        let expanded = match interpreter::eval_block(&mac.body, &frame) {
            Some(Value::Quote(node)) => Rc::unwrap_or_clone(node),
            Some(Value::ReturnValue(inner)) => match *inner {
                Value::Quote(node) => Rc::unwrap_or_clone(node),
                other => return Err(not_syntax(&function, &other)),
            },
            Some(other) => return Err(not_syntax(&function, &other)),
            None => {
                return Err(MonkeyError::macro_usage(format!(
                    "macro {} produced no value; macros must return quoted syntax",
                    function
                )))
            }
        };

        debug!("Macro {} expanded to {}", function, expanded);

        // Generated syntax may itself call macros.
        fold::fold_expression(self, expanded)
    }
}

fn not_syntax(function: &Expression, value: &Value) -> MonkeyError {
    MonkeyError::macro_usage(format!(
        "macro {} returned {} ({}); macros must return quoted syntax",
        function,
        value.type_name(),
        value
    ))
}

/// Rewrite every macro call in `program` into the syntax the macro produces.
///
/// A macro whose body does not evaluate to a `Quote` aborts the whole
/// expansion with [`MonkeyError::Macro`].
pub fn expand_macros(program: Program, env: &Env) -> Result<Program> {
    let mut expander = MacroExpander { env };

    fold::fold_program(&mut expander, program)
}

// ─────────────────────────────────────────────────────────────────────────────
// Quote / unquote
// ─────────────────────────────────────────────────────────────────────────────

/// Splices `unquote(x)` calls inside a quoted node.  The first runtime error
/// met while evaluating an `x` aborts the walk and becomes the quote's result.
struct Unquoter<'e> {
    env: &'e Env,
}

impl Fold for Unquoter<'_> {
    type Error = Value;

    fn fold_expression(&mut self, expr: Expression) -> std::result::Result<Expression, Value> {
        if expr.callee_name() != Some("unquote") {
            return Ok(expr);
        }

        match expr {
            Expression::Call { arguments, .. } if arguments.len() == 1 => {
                let value = interpreter::eval_expression(&arguments[0], self.env);
                if value.is_error() {
                    return Err(value);
                }

                value_to_syntax(value)
            }
            other => Ok(other),
        }
    }
}

/// Turn an unquoted value back into syntax.  A quote gives up its node;
/// values with no literal form cannot be spliced.
fn value_to_syntax(value: Value) -> std::result::Result<Expression, Value> {
    match value {
        Value::Integer(n) => Ok(Expression::IntegerLiteral(n)),
        Value::Boolean(b) => Ok(Expression::BooleanLiteral(b)),
        Value::Quote(node) => Ok(Rc::unwrap_or_clone(node)),
        other => Err(Value::error(format!(
            "cannot unquote {} into syntax",
            other.type_name()
        ))),
    }
}

/// The `quote(node)` intrinsic: `node` is not evaluated, except for the
/// `unquote(...)` calls inside it, which are evaluated in `env` right away and
/// spliced back in as literals.
pub fn quote(node: &Expression, env: &Env) -> Value {
    let mut unquoter = Unquoter { env };

    match fold::fold_expression(&mut unquoter, node.clone()) {
        Ok(node) => Value::Quote(Rc::new(node)),
        Err(err) => err,
    }
}
