//! Source‑like rendering of the syntax tree.
//!
//! The output is what `parse` and `expand` print, and what a `QUOTE(...)`
//! value shows in the REPL.  Prefix and infix expressions are fully
//! parenthesised so precedence is visible: `-a * b` prints as `((-a) * b)`.

use std::fmt;

use crate::ast::{BlockStatement, Expression, InfixOperator, PrefixOperator, Program, Statement};

/// Write `items` separated by `", "`.
fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        Ok(())
    }
}

impl fmt::Display for BlockStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{ ")?;
        for stmt in &self.statements {
            write!(f, "{}", stmt)?;
        }
        f.write_str(" }")
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Let { name, value } => write!(f, "let {} = {};", name, value),

            Statement::Return(value) => write!(f, "return {};", value),

            Statement::Expression(expr) => write!(f, "{}", expr),
        }
    }
}

impl fmt::Display for PrefixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ── leaves ──────────────────────────────────────────────────
            Expression::Identifier(name) => f.write_str(name),

            Expression::IntegerLiteral(n) => f.write_str(itoa::Buffer::new().format(*n)),

            Expression::BooleanLiteral(b) => write!(f, "{}", b),

            // ── operators ───────────────────────────────────────────────
            Expression::Prefix { operator, right } => write!(f, "({}{})", operator, right),

            Expression::Infix {
                left,
                operator,
                right,
            } => write!(f, "({} {} {})", left, operator, right),

            // ── compound forms ──────────────────────────────────────────
            Expression::If {
                condition,
                consequence,
                alternative,
            } => {
                write!(f, "if ({}) {}", condition, consequence)?;
                if let Some(alt) = alternative {
                    write!(f, " else {}", alt)?;
                }
                Ok(())
            }

            Expression::FunctionLiteral { parameters, body } => {
                f.write_str("fn(")?;
                write_list(f, parameters)?;
                write!(f, ") {}", body)
            }

            Expression::MacroLiteral { parameters, body } => {
                f.write_str("macro(")?;
                write_list(f, parameters)?;
                write!(f, ") {}", body)
            }

            Expression::Call {
                function,
                arguments,
            } => {
                write!(f, "{}(", function)?;
                write_list(f, arguments)?;
                f.write_str(")")
            }
        }
    }
}
