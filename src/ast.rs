//! Syntax tree produced by the [`Parser`](crate::parser::Parser) and consumed
//! by the interpreter and the macro expander.
//!
//! Every node owns its data.  A [`Quote`](crate::value::Value::Quote) value
//! carries an [`Expression`] around at runtime, long after the source line and
//! its tokens have been dropped, so nothing in here borrows from the scanner.

use std::rc::Rc;

use serde::Serialize;

/// Root of a parsed source unit: the ordered top‑level statements.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Program {
    pub statements: Vec<Statement>,
}

/// `{ ... }` body of a function, macro, or `if` branch.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BlockStatement {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// `let <name> = <value>;`
    Let { name: String, value: Expression },

    /// `return <value>;`
    Return(Expression),

    /// A bare expression used as a statement.
    Expression(Expression),
}

/// Prefix operators: `!` and unary `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PrefixOperator {
    Bang,
    Minus,
}

/// Binary operators understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InfixOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Equal,
    NotEqual,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expression {
    Identifier(String),

    IntegerLiteral(i64),

    BooleanLiteral(bool),

    Prefix {
        operator: PrefixOperator,
        right: Box<Expression>,
    },

    Infix {
        left: Box<Expression>,
        operator: InfixOperator,
        right: Box<Expression>,
    },

    If {
        condition: Box<Expression>,
        consequence: BlockStatement,
        alternative: Option<BlockStatement>,
    },

    /// `fn(<parameters>) { <body> }`
    FunctionLiteral {
        parameters: Vec<String>,
        body: Rc<BlockStatement>,
    },

    /// `<function>(<arguments>)`
    Call {
        function: Box<Expression>,
        arguments: Vec<Expression>,
    },

    /// `macro(<parameters>) { <body> }`.  Same shape as a function literal,
    /// but only ever bound by the macro definition pass, never evaluated.
    MacroLiteral {
        parameters: Vec<String>,
        body: Rc<BlockStatement>,
    },
}

impl PrefixOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            PrefixOperator::Bang => "!",
            PrefixOperator::Minus => "-",
        }
    }
}

impl InfixOperator {
    pub fn as_str(self) -> &'static str {
        match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Star => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Less => "<",
            InfixOperator::LessEqual => "<=",
            InfixOperator::Greater => ">",
            InfixOperator::GreaterEqual => ">=",
            InfixOperator::Equal => "==",
            InfixOperator::NotEqual => "!=",
        }
    }
}

impl Expression {
    /// Name of the identifier this call targets, if the callee is a bare
    /// identifier.  `quote`, `unquote` and macro calls are recognised this way.
    pub fn callee_name(&self) -> Option<&str> {
        match self {
            Expression::Call { function, .. } => match function.as_ref() {
                Expression::Identifier(name) => Some(name),
                _ => None,
            },
            _ => None,
        }
    }
}
