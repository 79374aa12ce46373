//! Runtime values, including the two control signals (`ReturnValue`, `Error`)
//! that travel through the same channel as ordinary results.

use std::fmt;
use std::rc::Rc;

use crate::ast::{BlockStatement, Expression};
use crate::environment::Env;

/// Canonical `true`.  Booleans are only ever produced through these constants
/// (see [`Value::from_bool`]).
pub const TRUE: Value = Value::Boolean(true);

/// Canonical `false`.
pub const FALSE: Value = Value::Boolean(false);

/// Canonical null.
pub const NULL: Value = Value::Null;

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),

    Boolean(bool),

    Null,

    /// Early‑return signal.  Unwrapped at the nearest call boundary, or by the
    /// program itself.
    ReturnValue(Box<Value>),

    /// Runtime fault.  Propagates unchanged to the top‑level caller.
    Error(String),

    Function(Rc<Function>),

    Macro(Rc<Macro>),

    /// Syntax carried as data.
    Quote(Rc<Expression>),
}

/// A closure: parameters and body plus the environment the literal was
/// evaluated in.
pub struct Function {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

/// A macro binding created by the definition pass.
pub struct Macro {
    pub parameters: Vec<String>,
    pub body: Rc<BlockStatement>,
    pub env: Env,
}

// The captured frame is left out: it usually contains the value itself.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Macro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Macro")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl Value {
    /// Map a host boolean onto the canonical `TRUE` / `FALSE`.
    #[inline]
    pub fn from_bool(b: bool) -> Value {
        if b {
            TRUE
        } else {
            FALSE
        }
    }

    /// Build an `Error` value.
    pub fn error<S: Into<String>>(msg: S) -> Value {
        Value::Error(msg.into())
    }

    /// `ReturnValue` or `Error`: a value that must not be bound or operated
    /// on, only passed outward.
    #[inline]
    pub fn is_signal(&self) -> bool {
        matches!(self, Value::ReturnValue(_) | Value::Error(_))
    }

    /// Upper‑case type name used in runtime error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function(_) => "FUNCTION",
            Value::Macro(_) => "MACRO",
            Value::Quote(_) => "QUOTE",
        }
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Identity comparison backing `==` / `!=` on non‑integers.
    ///
    /// Booleans and null are canonical, so sharing a tag and payload *is*
    /// identity for them.  Heap values are the same object only if they are
    /// the same allocation.  Nothing is ever compared structurally.
    pub fn is_identical(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            (Value::Quote(a), Value::Quote(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// `Null` and `false` are falsy; everything else, `0` included, is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(n) => f.write_str(itoa::Buffer::new().format(*n)),

            Value::Boolean(b) => write!(f, "{}", b),

            Value::Null => write!(f, "null"),

            Value::ReturnValue(inner) => write!(f, "{}", inner),

            Value::Error(message) => write!(f, "ERROR: {}", message),

            Value::Function(func) => {
                write!(f, "fn({}) {}", func.parameters.join(", "), func.body)
            }

            Value::Macro(mac) => write!(f, "macro({}) {}", mac.parameters.join(", "), mac.body),

            Value::Quote(node) => write!(f, "QUOTE({})", node),
        }
    }
}
