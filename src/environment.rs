use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to one scope frame.  Closures, macros and active calls all
/// hold one; a frame lives as long as its longest holder.
pub type Env = Rc<RefCell<Environment>>;

/// One link in the scope chain.
///
/// Frames that a function stores into itself (`let f = fn() { f() }`) form an
/// `Rc` cycle and are only reclaimed when the session ends.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Env>,
}

impl Environment {
    /// A fresh root frame (the session's global scope).
    pub fn new() -> Env {
        Rc::new(RefCell::new(Environment::default()))
    }

    /// A fresh, empty frame chained to `enclosing`.  Used for call frames and
    /// macro expansion frames.
    pub fn with_enclosing(enclosing: Env) -> Env {
        Rc::new(RefCell::new(Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }))
    }

    /// Bind `name` in *this* frame only, shadowing any outer binding.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define '{}' = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up here, then along the enclosing chain.  `None` means
    /// unbound; turning that into a runtime error is the caller's call.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            Some(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            None
        }
    }
}
