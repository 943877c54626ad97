use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::value::Value;

/// A single lexical frame in the runtime scope chain.
///
/// Lookups never walk the chain blindly: resolved references use `get_at` /
/// `assign_at` with the exact hop count the resolver recorded, and
/// unresolved references hit the global frame directly via `get` / `assign`.
#[derive(Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Create or overwrite a binding in this frame.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Read a binding in this frame only.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.values.get(name).cloned()
    }

    /// Overwrite an existing binding in this frame only.  Returns false if
    /// the name was never defined here.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;

                true
            }

            None => false,
        }
    }

    /// Read a binding exactly `distance` hops up the chain.
    pub fn get_at(env: &Rc<RefCell<Environment>>, distance: usize, name: &str) -> Option<Value> {
        Self::ancestor(env, distance).and_then(|frame| frame.borrow().get(name))
    }

    /// Overwrite a binding exactly `distance` hops up the chain.
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        match Self::ancestor(env, distance) {
            Some(frame) => frame.borrow_mut().assign(name, value),

            None => false,
        }
    }

    fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut frame = env.clone();

        for _ in 0..distance {
            let enclosing = frame.borrow().enclosing.clone();

            match enclosing {
                Some(parent) => frame = parent,

                None => return None,
            }
        }

        Some(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shared(env: Environment) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(env))
    }

    #[test]
    fn define_then_get() {
        let mut env = Environment::new();
        env.define("x", Value::Number(1.0));

        assert_eq!(env.get("x"), Some(Value::Number(1.0)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn assign_requires_existing_binding() {
        let mut env = Environment::new();

        assert!(!env.assign("x", Value::Number(1.0)));

        env.define("x", Value::Number(1.0));

        assert!(env.assign("x", Value::Number(2.0)));
        assert_eq!(env.get("x"), Some(Value::Number(2.0)));
    }

    #[test]
    fn get_at_climbs_exactly_the_given_distance() {
        let globals = shared(Environment::new());
        globals.borrow_mut().define("x", Value::String("outer".to_string()));

        let inner = shared(Environment::with_enclosing(globals.clone()));
        inner.borrow_mut().define("x", Value::String("inner".to_string()));

        assert_eq!(
            Environment::get_at(&inner, 0, "x"),
            Some(Value::String("inner".to_string()))
        );
        assert_eq!(
            Environment::get_at(&inner, 1, "x"),
            Some(Value::String("outer".to_string()))
        );
        assert_eq!(Environment::get_at(&inner, 2, "x"), None);
    }

    #[test]
    fn assign_at_writes_the_right_frame() {
        let globals = shared(Environment::new());
        globals.borrow_mut().define("x", Value::Number(1.0));

        let inner = shared(Environment::with_enclosing(globals.clone()));

        assert!(Environment::assign_at(&inner, 1, "x", Value::Number(2.0)));
        assert_eq!(globals.borrow().get("x"), Some(Value::Number(2.0)));
        assert!(!Environment::assign_at(&inner, 0, "x", Value::Number(3.0)));
    }
}
