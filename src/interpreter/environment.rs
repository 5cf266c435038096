use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A single table of bindings.
type Scope = HashMap<String, Value>;

/// The scope chain: a stack of tables plus an optional link to an enclosing
/// environment. Lookup and assignment walk innermost-outward; assignment
/// mutates the defining table when the name is already bound somewhere in
/// the chain, and otherwise creates the binding in the innermost table.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Rc<RefCell<Vec<Scope>>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Self {
        let mut scopes = Vec::with_capacity(4);
        scopes.push(HashMap::new());
        Self {
            scopes: Rc::new(RefCell::new(scopes)),
            parent: None,
        }
    }

    pub fn with_parent(parent: Rc<Environment>) -> Self {
        let mut scopes = Vec::with_capacity(4);
        scopes.push(HashMap::new());
        Self {
            scopes: Rc::new(RefCell::new(scopes)),
            parent: Some(parent),
        }
    }

    /// Push a fresh innermost table.
    pub fn push_scope(&self) {
        self.scopes.borrow_mut().push(HashMap::new());
    }

    /// Pop the innermost table. The root table is never popped.
    pub fn pop_scope(&self) {
        let mut scopes = self.scopes.borrow_mut();
        if scopes.len() > 1 {
            scopes.pop();
        }
    }

    /// Store `value` under `name`: overwrite the innermost binding if one
    /// exists, else overwrite the binding in whichever enclosing table
    /// defines it, else create it in the innermost table.
    pub fn assign(&self, name: &str, value: Value) {
        {
            let mut scopes = self.scopes.borrow_mut();
            if let Some(innermost) = scopes.last_mut() {
                if innermost.contains_key(name) {
                    innermost.insert(name.to_string(), value);
                    return;
                }
            }
        }
        if self.update(name, value.clone()) {
            return;
        }
        let mut scopes = self.scopes.borrow_mut();
        if let Some(innermost) = scopes.last_mut() {
            innermost.insert(name.to_string(), value);
        }
    }

    /// Look up `name`, innermost table outward, then the parent chain.
    pub fn get(&self, name: &str) -> Option<Value> {
        let scopes = self.scopes.borrow();
        for scope in scopes.iter().rev() {
            if let Some(value) = scope.get(name) {
                return Some(value.clone());
            }
        }
        if let Some(parent) = &self.parent {
            parent.get(name)
        } else {
            None
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        let scopes = self.scopes.borrow();
        if scopes.iter().any(|scope| scope.contains_key(name)) {
            return true;
        }
        match &self.parent {
            Some(parent) => parent.contains(name),
            None => false,
        }
    }

    /// Overwrite an existing binding wherever it is defined. Returns false
    /// when the name is bound nowhere in the chain.
    fn update(&self, name: &str, value: Value) -> bool {
        let mut scopes = self.scopes.borrow_mut();
        for scope in scopes.iter_mut().rev() {
            if scope.contains_key(name) {
                scope.insert(name.to_string(), value);
                return true;
            }
        }
        if let Some(parent) = &self.parent {
            parent.update(name, value)
        } else {
            false
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_assign_get() {
        let env = Environment::new();
        env.assign("x", Value::Int(42));
        assert_eq!(env.get("x"), Some(Value::Int(42)));
        assert_eq!(env.get("y"), None);
    }

    #[test]
    fn test_assign_overwrites_in_place() {
        let env = Environment::new();
        env.assign("x", Value::Int(1));
        env.assign("x", Value::Str(std::rc::Rc::from("now a string")));
        assert_eq!(env.get("x"), Some(Value::Str(std::rc::Rc::from("now a string"))));
    }

    #[test]
    fn test_assign_mutates_outer_binding() {
        let env = Environment::new();
        env.assign("x", Value::Int(1));

        env.push_scope();
        env.assign("x", Value::Int(2));
        env.pop_scope();

        // The outer binding was mutated, not shadowed
        assert_eq!(env.get("x"), Some(Value::Int(2)));
    }

    #[test]
    fn test_new_name_lands_in_innermost_table() {
        let env = Environment::new();
        env.push_scope();
        env.assign("inner_only", Value::Int(7));
        assert_eq!(env.get("inner_only"), Some(Value::Int(7)));
        env.pop_scope();
        assert_eq!(env.get("inner_only"), None);
    }

    #[test]
    fn test_innermost_binding_shadows_for_assignment() {
        let env = Environment::new();
        env.assign("x", Value::Int(1));
        env.push_scope();
        // Creates a distinct inner x first, so the next assign hits it
        env.scopes.borrow_mut().last_mut().unwrap().insert("x".to_string(), Value::Int(10));
        env.assign("x", Value::Int(20));
        env.pop_scope();
        assert_eq!(env.get("x"), Some(Value::Int(1)));
    }

    #[test]
    fn test_parent_chain_delegation() {
        let root = Rc::new(Environment::new());
        root.assign("shared", Value::Int(1));

        let child = Environment::with_parent(Rc::clone(&root));
        assert_eq!(child.get("shared"), Some(Value::Int(1)));
        assert!(child.contains("shared"));

        child.assign("shared", Value::Int(2));
        assert_eq!(root.get("shared"), Some(Value::Int(2)));

        child.assign("local", Value::Int(3));
        assert_eq!(root.get("local"), None);
    }

    #[test]
    fn test_contains_walks_the_chain() {
        let env = Environment::new();
        env.assign("x", Value::Int(1));
        env.push_scope();
        assert!(env.contains("x"));
        assert!(!env.contains("y"));
    }
}
