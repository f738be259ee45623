use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::LoxError;
use crate::object::Object;
use crate::token::Token;

/// One lexical scope: a flat map of names to values plus a link to the
/// scope it's nested inside. Globals are the root, with `enclosing: None`.
#[derive(Debug, Default)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Object>,
}

impl Environment {
    pub fn new(enclosing: Option<Rc<RefCell<Environment>>>) -> Self {
        Environment { enclosing, values: HashMap::new() }
    }

    /// Declaring a variable always succeeds, even if the name is already
    /// bound in this same scope — that's how `var a = a;` shadowing a
    /// global is allowed (the resolver rejects the local-scope case).
    pub fn define(&mut self, name: &str, value: Object) {
        self.values.insert(name.to_string(), value);
    }

    fn ancestor(&self, distance: usize) -> Rc<RefCell<Environment>> {
        let mut environment = self
            .enclosing
            .clone()
            .unwrap_or_else(|| panic!("resolver distance {distance} has no matching enclosing scope"));

        for _ in 1..distance {
            let parent = environment
                .borrow()
                .enclosing
                .clone()
                .unwrap_or_else(|| panic!("resolver distance {distance} has no matching enclosing scope"));
            environment = parent;
        }

        environment
    }

    pub fn get_at(&self, distance: usize, name: &Token) -> Result<Object, LoxError> {
        if distance == 0 {
            return self.get_here(name);
        }
        self.ancestor(distance).borrow().get_here(name)
    }

    pub fn assign_at(&mut self, distance: usize, name: &Token, value: Object) {
        if distance == 0 {
            self.values.insert(name.lexeme.clone(), value);
        } else {
            self.ancestor(distance).borrow_mut().values.insert(name.lexeme.clone(), value);
        }
    }

    fn get_here(&self, name: &Token) -> Result<Object, LoxError> {
        self.values.get(&name.lexeme).cloned().ok_or_else(|| LoxError::Runtime {
            token: name.clone(),
            message: format!("Undefined variable '{}'.", name.lexeme),
        })
    }

    /// Global lookup when the resolver found no local binding: walks the
    /// enclosing chain all the way up, since globals may be defined after
    /// the point a function referencing them was declared.
    pub fn get(&self, name: &Token) -> Result<Object, LoxError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            return Ok(value.clone());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow().get(name);
        }

        Err(LoxError::Runtime { token: name.clone(), message: format!("Undefined variable '{}'.", name.lexeme) })
    }

    pub fn assign(&mut self, name: &Token, value: Object) -> Result<(), LoxError> {
        if self.values.contains_key(&name.lexeme) {
            self.values.insert(name.lexeme.clone(), value);
            return Ok(());
        }

        if let Some(enclosing) = &self.enclosing {
            return enclosing.borrow_mut().assign(name, value);
        }

        Err(LoxError::Runtime { token: name.clone(), message: format!("Undefined variable '{}'.", name.lexeme) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;
    use crate::token::Type;

    fn token(name: &str) -> Token {
        Token::new(Type::Identifier, name.to_string(), None, 1)
    }

    #[test]
    fn get_undefined_variable_is_a_runtime_error() {
        let env = Environment::new(None);
        assert!(env.get(&token("a")).is_err());
    }

    #[test]
    fn define_then_get_round_trips() {
        let mut env = Environment::new(None);
        env.define("a", Object::Literal(Literal::Number(1.0)));
        assert_eq!(env.get(&token("a")).unwrap(), Object::Literal(Literal::Number(1.0)));
    }

    #[test]
    fn assign_walks_up_to_the_enclosing_scope() {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define("a", Object::Literal(Literal::Number(1.0)));

        let mut local = Environment::new(Some(Rc::clone(&globals)));
        local.assign(&token("a"), Object::Literal(Literal::Number(2.0))).unwrap();

        assert_eq!(globals.borrow().get(&token("a")).unwrap(), Object::Literal(Literal::Number(2.0)));
    }

    #[test]
    fn assign_to_undefined_variable_is_an_error() {
        let mut env = Environment::new(None);
        assert!(env.assign(&token("a"), Object::Literal(Literal::Number(1.0))).is_err());
    }

    #[test]
    fn get_at_zero_reads_the_current_scope() {
        let mut env = Environment::new(None);
        env.define("a", Object::Literal(Literal::Number(7.0)));
        assert_eq!(env.get_at(0, &token("a")).unwrap(), Object::Literal(Literal::Number(7.0)));
    }

    #[test]
    fn get_at_distance_walks_ancestors() {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define("a", Object::Literal(Literal::Number(3.0)));
        let middle = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&globals)))));
        let inner = Environment::new(Some(Rc::clone(&middle)));

        assert_eq!(inner.get_at(2, &token("a")).unwrap(), Object::Literal(Literal::Number(3.0)));
    }
}
