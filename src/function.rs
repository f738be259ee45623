use std::cell::RefCell;
use std::fmt::{self, Display};
use std::rc::Rc;

use crate::class::Instance;
use crate::environment::Environment;
use crate::error::LoxError;
use crate::interpreter::{Interpreter, Signal};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::FunctionDecl;
use crate::token::{Token, Type};

/// A user-defined function or method, closed over the environment it was
/// declared in. `is_initializer` marks a class's `init` method, which
/// always implicitly returns the bound `this` regardless of any `return`
/// in its body.
#[derive(Debug)]
pub struct LoxFunction {
    declaration: Rc<FunctionDecl>,
    closure: Rc<RefCell<Environment>>,
    is_initializer: bool,
}

impl LoxFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: Rc<RefCell<Environment>>, is_initializer: bool) -> Self {
        LoxFunction { declaration, closure, is_initializer }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// Produces a copy of this function whose closure is a fresh scope,
    /// nested inside the original closure, with `this` bound to `instance`.
    /// Called once per method lookup on an instance.
    pub fn bind(&self, instance: Rc<RefCell<Instance>>) -> LoxFunction {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));
        environment.define("this", Object::Instance(instance));

        LoxFunction::new(Rc::clone(&self.declaration), Rc::new(RefCell::new(environment)), self.is_initializer)
    }

    fn this(&self) -> Result<Object, LoxError> {
        let token = Token::new(Type::This, "this".to_string(), None, self.declaration.name.line);
        self.closure.borrow().get_at(0, &token)
    }
}

impl Callable for LoxFunction {
    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, LoxError> {
        let mut environment = Environment::new(Some(Rc::clone(&self.closure)));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            environment.define(&param.lexeme, argument);
        }

        let signal = interpreter.execute_block(&self.declaration.body, Rc::new(RefCell::new(environment)))?;

        if self.is_initializer {
            return self.this();
        }

        match signal {
            Some(Signal::Return(value)) => Ok(value),
            _ => Ok(Object::Literal(Literal::Nil)),
        }
    }

    fn arity(&self) -> usize {
        self.declaration.params.len()
    }
}

impl Display for LoxFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.declaration.name.lexeme)
    }
}

/// A host-provided function. Exactly one exists (`clock`); see
/// [`NativeFunction::clock`].
pub struct NativeFunction {
    arity: usize,
    function: Box<dyn Fn(&[Object]) -> Object>,
}

impl NativeFunction {
    pub fn clock() -> Self {
        NativeFunction {
            arity: 0,
            function: Box::new(|_| {
                let now = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .expect("system clock to read later than the Unix epoch")
                    .as_secs_f64();
                Object::Literal(Literal::Number(now))
            }),
        }
    }
}

impl Callable for NativeFunction {
    fn call(&self, _interpreter: &mut Interpreter, arguments: Vec<Object>) -> Result<Object, LoxError> {
        Ok((self.function)(&arguments))
    }

    fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}

impl Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn>")
    }
}
