use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::environment::Environment;
use crate::error::{ErrorReporter, LoxError};
use crate::expr::*;
use crate::function::{LoxFunction, NativeFunction};
use crate::literal::Literal;
use crate::object::{Callable, Object};
use crate::stmt::*;
use crate::token::{Token, Type};

/// A non-normal completion of statement execution. Lox has no exceptions,
/// so `return` and `break` are modeled as an explicit signal threaded back
/// up through `execute`/`execute_block` instead.
/// `Break` is consumed by the nearest enclosing loop; `Return` by the
/// nearest enclosing call frame.
pub enum Signal {
    Return(Object),
    Break,
}

type EvalResult = Result<Object, LoxError>;
type ExecResult = Result<Option<Signal>, LoxError>;

/// Walks the resolved AST, evaluating expressions and executing
/// statements against a chain of [`Environment`]s. Holds the side table
/// the resolver populates (`locals`) and writes `print` output to an
/// injected sink so tests can capture it instead of going to real stdout.
pub struct Interpreter {
    pub globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<u64, usize>,
    reporter: ErrorReporter,
    output: Box<dyn Write>,
}

impl Interpreter {
    pub fn new(reporter: ErrorReporter, output: Box<dyn Write>) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new(None)));
        globals.borrow_mut().define("clock", Object::NativeFunction(Rc::new(NativeFunction::clock())));

        Interpreter { globals: Rc::clone(&globals), environment: globals, locals: HashMap::new(), reporter, output }
    }

    /// Called once per statement list by the top-level driver. Stops at
    /// the first runtime error, reporting it and letting the caller decide
    /// the process exit code.
    pub fn interpret(&mut self, statements: &[Stmt]) {
        for statement in statements {
            if let Err(error) = self.execute(statement) {
                self.reporter.report(&error);
                return;
            }
        }
    }

    /// Records that the expression node identified by `id` resolves
    /// `depth` environments outward. Called by the resolver, read back
    /// during evaluation of `Variable`/`Assign`/`This`/`Super`.
    pub fn resolve(&mut self, id: u64, depth: usize) {
        self.locals.insert(id, depth);
    }

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        stmt.accept(self)
    }

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        expr.accept(self)
    }

    /// Runs `statements` in a fresh child of `environment`, always
    /// restoring the interpreter's previous environment on the way out —
    /// including when a signal or error propagates through.
    pub fn execute_block(&mut self, statements: &[Stmt], environment: Rc<RefCell<Environment>>) -> ExecResult {
        let previous = std::mem::replace(&mut self.environment, environment);

        let mut result = Ok(None);
        for statement in statements {
            match self.execute(statement) {
                Ok(None) => continue,
                other => {
                    result = other;
                    break;
                }
            }
        }

        self.environment = previous;
        result
    }

    fn lookup_variable(&mut self, id: u64, token: &Token, name: &str) -> EvalResult {
        match self.locals.get(&id) {
            Some(&distance) => self.environment.borrow().get_at(distance, token),
            None => self.globals.borrow().get(&Token::new(Type::Identifier, name.to_string(), None, token.line)),
        }
    }

    fn check_number(operator: &Token, value: &Object) -> Result<f64, LoxError> {
        match value {
            Object::Literal(Literal::Number(n)) => Ok(*n),
            _ => Err(LoxError::Runtime { token: operator.clone(), message: "Operand must be a number.".to_string() }),
        }
    }

    fn check_numbers(operator: &Token, left: &Object, right: &Object) -> Result<(f64, f64), LoxError> {
        match (left, right) {
            (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => Ok((*l, *r)),
            _ => Err(LoxError::Runtime { token: operator.clone(), message: "Operands must be numbers.".to_string() }),
        }
    }
}

impl ExprVisitor<EvalResult> for Interpreter {
    fn visit_literal_expr(&mut self, data: &Literal) -> EvalResult {
        Ok(Object::Literal(data.clone()))
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> EvalResult {
        self.evaluate(&data.expr)
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> EvalResult {
        let right = self.evaluate(&data.expr)?;

        match data.operator.r#type {
            Type::Minus => Ok(Object::Literal(Literal::Number(-Self::check_number(&data.operator, &right)?))),
            Type::Bang => Ok(Object::Literal(Literal::Bool(!right.is_truthy()))),
            _ => unreachable!("parser never emits a unary operator other than '-' or '!'"),
        }
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> EvalResult {
        let left = self.evaluate(&data.left)?;
        let right = self.evaluate(&data.right)?;
        let op = &data.operator;

        match op.r#type {
            Type::Minus => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Number(l - r)))
            }
            Type::Slash => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Number(l / r)))
            }
            Type::Star => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Number(l * r)))
            }
            Type::Plus => match (&left, &right) {
                (Object::Literal(Literal::Number(l)), Object::Literal(Literal::Number(r))) => {
                    Ok(Object::Literal(Literal::Number(l + r)))
                }
                (Object::Literal(Literal::String(l)), Object::Literal(Literal::String(r))) => {
                    Ok(Object::Literal(Literal::String(format!("{l}{r}"))))
                }
                _ => Err(LoxError::Runtime {
                    token: op.clone(),
                    message: "Operands must be two numbers or two strings.".to_string(),
                }),
            },
            Type::Greater => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Bool(l > r)))
            }
            Type::GreaterEqual => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Bool(l >= r)))
            }
            Type::Less => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Bool(l < r)))
            }
            Type::LessEqual => {
                let (l, r) = Self::check_numbers(op, &left, &right)?;
                Ok(Object::Literal(Literal::Bool(l <= r)))
            }
            Type::BangEqual => Ok(Object::Literal(Literal::Bool(left != right))),
            Type::EqualEqual => Ok(Object::Literal(Literal::Bool(left == right))),
            _ => unreachable!("parser never emits a binary operator outside this set"),
        }
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> EvalResult {
        let left = self.evaluate(&data.left)?;

        let short_circuits = if data.operator.r#type == Type::Or { left.is_truthy() } else { !left.is_truthy() };

        if short_circuits { Ok(left) } else { self.evaluate(&data.right) }
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> EvalResult {
        self.lookup_variable(data.id, &data.name, &data.name.lexeme)
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> EvalResult {
        let value = self.evaluate(&data.value)?;

        match self.locals.get(&data.id) {
            Some(&distance) => self.environment.borrow_mut().assign_at(distance, &data.name, value.clone()),
            None => self.globals.borrow_mut().assign(&data.name, value.clone())?,
        }

        Ok(value)
    }

    fn visit_call_expr(&mut self, data: &CallData) -> EvalResult {
        let callee = self.evaluate(&data.callee)?;
        let mut arguments = Vec::with_capacity(data.arguments.len());
        for argument in &data.arguments {
            arguments.push(self.evaluate(argument)?);
        }

        let arity = match &callee {
            Object::Class(class) => class.arity(),
            _ => match callee.as_callable() {
                Some(callable) => callable.arity(),
                None => {
                    return Err(LoxError::Runtime {
                        token: data.paren.clone(),
                        message: "Can only call functions and classes.".to_string(),
                    });
                }
            },
        };

        if arguments.len() != arity {
            return Err(LoxError::Runtime {
                token: data.paren.clone(),
                message: format!("Expected {arity} arguments but got {}.", arguments.len()),
            });
        }

        match &callee {
            Object::Class(class) => Class::instantiate(class, self, arguments),
            _ => callee.as_callable().expect("checked above").call(self, arguments),
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) -> EvalResult {
        let object = self.evaluate(&data.object)?;

        match object {
            Object::Instance(instance) => Instance::get(&instance, &data.name),
            _ => Err(LoxError::Runtime { token: data.name.clone(), message: "Only instances have properties.".to_string() }),
        }
    }

    fn visit_set_expr(&mut self, data: &SetData) -> EvalResult {
        let object = self.evaluate(&data.object)?;

        let Object::Instance(instance) = object else {
            return Err(LoxError::Runtime { token: data.name.clone(), message: "Only instances have fields.".to_string() });
        };

        let value = self.evaluate(&data.value)?;
        instance.borrow_mut().set(&data.name, value.clone());
        Ok(value)
    }

    fn visit_this_expr(&mut self, data: &ThisData) -> EvalResult {
        self.lookup_variable(data.id, &data.keyword, "this")
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> EvalResult {
        let distance = *self.locals.get(&data.id).expect("resolver always resolves a valid 'super' use");

        let superclass = self.environment.borrow().get_at(distance, &data.keyword)?;
        let Object::Class(superclass) = superclass else {
            unreachable!("the resolver only ever binds 'super' to a Class value")
        };

        let this_token = Token::new(Type::This, "this".to_string(), None, data.keyword.line);
        let instance = self.environment.borrow().get_at(distance - 1, &this_token)?;
        let Object::Instance(instance) = instance else {
            unreachable!("'this' is always bound to an Instance alongside 'super'")
        };

        match superclass.find_method(&data.method.lexeme) {
            Some(method) => Ok(Object::Function(Rc::new(method.bind(instance)))),
            None => Err(LoxError::Runtime {
                token: data.method.clone(),
                message: format!("Undefined property '{}'.", data.method.lexeme),
            }),
        }
    }
}

impl StmtVisitor<ExecResult> for Interpreter {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> ExecResult {
        self.evaluate(&data.expr)?;
        Ok(None)
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> ExecResult {
        let value = self.evaluate(&data.expr)?;
        writeln!(self.output, "{value}").expect("writing to the configured output sink to succeed");
        Ok(None)
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> ExecResult {
        let value = match &data.initializer {
            Some(initializer) => self.evaluate(initializer)?,
            None => Object::Literal(Literal::Nil),
        };

        self.environment.borrow_mut().define(&data.name.lexeme, value);
        Ok(None)
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> ExecResult {
        let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
        self.execute_block(&data.statements, scope)
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> ExecResult {
        if self.evaluate(&data.condition)?.is_truthy() {
            self.execute(&data.then_branch)
        } else if let Some(else_branch) = &data.else_branch {
            self.execute(else_branch)
        } else {
            Ok(None)
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> ExecResult {
        while self.evaluate(&data.condition)?.is_truthy() {
            match self.execute(&data.body)? {
                Some(Signal::Break) => break,
                signal @ Some(Signal::Return(_)) => return Ok(signal),
                None => {}
            }
        }
        Ok(None)
    }

    fn visit_break_stmt(&mut self, _data: &BreakData) -> ExecResult {
        Ok(Some(Signal::Break))
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionDecl>) -> ExecResult {
        let function = LoxFunction::new(Rc::clone(data), Rc::clone(&self.environment), false);
        self.environment.borrow_mut().define(&data.name.lexeme, Object::Function(Rc::new(function)));
        Ok(None)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> ExecResult {
        let value = match &data.value {
            Some(value) => self.evaluate(value)?,
            None => Object::Literal(Literal::Nil),
        };
        Ok(Some(Signal::Return(value)))
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> ExecResult {
        let superclass = match &data.superclass {
            Some(expr) => {
                let value = self.evaluate(expr)?;
                let Object::Class(class) = value else {
                    let Expr::Variable(variable) = expr else { unreachable!() };
                    return Err(LoxError::Runtime {
                        token: variable.name.clone(),
                        message: "Superclass must be a class.".to_string(),
                    });
                };
                Some(class)
            }
            None => None,
        };

        self.environment.borrow_mut().define(&data.name.lexeme, Object::Literal(Literal::Nil));

        let method_environment = if let Some(superclass) = &superclass {
            let scope = Rc::new(RefCell::new(Environment::new(Some(Rc::clone(&self.environment)))));
            scope.borrow_mut().define("super", Object::Class(Rc::clone(superclass)));
            scope
        } else {
            Rc::clone(&self.environment)
        };

        let mut methods = HashMap::new();
        for method in &data.methods {
            let function = LoxFunction::new(Rc::clone(method), Rc::clone(&method_environment), method.name.lexeme == "init");
            methods.insert(method.name.lexeme.clone(), Rc::new(function));
        }

        let class = Object::Class(Rc::new(Class::new(data.name.lexeme.clone(), superclass, methods)));
        self.environment
            .borrow_mut()
            .assign(&data.name, class)
            .expect("class name was just defined in this same environment");

        Ok(None)
    }
}
