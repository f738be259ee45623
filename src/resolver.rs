use std::collections::HashMap;
use std::mem;

use crate::error::{ErrorReporter, LoxError};
use crate::expr::*;
use crate::interpreter::Interpreter;
use crate::stmt::*;
use crate::token::Token;

#[derive(Clone, Copy, PartialEq)]
enum FunctionKind {
    None,
    Function,
    Initializer,
    Method,
}

#[derive(Clone, Copy, PartialEq)]
enum ClassKind {
    None,
    Class,
    Subclass,
}

/// Walks the parsed AST once, before any of it executes, to work out for
/// each variable reference how many environments out it lives.
/// Populates `interpreter`'s side table as a side effect;
/// reports are routed through the shared `ErrorReporter` rather than
/// thrown, so a single pass can surface every resolve error instead of
/// stopping at the first one.
pub struct Resolver<'a> {
    interpreter: &'a mut Interpreter,
    scopes: Vec<HashMap<String, bool>>,
    current_function: FunctionKind,
    current_class: ClassKind,
    loop_depth: usize,
    reporter: ErrorReporter,
}

impl<'a> Resolver<'a> {
    pub fn new(interpreter: &'a mut Interpreter, reporter: ErrorReporter) -> Self {
        Resolver {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionKind::None,
            current_class: ClassKind::None,
            loop_depth: 0,
            reporter,
        }
    }

    pub fn resolve(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_stmt(statement);
        }
    }

    fn resolve_stmt(&mut self, stmt: &Stmt) {
        stmt.accept(self);
    }

    fn resolve_expr(&mut self, expr: &Expr) {
        expr.accept(self);
    }

    fn resolve_function(&mut self, declaration: &FunctionDecl, kind: FunctionKind) {
        let enclosing_function = mem::replace(&mut self.current_function, kind);
        let enclosing_loop_depth = mem::replace(&mut self.loop_depth, 0);

        self.begin_scope();
        for param in &declaration.params {
            self.declare(param);
            self.define(param);
        }
        self.resolve(&declaration.body);
        self.end_scope();

        self.current_function = enclosing_function;
        self.loop_depth = enclosing_loop_depth;
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    fn error(&self, token: Token, message: impl Into<String>) {
        self.reporter.report(&LoxError::Resolve { token, message: message.into() });
    }

    /// Marks `name` as declared-but-not-yet-defined in the innermost
    /// scope. The resolver never opens a scope for globals, so this is a
    /// no-op at the top level — global redeclaration is allowed.
    fn declare(&mut self, name: &Token) {
        let Some(scope) = self.scopes.last_mut() else { return };

        if scope.contains_key(&name.lexeme) {
            self.error(name.clone(), "Already a variable with this name in this scope.");
        }

        scope.insert(name.lexeme.clone(), false);
    }

    fn define(&mut self, name: &Token) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), true);
        }
    }

    fn resolve_local(&mut self, id: u64, name: &str) {
        for (depth, scope) in self.scopes.iter().rev().enumerate() {
            if scope.contains_key(name) {
                self.interpreter.resolve(id, depth);
                return;
            }
        }
        // No hit: the variable is assumed global, no side-table entry.
    }
}

impl<'a> ExprVisitor<()> for Resolver<'a> {
    fn visit_literal_expr(&mut self, _data: &crate::literal::Literal) {}

    fn visit_grouping_expr(&mut self, data: &GroupingData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) {
        self.resolve_expr(&data.left);
        self.resolve_expr(&data.right);
    }

    fn visit_variable_expr(&mut self, data: &VariableData) {
        if let Some(scope) = self.scopes.last() {
            if scope.get(&data.name.lexeme) == Some(&false) {
                self.error(data.name.clone(), "Can't read local variable in its own initializer.");
            }
        }

        self.resolve_local(data.id, &data.name.lexeme);
    }

    fn visit_assign_expr(&mut self, data: &AssignData) {
        self.resolve_expr(&data.value);
        self.resolve_local(data.id, &data.name.lexeme);
    }

    fn visit_call_expr(&mut self, data: &CallData) {
        self.resolve_expr(&data.callee);
        for argument in &data.arguments {
            self.resolve_expr(argument);
        }
    }

    fn visit_get_expr(&mut self, data: &GetData) {
        self.resolve_expr(&data.object);
    }

    fn visit_set_expr(&mut self, data: &SetData) {
        self.resolve_expr(&data.value);
        self.resolve_expr(&data.object);
    }

    fn visit_this_expr(&mut self, data: &ThisData) {
        if self.current_class == ClassKind::None {
            self.error(data.keyword.clone(), "Can't use 'this' outside of a class.");
            return;
        }

        self.resolve_local(data.id, "this");
    }

    fn visit_super_expr(&mut self, data: &SuperData) {
        match self.current_class {
            ClassKind::None => {
                self.error(data.keyword.clone(), "Can't use 'super' outside of a class.");
                return;
            }
            ClassKind::Class => {
                self.error(data.keyword.clone(), "Can't use 'super' in a class with no superclass.");
                return;
            }
            ClassKind::Subclass => {}
        }

        self.resolve_local(data.id, "super");
    }
}

impl<'a> StmtVisitor<()> for Resolver<'a> {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_print_stmt(&mut self, data: &PrintData) {
        self.resolve_expr(&data.expr);
    }

    fn visit_var_stmt(&mut self, data: &VarData) {
        self.declare(&data.name);
        if let Some(initializer) = &data.initializer {
            self.resolve_expr(initializer);
        }
        self.define(&data.name);
    }

    fn visit_block_stmt(&mut self, data: &BlockData) {
        self.begin_scope();
        self.resolve(&data.statements);
        self.end_scope();
    }

    fn visit_if_stmt(&mut self, data: &IfData) {
        self.resolve_expr(&data.condition);
        self.resolve_stmt(&data.then_branch);
        if let Some(else_branch) = &data.else_branch {
            self.resolve_stmt(else_branch);
        }
    }

    fn visit_while_stmt(&mut self, data: &WhileData) {
        self.resolve_expr(&data.condition);
        self.loop_depth += 1;
        self.resolve_stmt(&data.body);
        self.loop_depth -= 1;
    }

    fn visit_break_stmt(&mut self, data: &BreakData) {
        if self.loop_depth == 0 {
            self.error(data.keyword.clone(), "Can't break outside of a loop.");
        }
    }

    fn visit_function_stmt(&mut self, data: &std::rc::Rc<FunctionDecl>) {
        self.declare(&data.name);
        self.define(&data.name);
        self.resolve_function(data, FunctionKind::Function);
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) {
        if self.current_function == FunctionKind::None {
            self.error(data.keyword.clone(), "Can't return from top-level code.");
        }

        if let Some(value) = &data.value {
            if self.current_function == FunctionKind::Initializer {
                self.error(data.keyword.clone(), "Can't return a value from an initializer.");
            }
            self.resolve_expr(value);
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) {
        let enclosing_class = mem::replace(&mut self.current_class, ClassKind::Class);

        self.declare(&data.name);
        self.define(&data.name);

        if let Some(superclass) = &data.superclass {
            let Expr::Variable(super_var) = superclass else {
                unreachable!("parser only ever emits a Variable expr for a superclass clause")
            };

            if super_var.name.lexeme == data.name.lexeme {
                self.error(super_var.name.clone(), "A class can't inherit from itself.");
            }

            self.current_class = ClassKind::Subclass;
            self.resolve_expr(superclass);

            self.begin_scope();
            self.scopes.last_mut().expect("scope just pushed").insert("super".to_string(), true);
        }

        self.begin_scope();
        self.scopes.last_mut().expect("scope just pushed").insert("this".to_string(), true);

        for method in &data.methods {
            let kind = if method.name.lexeme == "init" { FunctionKind::Initializer } else { FunctionKind::Method };
            self.resolve_function(method, kind);
        }

        self.end_scope();

        if data.superclass.is_some() {
            self.end_scope();
        }

        self.current_class = enclosing_class;
    }
}
