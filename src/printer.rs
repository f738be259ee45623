use std::rc::Rc;

use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;

/// Pretty-prints a resolved statement list back into Lox source text.
/// Unlike a Lisp-style debug printer, this one must emit text the
/// scanner/parser can re-consume: it backs the parse/re-parse round-trip
/// property, which only holds if the output is valid Lox, not a debug
/// dump.
///
/// `for` loops print as their desugared `while`/`block` form, since that
/// desugaring already happened by parse time — round-tripping only needs
/// the re-parsed AST to be *equivalent*, not the source text to match
/// verbatim.
pub struct Printer;

impl Printer {
    pub fn print(statements: &[Stmt]) -> String {
        let mut printer = Printer;
        statements.iter().map(|s| s.accept(&mut printer)).collect::<Vec<_>>().join("\n")
    }

    fn print_function(&mut self, keyword: &str, declaration: &FunctionDecl) -> String {
        let params = declaration.params.iter().map(|p| p.lexeme.clone()).collect::<Vec<_>>().join(", ");
        let body = declaration.body.iter().map(|s| s.accept(self)).collect::<Vec<_>>().join(" ");
        format!("{keyword}{}({params}) {{ {body} }}", declaration.name.lexeme)
    }
}

impl ExprVisitor<String> for Printer {
    fn visit_literal_expr(&mut self, data: &Literal) -> String {
        match data {
            Literal::String(s) => format!("\"{s}\""),
            other => other.to_string(),
        }
    }

    fn visit_grouping_expr(&mut self, data: &GroupingData) -> String {
        format!("({})", data.expr.accept(self))
    }

    fn visit_unary_expr(&mut self, data: &UnaryData) -> String {
        format!("{}{}", data.operator.lexeme, data.expr.accept(self))
    }

    fn visit_binary_expr(&mut self, data: &BinaryData) -> String {
        format!("({} {} {})", data.left.accept(self), data.operator.lexeme, data.right.accept(self))
    }

    fn visit_logical_expr(&mut self, data: &LogicalData) -> String {
        format!("({} {} {})", data.left.accept(self), data.operator.lexeme, data.right.accept(self))
    }

    fn visit_variable_expr(&mut self, data: &VariableData) -> String {
        data.name.lexeme.clone()
    }

    fn visit_assign_expr(&mut self, data: &AssignData) -> String {
        format!("{} = {}", data.name.lexeme, data.value.accept(self))
    }

    fn visit_call_expr(&mut self, data: &CallData) -> String {
        let args = data.arguments.iter().map(|a| a.accept(self)).collect::<Vec<_>>().join(", ");
        format!("{}({args})", data.callee.accept(self))
    }

    fn visit_get_expr(&mut self, data: &GetData) -> String {
        format!("{}.{}", data.object.accept(self), data.name.lexeme)
    }

    fn visit_set_expr(&mut self, data: &SetData) -> String {
        format!("{}.{} = {}", data.object.accept(self), data.name.lexeme, data.value.accept(self))
    }

    fn visit_this_expr(&mut self, _data: &ThisData) -> String {
        "this".to_string()
    }

    fn visit_super_expr(&mut self, data: &SuperData) -> String {
        format!("super.{}", data.method.lexeme)
    }
}

impl StmtVisitor<String> for Printer {
    fn visit_expression_stmt(&mut self, data: &ExpressionData) -> String {
        format!("{};", data.expr.accept(self))
    }

    fn visit_print_stmt(&mut self, data: &PrintData) -> String {
        format!("print {};", data.expr.accept(self))
    }

    fn visit_var_stmt(&mut self, data: &VarData) -> String {
        match &data.initializer {
            Some(initializer) => format!("var {} = {};", data.name.lexeme, initializer.accept(self)),
            None => format!("var {};", data.name.lexeme),
        }
    }

    fn visit_block_stmt(&mut self, data: &BlockData) -> String {
        let body = data.statements.iter().map(|s| s.accept(self)).collect::<Vec<_>>().join(" ");
        format!("{{ {body} }}")
    }

    fn visit_if_stmt(&mut self, data: &IfData) -> String {
        let mut out = format!("if ({}) {}", data.condition.accept(self), data.then_branch.accept(self));
        if let Some(else_branch) = &data.else_branch {
            out.push_str(&format!(" else {}", else_branch.accept(self)));
        }
        out
    }

    fn visit_while_stmt(&mut self, data: &WhileData) -> String {
        format!("while ({}) {}", data.condition.accept(self), data.body.accept(self))
    }

    fn visit_break_stmt(&mut self, _data: &BreakData) -> String {
        "break;".to_string()
    }

    fn visit_function_stmt(&mut self, data: &Rc<FunctionDecl>) -> String {
        self.print_function("fun ", data)
    }

    fn visit_return_stmt(&mut self, data: &ReturnData) -> String {
        match &data.value {
            Some(value) => format!("return {};", value.accept(self)),
            None => "return;".to_string(),
        }
    }

    fn visit_class_stmt(&mut self, data: &ClassData) -> String {
        let superclass = match &data.superclass {
            Some(Expr::Variable(v)) => format!(" < {}", v.name.lexeme),
            _ => String::new(),
        };
        let methods = data.methods.iter().map(|m| self.print_function("", m)).collect::<Vec<_>>().join(" ");
        format!("class {}{superclass} {{ {methods} }}", data.name.lexeme)
    }
}
