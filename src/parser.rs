use std::rc::Rc;

use crate::error::{ErrorReporter, LoxError};
use crate::expr::*;
use crate::literal::Literal;
use crate::stmt::*;
use crate::token::{Token, Type};

type ParseResult<T> = Result<T, LoxError>;

const MAX_ARGS: usize = 255;

/// Recursive-descent parser. Maintains a single `current` cursor over the
/// token list; see the grammar below for what it implements, including
/// the `for` desugaring and the assignment-target reinterpretation trick.
///
/// ```text
/// program        -> declaration* EOF
/// declaration    -> classDecl | funDecl | varDecl | statement
/// classDecl      -> "class" IDENT ( "<" IDENT )? "{" function* "}"
/// funDecl        -> "fun" function
/// function       -> IDENT "(" parameters? ")" block
/// varDecl        -> "var" IDENT ( "=" expression )? ";"
/// statement      -> exprStmt | forStmt | ifStmt | printStmt
///                 | returnStmt | whileStmt | breakStmt | block
/// breakStmt      -> "break" ";"
/// forStmt        -> "for" "(" ( varDecl | exprStmt | ";" )
///                              expression? ";" expression? ")" statement
/// ifStmt         -> "if" "(" expression ")" statement ( "else" statement )?
/// printStmt      -> "print" expression ";"
/// returnStmt     -> "return" expression? ";"
/// whileStmt      -> "while" "(" expression ")" statement
/// block          -> "{" declaration* "}"
/// expression     -> assignment
/// assignment     -> ( call "." )? IDENT "=" assignment | logic_or
/// logic_or       -> logic_and ( "or" logic_and )*
/// logic_and      -> equality ( "and" equality )*
/// equality       -> comparison ( ("!="|"==") comparison )*
/// comparison     -> term ( (">"|">="|"<"|"<=") term )*
/// term           -> factor ( ("-"|"+") factor )*
/// factor         -> unary ( ("*"|"/") unary )*
/// unary          -> ("!"|"-") unary | call
/// call           -> primary ( "(" arguments? ")" | "." IDENT )*
/// primary        -> "true"|"false"|"nil"|"this"|NUMBER|STRING
///                 | "super" "." IDENT | IDENT | "(" expression ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    reporter: ErrorReporter,
    next_id: u64,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, reporter: ErrorReporter) -> Self {
        Parser { tokens, current: 0, reporter, next_id: 0 }
    }

    /// Mints a fresh identity for a `Variable`/`Assign`/`This`/`Super`
    /// node. The resolver's side table is keyed on this id rather than on
    /// source position, since two occurrences of a name on one line are
    /// otherwise indistinguishable (see `expr.rs`).
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn parse(&mut self) -> Vec<Stmt> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        log::trace!("parsed {} top-level statements", statements.len());
        statements
    }

    // --- cursor helpers ---

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn is_at_end(&self) -> bool {
        self.peek().r#type == Type::Eof
    }

    fn check(&self, r#type: Type) -> bool {
        !self.is_at_end() && self.peek().r#type == r#type
    }

    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    fn matches(&mut self, types: &[Type]) -> bool {
        if types.iter().any(|t| self.check(*t)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, r#type: Type, message: &str) -> ParseResult<Token> {
        if self.check(r#type) {
            return Ok(self.advance());
        }

        Err(LoxError::Parse { token: self.peek().clone(), message: message.to_string() })
    }

    fn error(&self, token: Token, message: impl Into<String>) -> LoxError {
        LoxError::Parse { token, message: message.into() }
    }

    /// Discards tokens until a likely statement boundary, so a single
    /// syntax error doesn't cascade into spurious follow-on errors.
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().r#type == Type::Semicolon {
                return;
            }

            match self.peek().r#type {
                Type::Class | Type::Fun | Type::Var | Type::For
                | Type::If | Type::While | Type::Print | Type::Return => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // --- declarations ---

    fn declaration(&mut self) -> Option<Stmt> {
        let result = if self.matches(&[Type::Class]) {
            self.class_declaration()
        } else if self.matches(&[Type::Fun]) {
            self.function("function").map(Stmt::Function)
        } else if self.matches(&[Type::Var]) {
            self.var_declaration()
        } else {
            self.statement()
        };

        match result {
            Ok(stmt) => Some(stmt),
            Err(error) => {
                self.reporter.report(&error);
                self.synchronize();
                None
            }
        }
    }

    fn class_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect class name.")?;

        let superclass = if self.matches(&[Type::Less]) {
            self.consume(Type::Identifier, "Expect superclass name.")?;
            let id = self.next_id();
            Some(Expr::Variable(VariableData { name: self.previous().clone(), id }))
        } else {
            None
        };

        self.consume(Type::LeftBrace, "Expect '{' before class body.")?;

        let mut methods = Vec::new();
        while !self.check(Type::RightBrace) && !self.is_at_end() {
            methods.push(self.function("method")?);
        }

        self.consume(Type::RightBrace, "Expect '}' after class body.")?;

        Ok(Stmt::Class(ClassData { name, superclass, methods }))
    }

    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.consume(Type::Identifier, "Expect variable name.")?;

        let initializer = if self.matches(&[Type::Equal]) { Some(self.expression()?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after variable declaration.")?;
        Ok(Stmt::Var(VarData { name, initializer }))
    }

    fn function(&mut self, kind: &str) -> ParseResult<Rc<FunctionDecl>> {
        let name = self.consume(Type::Identifier, &format!("Expect {kind} name."))?;

        self.consume(Type::LeftParen, &format!("Expect '(' after {kind} name."))?;

        let mut params = Vec::new();
        if !self.check(Type::RightParen) {
            loop {
                if params.len() >= MAX_ARGS {
                    self.reporter.report(&self.error(
                        self.peek().clone(),
                        format!("Can't have more than {MAX_ARGS} parameters."),
                    ));
                }

                params.push(self.consume(Type::Identifier, "Expect parameter name.")?);

                if !self.matches(&[Type::Comma]) {
                    break;
                }
            }
        }

        self.consume(Type::RightParen, "Expect ')' after parameters.")?;
        self.consume(Type::LeftBrace, &format!("Expect '{{' before {kind} body."))?;

        let body = self.block()?;

        Ok(Rc::new(FunctionDecl { name, params, body }))
    }

    // --- statements ---

    fn statement(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[Type::For]) {
            return self.for_statement();
        }
        if self.matches(&[Type::If]) {
            return self.if_statement();
        }
        if self.matches(&[Type::Print]) {
            return self.print_statement();
        }
        if self.matches(&[Type::Return]) {
            return self.return_statement();
        }
        if self.matches(&[Type::While]) {
            return self.while_statement();
        }
        if self.matches(&[Type::Break]) {
            return self.break_statement();
        }
        if self.matches(&[Type::LeftBrace]) {
            return Ok(Stmt::Block(BlockData { statements: self.block()? }));
        }

        self.expression_statement()
    }

    fn for_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.matches(&[Type::Semicolon]) {
            None
        } else if self.matches(&[Type::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };
        self.consume(Type::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if !self.check(Type::RightParen) { Some(self.expression()?) } else { None };
        self.consume(Type::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(BlockData {
                statements: vec![body, Stmt::Expression(ExpressionData { expr: increment })],
            });
        }

        body = Stmt::While(WhileData {
            condition: condition.unwrap_or(Expr::Literal(Literal::Bool(true))),
            body: Box::new(body),
        });

        if let Some(initializer) = initializer {
            body = Stmt::Block(BlockData { statements: vec![initializer, body] });
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.matches(&[Type::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If(IfData { condition, then_branch, else_branch }))
    }

    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print(PrintData { expr }))
    }

    fn return_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        let value = if !self.check(Type::Semicolon) { Some(self.expression()?) } else { None };

        self.consume(Type::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return(ReturnData { keyword, value }))
    }

    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.consume(Type::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(Type::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While(WhileData { condition, body }))
    }

    fn break_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();
        self.consume(Type::Semicolon, "Expect ';' after 'break'.")?;
        Ok(Stmt::Break(BreakData { keyword }))
    }

    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expr = self.expression()?;
        self.consume(Type::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(ExpressionData { expr }))
    }

    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(Type::RightBrace) && !self.is_at_end() {
            if let Some(stmt) = self.declaration() {
                statements.push(stmt);
            }
        }

        self.consume(Type::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    // --- expressions ---

    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[Type::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable(data) => {
                    let id = self.next_id();
                    Ok(Expr::Assign(AssignData { name: data.name, value: Box::new(value), id }))
                }
                Expr::Get(data) => Ok(Expr::Set(SetData {
                    object: data.object,
                    name: data.name,
                    value: Box::new(value),
                })),
                _ => {
                    self.reporter.report(&self.error(equals, "Invalid assignment target."));
                    Ok(value)
                }
            };
        }

        Ok(expr)
    }

    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.matches(&[Type::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.matches(&[Type::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::Logical(LogicalData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn equality(&mut self) -> ParseResult<Expr> {
        let mut expr = self.comparison()?;

        while self.matches(&[Type::BangEqual, Type::EqualEqual]) {
            let operator = self.previous().clone();
            let right = self.comparison()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn comparison(&mut self) -> ParseResult<Expr> {
        let mut expr = self.term()?;

        while self.matches(&[Type::Greater, Type::GreaterEqual, Type::Less, Type::LessEqual]) {
            let operator = self.previous().clone();
            let right = self.term()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn term(&mut self) -> ParseResult<Expr> {
        let mut expr = self.factor()?;

        while self.matches(&[Type::Minus, Type::Plus]) {
            let operator = self.previous().clone();
            let right = self.factor()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn factor(&mut self) -> ParseResult<Expr> {
        let mut expr = self.unary()?;

        while self.matches(&[Type::Slash, Type::Star]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            expr = Expr::Binary(BinaryData { left: Box::new(expr), operator, right: Box::new(right) });
        }

        Ok(expr)
    }

    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[Type::Bang, Type::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::Unary(UnaryData { operator, expr: Box::new(right) }));
        }

        self.call()
    }

    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut arguments = Vec::new();

        if !self.check(Type::RightParen) {
            loop {
                if arguments.len() >= MAX_ARGS {
                    self.reporter.report(&self.error(
                        self.peek().clone(),
                        format!("Can't have more than {MAX_ARGS} arguments."),
                    ));
                }

                arguments.push(self.expression()?);

                if !self.matches(&[Type::Comma]) {
                    break;
                }
            }
        }

        let paren = self.consume(Type::RightParen, "Expect ')' after arguments.")?;

        Ok(Expr::Call(CallData { callee: Box::new(callee), paren, arguments }))
    }

    fn call(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary()?;

        loop {
            if self.matches(&[Type::LeftParen]) {
                expr = self.finish_call(expr)?;
            } else if self.matches(&[Type::Dot]) {
                let name = self.consume(Type::Identifier, "Expect property name after '.'.")?;
                expr = Expr::Get(GetData { object: Box::new(expr), name });
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn primary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[Type::False]) {
            return Ok(Expr::Literal(Literal::Bool(false)));
        }
        if self.matches(&[Type::True]) {
            return Ok(Expr::Literal(Literal::Bool(true)));
        }
        if self.matches(&[Type::Nil]) {
            return Ok(Expr::Literal(Literal::Nil));
        }
        if self.matches(&[Type::Number, Type::String]) {
            let literal = self.previous().literal.clone().expect("number/string token to carry a literal");
            return Ok(Expr::Literal(literal));
        }
        if self.matches(&[Type::Super]) {
            let keyword = self.previous().clone();
            self.consume(Type::Dot, "Expect '.' after 'super'.")?;
            let method = self.consume(Type::Identifier, "Expect superclass method name.")?;
            let id = self.next_id();
            return Ok(Expr::Super(SuperData { keyword, method, id }));
        }
        if self.matches(&[Type::This]) {
            let keyword = self.previous().clone();
            let id = self.next_id();
            return Ok(Expr::This(ThisData { keyword, id }));
        }
        if self.matches(&[Type::Identifier]) {
            let name = self.previous().clone();
            let id = self.next_id();
            return Ok(Expr::Variable(VariableData { name, id }));
        }
        if self.matches(&[Type::LeftParen]) {
            let expr = self.expression()?;
            self.consume(Type::RightParen, "Expect ')' after expression.")?;
            return Ok(Expr::Grouping(GroupingData { expr: Box::new(expr) }));
        }

        Err(self.error(self.peek().clone(), "Expect expression."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::Scanner;

    fn parse(source: &str) -> (Vec<Stmt>, ErrorReporter) {
        let reporter = ErrorReporter::new();
        let tokens = Scanner::new(source, reporter.clone()).scan_tokens();
        let statements = Parser::new(tokens, reporter.clone()).parse();
        (statements, reporter)
    }

    #[test]
    fn parses_a_print_statement() {
        let (statements, reporter) = parse("print 1 + 2;");
        assert!(!reporter.had_error());
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Stmt::Print(_)));
    }

    #[test]
    fn for_loop_desugars_to_block_with_while() {
        let (statements, reporter) = parse("for (var i = 0; i < 3; i = i + 1) print i;");
        assert!(!reporter.had_error());
        assert_eq!(statements.len(), 1);
        let Stmt::Block(block) = &statements[0] else { panic!("expected a block") };
        assert_eq!(block.statements.len(), 2); // initializer + while
        assert!(matches!(block.statements[0], Stmt::Var(_)));
        assert!(matches!(block.statements[1], Stmt::While(_)));
    }

    #[test]
    fn for_loop_without_clauses_has_true_condition() {
        let (statements, _) = parse("for (;;) print 1;");
        let Stmt::While(data) = &statements[0] else { panic!("expected while") };
        assert!(matches!(data.condition, Expr::Literal(Literal::Bool(true))));
    }

    #[test]
    fn assignment_reinterprets_variable_as_assign_target() {
        let (statements, reporter) = parse("a = 1;");
        assert!(!reporter.had_error());
        let Stmt::Expression(data) = &statements[0] else { panic!("expected expr stmt") };
        assert!(matches!(data.expr, Expr::Assign(_)));
    }

    #[test]
    fn invalid_assignment_target_is_reported_but_parsing_continues() {
        let (statements, reporter) = parse("1 = 2; print 3;");
        assert!(reporter.had_error());
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn missing_semicolon_synchronizes_to_next_statement() {
        let (statements, reporter) = parse("var a = 1 print a;");
        assert!(reporter.had_error());
        // the bad `var` declaration is dropped, but `print a;` still parses.
        assert_eq!(statements.len(), 1);
        assert!(matches!(statements[0], Stmt::Print(_)));
    }

    #[test]
    fn class_with_superclass() {
        let (statements, reporter) = parse("class B < A { m() { return 1; } }");
        assert!(!reporter.had_error());
        let Stmt::Class(data) = &statements[0] else { panic!("expected class") };
        assert!(data.superclass.is_some());
        assert_eq!(data.methods.len(), 1);
    }

    #[test]
    fn break_outside_braces_is_a_statement() {
        let (statements, reporter) = parse("while (true) { break; }");
        assert!(!reporter.had_error());
        let Stmt::While(data) = &statements[0] else { panic!("expected while") };
        let Stmt::Block(block) = data.body.as_ref() else { panic!("expected block") };
        assert!(matches!(block.statements[0], Stmt::Break(_)));
    }
}
