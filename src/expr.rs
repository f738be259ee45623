use crate::literal::Literal;
use crate::token::Token;

/// An expression node. Every variant carries its own data struct so the
/// resolver and interpreter can match on `&Expr` while still holding a
/// `&XxxData` with named fields, mirroring how the statement nodes in
/// `stmt.rs` are shaped.
///
/// Each `Expr` the parser hands back is evaluated/resolved by reference.
/// The resolver's side table in [`crate::interpreter::Interpreter`] is
/// keyed on the `id` carried by `VariableData`/`AssignData`/`ThisData`/
/// `SuperData` — a counter the parser bumps once per node — rather than on
/// `Token` identity, since two occurrences of the same name on the same
/// source line (e.g. a shadowed local read back to back with a global of
/// the same name) would otherwise collide in the side table.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    Grouping(GroupingData),
    Unary(UnaryData),
    Binary(BinaryData),
    Logical(LogicalData),
    Variable(VariableData),
    Assign(AssignData),
    Call(CallData),
    Get(GetData),
    Set(SetData),
    This(ThisData),
    Super(SuperData),
}

#[derive(Debug, Clone)]
pub struct GroupingData {
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct UnaryData {
    pub operator: Token,
    pub expr: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct BinaryData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct LogicalData {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct VariableData {
    pub name: Token,
    pub id: u64,
}

#[derive(Debug, Clone)]
pub struct AssignData {
    pub name: Token,
    pub value: Box<Expr>,
    pub id: u64,
}

#[derive(Debug, Clone)]
pub struct CallData {
    pub callee: Box<Expr>,
    pub paren: Token,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone)]
pub struct GetData {
    pub object: Box<Expr>,
    pub name: Token,
}

#[derive(Debug, Clone)]
pub struct SetData {
    pub object: Box<Expr>,
    pub name: Token,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone)]
pub struct ThisData {
    pub keyword: Token,
    pub id: u64,
}

#[derive(Debug, Clone)]
pub struct SuperData {
    pub keyword: Token,
    pub method: Token,
    pub id: u64,
}

impl Expr {
    /// Dispatches to the matching `visit_*_expr` method, Crafting-
    /// Interpreters style.
    pub fn accept<T>(&self, visitor: &mut dyn ExprVisitor<T>) -> T {
        match self {
            Expr::Literal(data) => visitor.visit_literal_expr(data),
            Expr::Grouping(data) => visitor.visit_grouping_expr(data),
            Expr::Unary(data) => visitor.visit_unary_expr(data),
            Expr::Binary(data) => visitor.visit_binary_expr(data),
            Expr::Logical(data) => visitor.visit_logical_expr(data),
            Expr::Variable(data) => visitor.visit_variable_expr(data),
            Expr::Assign(data) => visitor.visit_assign_expr(data),
            Expr::Call(data) => visitor.visit_call_expr(data),
            Expr::Get(data) => visitor.visit_get_expr(data),
            Expr::Set(data) => visitor.visit_set_expr(data),
            Expr::This(data) => visitor.visit_this_expr(data),
            Expr::Super(data) => visitor.visit_super_expr(data),
        }
    }
}

pub trait ExprVisitor<T> {
    fn visit_literal_expr(&mut self, data: &Literal) -> T;
    fn visit_grouping_expr(&mut self, data: &GroupingData) -> T;
    fn visit_unary_expr(&mut self, data: &UnaryData) -> T;
    fn visit_binary_expr(&mut self, data: &BinaryData) -> T;
    fn visit_logical_expr(&mut self, data: &LogicalData) -> T;
    fn visit_variable_expr(&mut self, data: &VariableData) -> T;
    fn visit_assign_expr(&mut self, data: &AssignData) -> T;
    fn visit_call_expr(&mut self, data: &CallData) -> T;
    fn visit_get_expr(&mut self, data: &GetData) -> T;
    fn visit_set_expr(&mut self, data: &SetData) -> T;
    fn visit_this_expr(&mut self, data: &ThisData) -> T;
    fn visit_super_expr(&mut self, data: &SuperData) -> T;
}
