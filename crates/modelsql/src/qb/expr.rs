//! Expression tree for WHERE/HAVING/ON conditions and SET values.
//!
//! Everything that can appear in a condition converts into [`Expr`]. Predicates nest
//! arbitrarily; when rendered, a predicate child is wrapped in parentheses so the tree's
//! grouping survives as written:
//!
//! ```ignore
//! use modelsql::qb::col;
//!
//! // (`age` > ?) AND ((`name` = ?) OR (`name` = ?))
//! let p = col("age").gt(18).and(col("name").eq("a").or(col("name").eq("b")));
//! ```

use super::table::{Subquery, TableRef};
use crate::value::Value;

/// Predicate operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
    In,
    And,
    Or,
    Not,
    Exists,
}

impl Op {
    pub fn as_str(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "!=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Like => "LIKE",
            Op::In => "IN",
            Op::And => "AND",
            Op::Or => "OR",
            Op::Not => "NOT",
            Op::Exists => "EXISTS",
        }
    }
}

/// Expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Column reference, rendered as a quoted identifier.
    Column(Column),
    /// Literal, always bound as an argument.
    Value(Value),
    Predicate(Box<Predicate>),
    Aggregate(Aggregate),
    /// Scalar or set-valued subquery: `(SELECT ...)`.
    Subquery(Subquery),
    /// `ANY`/`ALL`/`SOME` applied to a subquery.
    SubqueryExpr(SubqueryExpr),
}

/// `left op right`, or `op right` for unary operators (`NOT`, `EXISTS`).
#[derive(Debug, Clone)]
pub struct Predicate {
    pub(crate) left: Option<Expr>,
    pub(crate) op: Op,
    pub(crate) right: Expr,
}

impl Predicate {
    fn binary(left: impl IntoExpr, op: Op, right: impl IntoExpr) -> Self {
        Self {
            left: Some(left.into_expr()),
            op,
            right: right.into_expr(),
        }
    }

    fn unary(op: Op, right: Expr) -> Self {
        Self {
            left: None,
            op,
            right,
        }
    }

    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::binary(self, Op::And, other)
    }

    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::binary(self, Op::Or, other)
    }

    pub fn op(&self) -> Op {
        self.op
    }
}

/// `NOT (p)`.
pub fn not(p: Predicate) -> Predicate {
    Predicate::unary(Op::Not, p.into_expr())
}

/// `EXISTS (subquery)`.
pub fn exists(sub: Subquery) -> Predicate {
    Predicate::unary(Op::Exists, Expr::Subquery(sub))
}

/// Conversion into an expression operand.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for Predicate {
    fn into_expr(self) -> Expr {
        Expr::Predicate(Box::new(self))
    }
}

impl IntoExpr for Column {
    fn into_expr(self) -> Expr {
        Expr::Column(self)
    }
}

impl IntoExpr for Aggregate {
    fn into_expr(self) -> Expr {
        Expr::Aggregate(self)
    }
}

impl IntoExpr for Subquery {
    fn into_expr(self) -> Expr {
        Expr::Subquery(self)
    }
}

impl IntoExpr for SubqueryExpr {
    fn into_expr(self) -> Expr {
        Expr::SubqueryExpr(self)
    }
}

impl IntoExpr for Value {
    fn into_expr(self) -> Expr {
        Expr::Value(self)
    }
}

macro_rules! impl_into_expr_for_values {
    ($($kind:ident => $ty:ty),* $(,)?) => {
        $(
            impl IntoExpr for $ty {
                fn into_expr(self) -> Expr {
                    Expr::Value(Value::from(self))
                }
            }

            impl IntoExpr for Option<$ty> {
                fn into_expr(self) -> Expr {
                    Expr::Value(Value::from(self))
                }
            }
        )*
    };
}

crate::value::for_each_scalar!(impl_into_expr_for_values);

impl IntoExpr for &str {
    fn into_expr(self) -> Expr {
        Expr::Value(Value::from(self))
    }
}

impl IntoExpr for &[u8] {
    fn into_expr(self) -> Expr {
        Expr::Value(Value::from(self))
    }
}

/// A column, optionally qualified by a table reference and optionally aliased in
/// the select list.
///
/// `name` is a Rust field name or a column name of the model it resolves against.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) table: Option<TableRef>,
    pub(crate) name: String,
    pub(crate) alias: Option<String>,
}

/// Unqualified column of the statement's own model.
pub fn col(name: impl Into<String>) -> Column {
    Column::new(name)
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            table: None,
            name: name.into(),
            alias: None,
        }
    }

    pub(crate) fn qualified(table: TableRef, name: impl Into<String>) -> Self {
        Self {
            table: Some(table),
            name: name.into(),
            alias: None,
        }
    }

    /// Alias used in the select list: `col AS alias`.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn eq(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Eq, value)
    }

    pub fn ne(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Ne, value)
    }

    pub fn lt(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Lt, value)
    }

    pub fn le(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Le, value)
    }

    pub fn gt(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Gt, value)
    }

    pub fn ge(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Ge, value)
    }

    pub fn like(self, pattern: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Like, pattern)
    }

    /// `col IN (subquery)`.
    pub fn in_query(self, sub: Subquery) -> Predicate {
        Predicate::binary(self, Op::In, sub)
    }
}

/// Aggregate function over a column, or `COUNT(*)`.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub(crate) func: &'static str,
    pub(crate) arg: Option<Column>,
    pub(crate) alias: Option<String>,
}

impl Aggregate {
    fn new(func: AggregateFn, column: impl Into<String>) -> Self {
        Self {
            func: func.as_str(),
            arg: Some(Column::new(column)),
            alias: None,
        }
    }

    /// Aggregate over an already built (possibly qualified) column.
    pub fn over(func: AggregateFn, column: Column) -> Self {
        Self {
            func: func.as_str(),
            arg: Some(column),
            alias: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn eq(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Eq, value)
    }

    pub fn ne(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Ne, value)
    }

    pub fn lt(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Lt, value)
    }

    pub fn le(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Le, value)
    }

    pub fn gt(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Gt, value)
    }

    pub fn ge(self, value: impl IntoExpr) -> Predicate {
        Predicate::binary(self, Op::Ge, value)
    }
}

/// Aggregate functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFn {
    Avg,
    Sum,
    Count,
    Max,
    Min,
}

impl AggregateFn {
    pub fn as_str(self) -> &'static str {
        match self {
            AggregateFn::Avg => "AVG",
            AggregateFn::Sum => "SUM",
            AggregateFn::Count => "COUNT",
            AggregateFn::Max => "MAX",
            AggregateFn::Min => "MIN",
        }
    }
}

pub fn avg(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Avg, column)
}

pub fn sum(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Sum, column)
}

pub fn count(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Count, column)
}

/// `COUNT(*)`
pub fn count_all() -> Aggregate {
    Aggregate {
        func: AggregateFn::Count.as_str(),
        arg: None,
        alias: None,
    }
}

pub fn max(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Max, column)
}

pub fn min(column: impl Into<String>) -> Aggregate {
    Aggregate::new(AggregateFn::Min, column)
}

/// Quantified comparison against a subquery: `col = ANY (SELECT ...)`.
#[derive(Debug, Clone)]
pub struct SubqueryExpr {
    pub(crate) keyword: &'static str,
    pub(crate) sub: Subquery,
}

pub fn any(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "ANY",
        sub,
    }
}

pub fn all(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "ALL",
        sub,
    }
}

pub fn some(sub: Subquery) -> SubqueryExpr {
    SubqueryExpr {
        keyword: "SOME",
        sub,
    }
}

/// Entries of a select list.
#[derive(Debug, Clone)]
pub enum Selectable {
    Column(Column),
    Aggregate(Aggregate),
}

impl From<Column> for Selectable {
    fn from(c: Column) -> Self {
        Selectable::Column(c)
    }
}

impl From<Aggregate> for Selectable {
    fn from(a: Aggregate) -> Self {
        Selectable::Aggregate(a)
    }
}

impl Selectable {
    /// Name the entry is exposed under when its statement is used as a subquery.
    pub(crate) fn exposed_name(&self) -> Option<&str> {
        match self {
            Selectable::Column(c) => Some(c.alias.as_deref().unwrap_or(&c.name)),
            Selectable::Aggregate(a) => a.alias.as_deref(),
        }
    }
}

/// Entries of an UPDATE's SET list.
#[derive(Debug, Clone)]
pub enum Assignable {
    /// Take the value from the entity being updated; omitted when zero.
    Column(Column),
    Assignment(Assignment),
}

/// `column = value`.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub(crate) column: String,
    pub(crate) value: Expr,
    pub(crate) skip_zero: bool,
}

/// `column = value`, always rendered.
pub fn assign(column: impl Into<String>, value: impl IntoExpr) -> Assignment {
    Assignment {
        column: column.into(),
        value: value.into_expr(),
        skip_zero: false,
    }
}

/// `column = value`, omitted when `value` is a literal zero value.
pub fn assign_non_zero(column: impl Into<String>, value: impl IntoExpr) -> Assignment {
    Assignment {
        column: column.into(),
        value: value.into_expr(),
        skip_zero: true,
    }
}

impl Assignment {
    /// Whether the assignment drops out of the SET list.
    pub(crate) fn is_skipped(&self) -> bool {
        self.skip_zero && matches!(&self.value, Expr::Value(v) if v.is_zero())
    }
}

impl From<Column> for Assignable {
    fn from(c: Column) -> Self {
        Assignable::Column(c)
    }
}

impl From<Assignment> for Assignable {
    fn from(a: Assignment) -> Self {
        Assignable::Assignment(a)
    }
}
