//! Column predicates and orderings rendered into SQL with bound values.
//!
//! Column names are checked against the entity's declared columns before they
//! are spliced into SQL; values always travel as bind parameters.

use hirelink_schema::Workload;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{Sqlite, query::Query};

use crate::db::entity::{Entity, ensure_column};
use crate::error::HirelinkError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<Workload> for Value {
    fn from(v: Workload) -> Self {
        Value::Text(v.as_str().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    /// SQL `LIKE` with `%`/`_` wildcards.
    Like,
}

impl Op {
    fn as_sql(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Ne => "<>",
            Op::Gt => ">",
            Op::Ge => ">=",
            Op::Lt => "<",
            Op::Le => "<=",
            Op::Like => "LIKE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub op: Op,
    pub value: Value,
}

/// Conjunction of column predicates. Empty means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, column: impl Into<String>, op: Op, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate {
            column: column.into(),
            op,
            value: value.into(),
        });
        self
    }

    pub fn eq(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(column, Op::Eq, value)
    }

    pub fn gt(self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.and(column, Op::Gt, value)
    }

    pub fn like(self, column: impl Into<String>, pattern: impl Into<Value>) -> Self {
        self.and(column, Op::Like, pattern)
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    /// Fails on the first predicate naming a column `E` does not declare.
    pub(crate) fn check<E: Entity>(&self) -> Result<(), HirelinkError> {
        self.predicates
            .iter()
            .try_for_each(|p| ensure_column::<E>(&p.column))
    }

    /// Appends ` AND alias.col op ?` for every predicate.
    pub(crate) fn render_and<E: Entity>(
        &self,
        alias: &str,
        out: &mut SqlFragment,
    ) -> Result<(), HirelinkError> {
        for p in &self.predicates {
            ensure_column::<E>(&p.column)?;
            out.push(&format!(" AND {alias}.{} {} ?", p.column, p.op.as_sql()));
            out.bind(p.value.clone());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: false,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            descending: true,
        }
    }

    /// `alias.col [DESC], alias.id`; the id tie-break keeps results stable.
    pub(crate) fn render<E: Entity>(&self, alias: &str) -> Result<String, HirelinkError> {
        ensure_column::<E>(&self.column)?;
        let dir = if self.descending { " DESC" } else { "" };
        if self.column == "id" {
            Ok(format!("{alias}.id{dir}"))
        } else {
            Ok(format!("{alias}.{}{dir}, {alias}.id", self.column))
        }
    }
}

impl Default for OrderBy {
    fn default() -> Self {
        Self::asc("id")
    }
}

/// SQL text plus the values for its `?` placeholders, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlFragment {
    pub sql: String,
    pub binds: Vec<Value>,
}

impl SqlFragment {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    pub fn push(&mut self, sql: &str) -> &mut Self {
        self.sql.push_str(sql);
        self
    }

    pub fn bind(&mut self, value: impl Into<Value>) -> &mut Self {
        self.binds.push(value.into());
        self
    }

    /// Builds a query borrowing the SQL text, with every value bound.
    pub fn query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        let mut q = sqlx::query(self.sql.as_str());
        for v in &self.binds {
            q = match v {
                Value::Int(i) => q.bind(*i),
                Value::Text(s) => q.bind(s.as_str()),
            };
        }
        q
    }
}

pub(crate) fn decode_all<E: Entity>(rows: &[SqliteRow], prefix: &str) -> Result<Vec<E>, HirelinkError> {
    rows.iter()
        .map(|r| E::decode(r, prefix).map_err(HirelinkError::from))
        .collect()
}
