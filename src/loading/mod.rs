//! Relationship loading.
//!
//! [`load_with_relation`] fetches parents plus the contents of one relation
//! using an explicit [`LoadStrategy`]. Strategies differ only in how many
//! round trips they take; for the same inputs they return the same
//! (parent, children) pairs, children ordered by primary key.
//!
//! Nothing here performs IO on field access: every relation is materialized
//! inside the load call, on the caller's session.

pub mod assemble;
pub mod filter;
pub mod relations;

pub use assemble::{WithRelation, dedup_joined, group_by_link};
pub use filter::{Filter, Op, OrderBy, SqlFragment, Value};
pub use relations::{RelationDescriptor, RelationKind, RelationRegistry};

use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection};
use tracing::debug;

use crate::db::entity::{Entity, ensure_column, select_list};
use crate::error::HirelinkError;
use filter::decode_all;

const PARENT_PREFIX: &str = "p_";
const CHILD_PREFIX: &str = "c_";
const LINK_KEY: &str = "link_key";

/// Keys per `IN (...)` list in a batched child query.
pub const IN_CHUNK: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStrategy {
    /// One query for the parents, then one child query per parent (1 + N).
    Lazy,
    /// One query with an outer join; parents de-duplicated afterwards.
    Joined,
    /// Parents first, then all children whose link key is in the parent key set.
    BatchedIn,
    /// One inner join filtered on the child table. Only parents with matching
    /// children are returned, and only the matching children are attached.
    JoinWithFilter,
}

/// Which parents to load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentQuery {
    pub filter: Filter,
    pub order: OrderBy,
    pub limit: Option<u32>,
}

impl ParentQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn order(mut self, order: OrderBy) -> Self {
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Keep at most `limit` children per parent, chosen by `order`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerParentLimit {
    pub limit: u32,
    pub order: OrderBy,
}

/// Restrictions on the children attached to each parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadOptions {
    pub child_filter: Filter,
    pub per_parent_limit: Option<PerParentLimit>,
}

impl LoadOptions {
    pub fn filtered(child_filter: Filter) -> Self {
        Self {
            child_filter,
            per_parent_limit: None,
        }
    }

    pub fn per_parent_limit(mut self, limit: u32, order: OrderBy) -> Self {
        self.per_parent_limit = Some(PerParentLimit { limit, order });
        self
    }
}

/// Result of a load, with the number of statements it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<P, C> {
    pub items: Vec<WithRelation<P, C>>,
    pub round_trips: usize,
}

impl<P, C> Loaded<P, C> {
    pub fn into_items(self) -> Vec<WithRelation<P, C>> {
        self.items
    }
}

/// Loads parents of type `P` with relation `relation` populated by children of type `C`.
///
/// `C` may be a partial projection of the child table; only its declared
/// columns are read. Any error from any statement aborts the whole load.
pub async fn load_with_relation<P: Entity, C: Entity>(
    conn: &mut SqliteConnection,
    registry: &RelationRegistry,
    parents: &ParentQuery,
    relation: &str,
    strategy: LoadStrategy,
    options: &LoadOptions,
) -> Result<Loaded<P, C>, HirelinkError> {
    let rel = resolve::<P, C>(registry, relation)?;
    let plan = ChildPlan::<C>::new(rel, options)?;

    let loaded = match strategy {
        LoadStrategy::Joined => {
            let items = fetch_joined::<P, C>(conn, parents, &plan, JoinType::Left).await?;
            Loaded {
                items,
                round_trips: 1,
            }
        }
        LoadStrategy::JoinWithFilter => {
            let items = fetch_joined::<P, C>(conn, parents, &plan, JoinType::Inner).await?;
            Loaded {
                items,
                round_trips: 1,
            }
        }
        LoadStrategy::BatchedIn => {
            let parent_rows = fetch_parents::<P>(conn, parents).await?;
            let keys: Vec<i64> = parent_rows.iter().map(Entity::id).collect();
            let mut children = Vec::new();
            let mut round_trips = 1;
            for chunk in keys.chunks(IN_CHUNK) {
                children.extend(plan.fetch(conn, chunk).await?);
                round_trips += 1;
            }
            Loaded {
                items: group_by_link(parent_rows, children),
                round_trips,
            }
        }
        LoadStrategy::Lazy => {
            let parent_rows = fetch_parents::<P>(conn, parents).await?;
            let mut items = Vec::with_capacity(parent_rows.len());
            for parent in parent_rows {
                let key = parent.id();
                let children = plan.fetch(conn, &[key]).await?;
                let mut related: Vec<C> = children.into_iter().map(|(_, c)| c).collect();
                related.sort_by_key(Entity::id);
                items.push(WithRelation { parent, related });
            }
            let round_trips = 1 + items.len();
            Loaded { items, round_trips }
        }
    };

    debug!(
        relation = %rel.qualified_name(),
        strategy = ?strategy,
        parents = loaded.items.len(),
        round_trips = loaded.round_trips,
        "relation loaded"
    );
    Ok(loaded)
}

fn resolve<'r, P: Entity, C: Entity>(
    registry: &'r RelationRegistry,
    relation: &str,
) -> Result<&'r RelationDescriptor, HirelinkError> {
    let rel = registry.get(P::TABLE, relation)?;
    if rel.child != C::TABLE {
        return Err(HirelinkError::RelationMismatch {
            relation: rel.qualified_name(),
            parent: P::TABLE,
            child: C::TABLE,
        });
    }
    if let RelationKind::ManyToOne { foreign_key } = rel.kind {
        ensure_column::<P>(foreign_key)?;
    }
    Ok(rel)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinType {
    Left,
    Inner,
}

impl JoinType {
    fn as_sql(self) -> &'static str {
        match self {
            JoinType::Left => "LEFT JOIN",
            JoinType::Inner => "JOIN",
        }
    }
}

/// `SELECT ... FROM parent` restricted, ordered and limited per `query`, aliased `alias`.
fn parent_select<P: Entity>(
    query: &ParentQuery,
    alias: &str,
    columns: &str,
) -> Result<SqlFragment, HirelinkError> {
    let mut frag = SqlFragment::new(format!(
        "SELECT {columns} FROM {} {alias} WHERE 1 = 1",
        P::TABLE
    ));
    query.filter.render_and::<P>(alias, &mut frag)?;
    frag.push(&format!(" ORDER BY {}", query.order.render::<P>(alias)?));
    if let Some(limit) = query.limit {
        frag.push(&format!(" LIMIT {limit}"));
    }
    Ok(frag)
}

async fn fetch_parents<P: Entity>(
    conn: &mut SqliteConnection,
    query: &ParentQuery,
) -> Result<Vec<P>, HirelinkError> {
    let frag = parent_select::<P>(query, "p", &select_list::<P>("p", ""))?;
    let rows = frag.query().fetch_all(&mut *conn).await?;
    decode_all::<P>(&rows, "")
}

async fn fetch_joined<P: Entity, C: Entity>(
    conn: &mut SqliteConnection,
    parents: &ParentQuery,
    plan: &ChildPlan<'_, C>,
    join: JoinType,
) -> Result<Vec<WithRelation<P, C>>, HirelinkError> {
    let frag = joined_sql::<P, C>(parents, plan, join)?;
    let rows = frag.query().fetch_all(&mut *conn).await?;

    let mut pairs = Vec::with_capacity(rows.len());
    for row in &rows {
        let parent = P::decode(row, PARENT_PREFIX)?;
        let child_id: Option<i64> = row.try_get(format!("{CHILD_PREFIX}id").as_str())?;
        let child = match child_id {
            Some(_) => Some(C::decode(row, CHILD_PREFIX)?),
            None => None,
        };
        pairs.push((parent, child));
    }
    Ok(dedup_joined(pairs))
}

fn joined_sql<P: Entity, C: Entity>(
    parents: &ParentQuery,
    plan: &ChildPlan<'_, C>,
    join: JoinType,
) -> Result<SqlFragment, HirelinkError> {
    let inner = parent_select::<P>(parents, "p0", "p0.*")?;
    let order = parents.order.render::<P>("p")?;

    let mut frag = SqlFragment::new(format!(
        "SELECT {}, {} FROM ({}) p ",
        select_list::<P>("p", PARENT_PREFIX),
        select_list::<C>("c", CHILD_PREFIX),
        inner.sql
    ));
    frag.binds = inner.binds;
    plan.render_join(join, &mut frag)?;
    frag.push(&format!(" ORDER BY {order}, c.id"));
    Ok(frag)
}

/// SQL knowledge for reaching the children of a relation.
struct ChildPlan<'a, C> {
    rel: &'a RelationDescriptor,
    options: &'a LoadOptions,
    _child: std::marker::PhantomData<C>,
}

impl<'a, C: Entity> ChildPlan<'a, C> {
    /// Validates every child column up front so no strategy reaches the store
    /// with a bad filter.
    fn new(rel: &'a RelationDescriptor, options: &'a LoadOptions) -> Result<Self, HirelinkError> {
        rel.condition.check::<C>()?;
        options.child_filter.check::<C>()?;
        if let Some(limit) = &options.per_parent_limit {
            if !matches!(rel.kind, RelationKind::OneToMany { .. }) {
                return Err(HirelinkError::UnsupportedLimit(rel.qualified_name()));
            }
            ensure_column::<C>(&limit.order.column)?;
        }
        Ok(Self {
            rel,
            options,
            _child: std::marker::PhantomData,
        })
    }

    /// ` AND <relation condition> AND <child filter> AND <per-parent limit>` on alias `c`.
    fn render_conditions(&self, frag: &mut SqlFragment) -> Result<(), HirelinkError> {
        self.rel.condition.render_and::<C>("c", frag)?;
        self.options.child_filter.render_and::<C>("c", frag)?;

        if let (Some(limit), RelationKind::OneToMany { foreign_key }) =
            (&self.options.per_parent_limit, &self.rel.kind)
        {
            frag.push(&format!(
                " AND c.id IN (SELECT c2.id FROM {child} c2 WHERE c2.{fk} = c.{fk}",
                child = self.rel.child,
                fk = foreign_key
            ));
            self.rel.condition.render_and::<C>("c2", frag)?;
            self.options.child_filter.render_and::<C>("c2", frag)?;
            frag.push(&format!(
                " ORDER BY {} LIMIT {})",
                limit.order.render::<C>("c2")?,
                limit.limit
            ));
        }
        Ok(())
    }

    /// Joins the child (alias `c`) onto a parent aliased `p`.
    fn render_join(&self, join: JoinType, frag: &mut SqlFragment) -> Result<(), HirelinkError> {
        let jt = join.as_sql();
        let child = self.rel.child;
        match &self.rel.kind {
            RelationKind::OneToMany { foreign_key } => {
                frag.push(&format!("{jt} {child} c ON c.{foreign_key} = p.id"));
            }
            RelationKind::ManyToOne { foreign_key } => {
                frag.push(&format!("{jt} {child} c ON c.id = p.{foreign_key}"));
            }
            RelationKind::ManyToMany {
                secondary,
                parent_key,
                child_key,
            } => {
                frag.push(&format!(
                    "{jt} {secondary} s ON s.{parent_key} = p.id {jt} {child} c ON c.id = s.{child_key}"
                ));
            }
        }
        self.render_conditions(frag)
    }

    /// Child rows for `keys`, each tagged with the parent key it belongs to.
    fn batched_sql(&self, keys: &[i64]) -> Result<SqlFragment, HirelinkError> {
        let child = self.rel.child;
        let (source, link) = match &self.rel.kind {
            RelationKind::OneToMany { foreign_key } => {
                (format!("{child} c"), format!("c.{foreign_key}"))
            }
            RelationKind::ManyToOne { foreign_key } => (
                format!(
                    "{parent} pl JOIN {child} c ON c.id = pl.{foreign_key}",
                    parent = self.rel.parent
                ),
                "pl.id".to_string(),
            ),
            RelationKind::ManyToMany {
                secondary,
                parent_key,
                child_key,
            } => (
                format!("{secondary} s JOIN {child} c ON c.id = s.{child_key}"),
                format!("s.{parent_key}"),
            ),
        };

        let placeholders = vec!["?"; keys.len()].join(", ");
        let mut frag = SqlFragment::new(format!(
            "SELECT {}, {link} AS {LINK_KEY} FROM {source} WHERE {link} IN ({placeholders})",
            select_list::<C>("c", CHILD_PREFIX),
        ));
        for key in keys {
            frag.bind(*key);
        }
        self.render_conditions(&mut frag)?;
        frag.push(&format!(" ORDER BY {LINK_KEY}, c.id"));
        Ok(frag)
    }

    async fn fetch(
        &self,
        conn: &mut SqliteConnection,
        keys: &[i64],
    ) -> Result<Vec<(i64, C)>, HirelinkError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let frag = self.batched_sql(keys)?;
        let rows = frag.query().fetch_all(&mut *conn).await?;
        rows.iter()
            .map(|row| -> Result<(i64, C), HirelinkError> {
                let link: i64 = row.try_get(LINK_KEY)?;
                Ok((link, C::decode(row, CHILD_PREFIX)?))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Resume, Vacancy, VacancyBrief, Worker};
    use hirelink_schema::Workload;

    fn registry() -> RelationRegistry {
        RelationRegistry::hiring().unwrap()
    }

    #[test]
    fn joined_sql_keeps_parent_limit_inside_subquery() {
        let reg = registry();
        let rel = reg.get("workers", "resumes").unwrap();
        let options = LoadOptions::default();
        let plan = ChildPlan::<Resume>::new(rel, &options).unwrap();
        let parents = ParentQuery::all().limit(2);

        let frag = joined_sql::<Worker, Resume>(&parents, &plan, JoinType::Left).unwrap();
        assert!(frag.sql.contains("FROM (SELECT p0.* FROM workers p0 WHERE 1 = 1 ORDER BY p0.id LIMIT 2) p "));
        assert!(frag.sql.contains("LEFT JOIN resumes c ON c.worker_id = p.id"));
        assert!(frag.sql.ends_with(" ORDER BY p.id, c.id"));
        assert!(frag.binds.is_empty());
    }

    #[test]
    fn relation_condition_is_part_of_every_join() {
        let reg = registry();
        let rel = reg.get("workers", "resumes_parttime").unwrap();
        let options = LoadOptions::default();
        let plan = ChildPlan::<Resume>::new(rel, &options).unwrap();

        let joined = joined_sql::<Worker, Resume>(&ParentQuery::all(), &plan, JoinType::Left).unwrap();
        assert!(joined.sql.contains("ON c.worker_id = p.id AND c.workload = ?"));
        assert_eq!(joined.binds, vec![Value::from(Workload::Parttime)]);

        let batched = plan.batched_sql(&[1, 2]).unwrap();
        assert!(batched.sql.contains("WHERE c.worker_id IN (?, ?) AND c.workload = ?"));
        assert_eq!(
            batched.binds,
            vec![Value::Int(1), Value::Int(2), Value::from(Workload::Parttime)]
        );
    }

    #[test]
    fn per_parent_limit_uses_correlated_subquery_with_configured_order() {
        let reg = registry();
        let rel = reg.get("workers", "resumes").unwrap();
        let options = LoadOptions::filtered(Filter::new().eq("workload", "parttime"))
            .per_parent_limit(2, OrderBy::desc("compensation"));
        let plan = ChildPlan::<Resume>::new(rel, &options).unwrap();

        let mut frag = SqlFragment::default();
        plan.render_conditions(&mut frag).unwrap();
        assert_eq!(
            frag.sql,
            " AND c.workload = ? AND c.id IN (SELECT c2.id FROM resumes c2 WHERE c2.worker_id = c.worker_id AND c2.workload = ? ORDER BY c2.compensation DESC, c2.id LIMIT 2)"
        );
        assert_eq!(frag.binds.len(), 2);
    }

    #[test]
    fn per_parent_limit_is_rejected_off_one_to_many() {
        let reg = registry();
        let rel = reg.get("resumes", "vacancies_replied").unwrap();
        let options = LoadOptions::default().per_parent_limit(1, OrderBy::default());
        let err = ChildPlan::<Vacancy>::new(rel, &options).err().unwrap();
        assert!(matches!(err, HirelinkError::UnsupportedLimit(_)));
    }

    #[test]
    fn many_to_many_goes_through_the_association_table() {
        let reg = registry();
        let rel = reg.get("resumes", "vacancies_replied").unwrap();
        let options = LoadOptions::default();
        let plan = ChildPlan::<VacancyBrief>::new(rel, &options).unwrap();

        let frag = plan.batched_sql(&[4]).unwrap();
        assert_eq!(
            frag.sql,
            "SELECT c.id AS c_id, c.title AS c_title, s.resume_id AS link_key FROM vacancies_replies s JOIN vacancies c ON c.id = s.vacancy_id WHERE s.resume_id IN (?) ORDER BY link_key, c.id"
        );
    }

    #[test]
    fn child_columns_are_checked_when_the_plan_is_built() {
        let reg = registry();
        let rel = reg.get("workers", "resumes").unwrap();
        let options = LoadOptions::filtered(Filter::new().gt("salary", 1));
        let err = ChildPlan::<Resume>::new(rel, &options).err().unwrap();
        assert!(matches!(err, HirelinkError::UnknownColumn { table: "resumes", .. }));

        let rel = reg.get("workers", "resumes_parttime").unwrap();
        let options = LoadOptions::default();
        assert!(ChildPlan::<Resume>::new(rel, &options).is_ok());
    }

    #[test]
    fn child_type_must_match_relation() {
        let reg = registry();
        let err = resolve::<Worker, Vacancy>(&reg, "resumes").unwrap_err();
        assert!(matches!(err, HirelinkError::RelationMismatch { .. }));

        let err = resolve::<Worker, Resume>(&reg, "pets").unwrap_err();
        assert!(matches!(err, HirelinkError::UnknownRelation(_)));
    }
}
