//! In-memory assembly of parent/child rows. No IO.

use ahash::{AHashMap, AHashSet};

use crate::db::entity::Entity;

/// A parent together with the already-loaded contents of one relation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithRelation<P, C> {
    pub parent: P,
    pub related: Vec<C>,
}

impl<P, C> WithRelation<P, C> {
    /// The single related row of a many-to-one relation.
    pub fn one(&self) -> Option<&C> {
        self.related.first()
    }

    pub fn into_parts(self) -> (P, Vec<C>) {
        (self.parent, self.related)
    }
}

/// Collapses one-row-per-child join output into one entry per parent.
///
/// Parents keep first-seen order; their children are unioned by primary key
/// and sorted by it. `None` children come from outer joins with no match.
pub fn dedup_joined<P: Entity, C: Entity>(rows: Vec<(P, Option<C>)>) -> Vec<WithRelation<P, C>> {
    let mut index: AHashMap<i64, usize> = AHashMap::new();
    let mut seen: Vec<AHashSet<i64>> = Vec::new();
    let mut out: Vec<WithRelation<P, C>> = Vec::new();

    for (parent, child) in rows {
        let slot = *index.entry(parent.id()).or_insert_with(|| {
            out.push(WithRelation {
                parent,
                related: Vec::new(),
            });
            seen.push(AHashSet::new());
            out.len() - 1
        });
        if let Some(child) = child {
            if seen[slot].insert(child.id()) {
                out[slot].related.push(child);
            }
        }
    }

    for entry in &mut out {
        entry.related.sort_by_key(Entity::id);
    }
    out
}

/// Assigns children (tagged with their parent's key) to the matching parents.
pub fn group_by_link<P: Entity, C: Entity>(
    parents: Vec<P>,
    children: Vec<(i64, C)>,
) -> Vec<WithRelation<P, C>> {
    let mut by_parent: AHashMap<i64, (AHashSet<i64>, Vec<C>)> = AHashMap::new();
    for (link, child) in children {
        let (seen, bucket) = by_parent.entry(link).or_default();
        if seen.insert(child.id()) {
            bucket.push(child);
        }
    }

    parents
        .into_iter()
        .map(|parent| {
            let (_, mut related) = by_parent.remove(&parent.id()).unwrap_or_default();
            related.sort_by_key(Entity::id);
            WithRelation { parent, related }
        })
        .collect()
}
