//! Relationship catalogue.
//!
//! Every relation is declared once, up front, with an explicit back-reference.
//! [`RelationRegistry::build`] checks that each back-reference exists and points
//! back with the mirrored join keys before anything is queried.

use ahash::AHashMap;
use hirelink_schema::Workload;

use crate::error::HirelinkError;
use crate::loading::filter::Filter;

/// How parent and child rows are linked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// `child.foreign_key` references `parent.id`.
    OneToMany { foreign_key: &'static str },
    /// `parent.foreign_key` references `child.id`.
    ManyToOne { foreign_key: &'static str },
    /// `secondary.parent_key` references `parent.id` and
    /// `secondary.child_key` references `child.id`.
    ManyToMany {
        secondary: &'static str,
        parent_key: &'static str,
        child_key: &'static str,
    },
}

impl RelationKind {
    fn mirrors(&self, other: &RelationKind) -> bool {
        match (self, other) {
            (
                RelationKind::OneToMany { foreign_key: a },
                RelationKind::ManyToOne { foreign_key: b },
            )
            | (
                RelationKind::ManyToOne { foreign_key: a },
                RelationKind::OneToMany { foreign_key: b },
            ) => a == b,
            (
                RelationKind::ManyToMany {
                    secondary: s1,
                    parent_key: p1,
                    child_key: c1,
                },
                RelationKind::ManyToMany {
                    secondary: s2,
                    parent_key: p2,
                    child_key: c2,
                },
            ) => s1 == s2 && p1 == c2 && c1 == p2,
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RelationDescriptor {
    /// Attribute name on the parent, e.g. `resumes`.
    pub name: &'static str,
    pub parent: &'static str,
    pub child: &'static str,
    pub kind: RelationKind,
    /// Name of the inverse relation on the child. `None` marks a view-only relation.
    pub back_populates: Option<&'static str>,
    /// Extra predicate on the child folded into every join of this relation.
    pub condition: Filter,
}

impl RelationDescriptor {
    pub fn new(
        name: &'static str,
        parent: &'static str,
        child: &'static str,
        kind: RelationKind,
    ) -> Self {
        Self {
            name,
            parent,
            child,
            kind,
            back_populates: None,
            condition: Filter::default(),
        }
    }

    pub fn back_populates(mut self, inverse: &'static str) -> Self {
        self.back_populates = Some(inverse);
        self
    }

    pub fn with_condition(mut self, condition: Filter) -> Self {
        self.condition = condition;
        self
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.parent, self.name)
    }
}

#[derive(Debug, Clone)]
pub struct RelationRegistry {
    relations: AHashMap<(&'static str, &'static str), RelationDescriptor>,
}

impl RelationRegistry {
    pub fn build(descriptors: Vec<RelationDescriptor>) -> Result<Self, HirelinkError> {
        let mut relations = AHashMap::with_capacity(descriptors.len());
        for d in descriptors {
            let key = (d.parent, d.name);
            if relations.contains_key(&key) {
                return Err(HirelinkError::InvalidRelation(format!(
                    "{} declared twice",
                    d.qualified_name()
                )));
            }
            relations.insert(key, d);
        }

        for d in relations.values() {
            let Some(inverse) = d.back_populates else {
                continue;
            };
            if !d.condition.is_empty() {
                return Err(HirelinkError::InvalidRelation(format!(
                    "{} has a join condition and must be view-only",
                    d.qualified_name()
                )));
            }
            let Some(back) = relations.get(&(d.child, inverse)) else {
                return Err(HirelinkError::InvalidRelation(format!(
                    "{} back-populates missing {}.{}",
                    d.qualified_name(),
                    d.child,
                    inverse
                )));
            };
            if back.child != d.parent || back.back_populates != Some(d.name) {
                return Err(HirelinkError::InvalidRelation(format!(
                    "{} and {} do not point at each other",
                    d.qualified_name(),
                    back.qualified_name()
                )));
            }
            if !d.kind.mirrors(&back.kind) {
                return Err(HirelinkError::InvalidRelation(format!(
                    "{} and {} disagree on join keys",
                    d.qualified_name(),
                    back.qualified_name()
                )));
            }
        }

        Ok(Self { relations })
    }

    /// The hiring schema's relations.
    pub fn hiring() -> Result<Self, HirelinkError> {
        Self::build(vec![
            RelationDescriptor::new(
                "resumes",
                "workers",
                "resumes",
                RelationKind::OneToMany {
                    foreign_key: "worker_id",
                },
            )
            .back_populates("worker"),
            RelationDescriptor::new(
                "resumes_parttime",
                "workers",
                "resumes",
                RelationKind::OneToMany {
                    foreign_key: "worker_id",
                },
            )
            .with_condition(Filter::new().eq("workload", Workload::Parttime)),
            RelationDescriptor::new(
                "worker",
                "resumes",
                "workers",
                RelationKind::ManyToOne {
                    foreign_key: "worker_id",
                },
            )
            .back_populates("resumes"),
            RelationDescriptor::new(
                "vacancies_replied",
                "resumes",
                "vacancies",
                RelationKind::ManyToMany {
                    secondary: "vacancies_replies",
                    parent_key: "resume_id",
                    child_key: "vacancy_id",
                },
            )
            .back_populates("resumes_replied"),
            RelationDescriptor::new(
                "resumes_replied",
                "vacancies",
                "resumes",
                RelationKind::ManyToMany {
                    secondary: "vacancies_replies",
                    parent_key: "vacancy_id",
                    child_key: "resume_id",
                },
            )
            .back_populates("vacancies_replied"),
        ])
    }

    pub fn get(&self, parent: &str, name: &str) -> Result<&RelationDescriptor, HirelinkError> {
        self.relations
            .iter()
            .find(|((p, n), _)| *p == parent && *n == name)
            .map(|(_, d)| d)
            .ok_or_else(|| HirelinkError::UnknownRelation(format!("{parent}.{name}")))
    }

    pub fn len(&self) -> usize {
        self.relations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_to_many() -> RelationDescriptor {
        RelationDescriptor::new(
            "resumes",
            "workers",
            "resumes",
            RelationKind::OneToMany {
                foreign_key: "worker_id",
            },
        )
    }

    fn many_to_one() -> RelationDescriptor {
        RelationDescriptor::new(
            "worker",
            "resumes",
            "workers",
            RelationKind::ManyToOne {
                foreign_key: "worker_id",
            },
        )
    }

    #[test]
    fn hiring_catalogue_is_consistent() {
        let registry = RelationRegistry::hiring().unwrap();
        assert_eq!(registry.len(), 5);

        let parttime = registry.get("workers", "resumes_parttime").unwrap();
        assert!(parttime.back_populates.is_none());
        assert_eq!(parttime.condition.predicates().len(), 1);
    }

    #[test]
    fn unknown_relation_is_reported_by_name() {
        let registry = RelationRegistry::hiring().unwrap();
        let err = registry.get("workers", "vacancies").unwrap_err();
        assert!(matches!(err, HirelinkError::UnknownRelation(name) if name == "workers.vacancies"));
    }

    #[test]
    fn missing_back_reference_is_rejected() {
        let err = RelationRegistry::build(vec![one_to_many().back_populates("worker")]).unwrap_err();
        assert!(matches!(err, HirelinkError::InvalidRelation(_)));
    }

    #[test]
    fn back_reference_must_point_back() {
        let err = RelationRegistry::build(vec![
            one_to_many().back_populates("worker"),
            many_to_one().back_populates("something_else"),
        ])
        .unwrap_err();
        assert!(matches!(err, HirelinkError::InvalidRelation(msg) if msg.contains("do not point")));
    }

    #[test]
    fn mismatched_keys_are_rejected() {
        let mut inverse = many_to_one().back_populates("resumes");
        inverse.kind = RelationKind::ManyToOne {
            foreign_key: "owner_id",
        };
        let err = RelationRegistry::build(vec![one_to_many().back_populates("worker"), inverse])
            .unwrap_err();
        assert!(matches!(err, HirelinkError::InvalidRelation(msg) if msg.contains("join keys")));
    }

    #[test]
    fn conditioned_relation_must_be_view_only() {
        let err = RelationRegistry::build(vec![
            one_to_many()
                .back_populates("worker")
                .with_condition(Filter::new().eq("workload", "parttime")),
            many_to_one().back_populates("resumes"),
        ])
        .unwrap_err();
        assert!(matches!(err, HirelinkError::InvalidRelation(msg) if msg.contains("view-only")));
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let err = RelationRegistry::build(vec![one_to_many(), one_to_many()]).unwrap_err();
        assert!(matches!(err, HirelinkError::InvalidRelation(msg) if msg.contains("twice")));
    }
}
