//! Create/update/delete over an ordered collection of identified records.
//!
//! Every operation takes the current snapshot by reference and hands back a
//! fresh one; the input slice is never touched.

use tracing::{debug, warn};

pub trait Entity: Clone {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created(String),
    Updated,
    Deleted,
    /// Update or delete named an id the collection does not hold.
    Missing,
}

#[derive(Debug, Clone)]
pub struct Reduction<T> {
    pub items: Vec<T>,
    pub outcome: Outcome,
}

impl<T> Reduction<T> {
    pub fn applied(&self) -> bool {
        self.outcome != Outcome::Missing
    }
}

/// Appends `item`, allocating an id only when the caller left it blank.
pub fn create<T, F>(items: &[T], mut item: T, allocate: F) -> Reduction<T>
where
    T: Entity,
    F: FnOnce() -> String,
{
    if item.id().trim().is_empty() {
        item.set_id(allocate());
    }
    let id = item.id().to_string();
    let mut next = Vec::with_capacity(items.len() + 1);
    next.extend_from_slice(items);
    next.push(item);
    debug!(%id, len = next.len(), "created record");
    Reduction {
        items: next,
        outcome: Outcome::Created(id),
    }
}

/// Replaces the record whose id matches `item`, keeping its position.
pub fn update<T: Entity>(items: &[T], item: T) -> Reduction<T> {
    let Some(position) = items.iter().position(|existing| existing.id() == item.id()) else {
        warn!(id = item.id(), "update skipped, id not found");
        return Reduction {
            items: items.to_vec(),
            outcome: Outcome::Missing,
        };
    };
    let mut next = items.to_vec();
    debug!(id = item.id(), position, "updated record");
    next[position] = item;
    Reduction {
        items: next,
        outcome: Outcome::Updated,
    }
}

pub fn delete<T: Entity>(items: &[T], id: &str) -> Reduction<T> {
    let next: Vec<T> = items.iter().filter(|item| item.id() != id).cloned().collect();
    if next.len() == items.len() {
        warn!(%id, "delete skipped, id not found");
        return Reduction {
            items: next,
            outcome: Outcome::Missing,
        };
    }
    debug!(%id, len = next.len(), "deleted record");
    Reduction {
        items: next,
        outcome: Outcome::Deleted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        label: &'static str,
    }

    impl Entity for Row {
        fn id(&self) -> &str {
            &self.id
        }

        fn set_id(&mut self, id: String) {
            self.id = id;
        }
    }

    fn row(id: &str, label: &'static str) -> Row {
        Row {
            id: id.to_string(),
            label,
        }
    }

    fn sample() -> Vec<Row> {
        vec![row("a", "uno"), row("b", "dos"), row("c", "tres")]
    }

    #[test]
    fn create_appends_with_generated_id() {
        let items = sample();
        let reduced = create(&items, row("", "cuatro"), || "gen-1".to_string());

        assert_eq!(reduced.outcome, Outcome::Created("gen-1".to_string()));
        assert_eq!(reduced.items.len(), 4);
        assert_eq!(reduced.items[3], row("gen-1", "cuatro"));
        assert_eq!(items, sample());
    }

    #[test]
    fn create_keeps_caller_id() {
        let reduced = create(&sample(), row("z", "zeta"), || unreachable!());
        assert_eq!(reduced.items[3].id, "z");
    }

    #[test]
    fn create_then_delete_restores_collection() {
        let items = sample();
        let created = create(&items, row("", "temporal"), || "tmp".to_string());
        let Outcome::Created(id) = created.outcome.clone() else {
            panic!("expected a created outcome");
        };
        let deleted = delete(&created.items, &id);
        assert_eq!(deleted.outcome, Outcome::Deleted);
        assert_eq!(deleted.items, items);
    }

    #[test]
    fn update_replaces_in_place() {
        let items = sample();
        let reduced = update(&items, row("b", "DOS"));

        assert_eq!(reduced.outcome, Outcome::Updated);
        assert_eq!(reduced.items.len(), items.len());
        assert_eq!(reduced.items[1], row("b", "DOS"));
        assert_eq!(reduced.items[0], items[0]);
        assert_eq!(reduced.items[2], items[2]);
    }

    #[test]
    fn missing_ids_are_reported_no_ops() {
        let items = sample();

        let updated = update(&items, row("nope", "x"));
        assert_eq!(updated.outcome, Outcome::Missing);
        assert!(!updated.applied());
        assert_eq!(updated.items, items);

        let deleted = delete(&items, "nope");
        assert_eq!(deleted.outcome, Outcome::Missing);
        assert_eq!(deleted.items, items);
    }
}
