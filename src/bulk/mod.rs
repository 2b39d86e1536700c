//! Bulk mutation across a selection of records
//!
//! The same remote mutation is dispatched for every selected id at once and
//! the batch waits for all of them to settle. Only ids the backend confirmed
//! are reconciled out of local state; the rest stay listed and selected.

use crate::core::{Entity, EntityMutator};
use futures::future::join_all;
use indexmap::IndexSet;
use serde::Serialize;

/// Aggregate result of a bulk mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    /// Every mutation succeeded
    Success,
    /// Some succeeded, some failed
    Partial,
    /// Every mutation failed
    Failure,
    /// Nothing was selected
    Empty,
}

/// Per-batch tally of a bulk mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Ids the backend confirmed, in selection order
    pub succeeded_ids: Vec<String>,

    /// Number of ids that were refused or errored
    pub failed_count: usize,
}

impl BulkOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match (self.succeeded_ids.len(), self.failed_count) {
            (0, 0) => OutcomeKind::Empty,
            (_, 0) => OutcomeKind::Success,
            (0, _) => OutcomeKind::Failure,
            _ => OutcomeKind::Partial,
        }
    }

    pub fn attempted(&self) -> usize {
        self.succeeded_ids.len() + self.failed_count
    }

    /// Message for the surrounding UI
    ///
    /// `verb` is the base form of a regular verb (e.g., "delete") and `noun`
    /// the plural resource name (e.g., "products").
    pub fn message(&self, verb: &str, noun: &str) -> String {
        let succeeded = self.succeeded_ids.len();
        match self.kind() {
            OutcomeKind::Success => format!("Successfully {}d {} {}", verb, succeeded, noun),
            OutcomeKind::Partial => format!(
                "Successfully {}d {} {} ({} failed)",
                verb, succeeded, noun, self.failed_count
            ),
            OutcomeKind::Failure => {
                format!("Failed to {} {} {}", verb, self.failed_count, noun)
            }
            OutcomeKind::Empty => format!("No {} selected", noun),
        }
    }

    /// Remove confirmed ids from the displayed collection and the selection
    ///
    /// Failed ids are left exactly where they were.
    pub fn reconcile<T: Entity>(&self, collection: &mut Vec<T>, selection: &mut Selection) {
        let succeeded: IndexSet<&str> = self.succeeded_ids.iter().map(String::as_str).collect();

        collection.retain(|item| !succeeded.contains(item.id()));
        for id in &succeeded {
            selection.deselect(id);
        }
    }
}

/// Apply `mutator` to every id concurrently and tally the outcomes
///
/// Duplicate ids are mutated once. `Ok(false)` and `Err(_)` both count as
/// failures; neither stops the rest of the batch.
pub async fn bulk_mutate<I, S>(ids: I, mutator: &dyn EntityMutator) -> BulkOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let ids: IndexSet<String> = ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();

    let outcomes = join_all(ids.iter().map(|id| mutator.mutate(id))).await;

    let mut succeeded_ids = Vec::new();
    let mut failed_count = 0;
    for (id, outcome) in ids.into_iter().zip(outcomes) {
        match outcome {
            Ok(true) => succeeded_ids.push(id),
            Ok(false) => {
                tracing::warn!(id = %id, "Mutation refused by backend");
                failed_count += 1;
            }
            Err(e) => {
                tracing::warn!(id = %id, error = %e, "Mutation failed");
                failed_count += 1;
            }
        }
    }

    let outcome = BulkOutcome {
        succeeded_ids,
        failed_count,
    };
    tracing::info!(
        succeeded = outcome.succeeded_ids.len(),
        failed = outcome.failed_count,
        kind = ?outcome.kind(),
        "Bulk mutation settled"
    );

    outcome
}

/// Ids picked for a bulk action, in the order they were picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    ids: IndexSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, id: impl Into<String>) {
        self.ids.insert(id.into());
    }

    pub fn deselect(&mut self, id: &str) {
        self.ids.shift_remove(id);
    }

    /// Select if absent, deselect if present
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    /// Select every item of a (filtered) view
    pub fn select_all<T: Entity>(&mut self, items: &[T]) {
        self.ids.extend(items.iter().map(|item| item.id().to_string()));
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Product;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Mutator with scripted per-id responses; unknown ids succeed
    struct ScriptedMutator {
        errors: Vec<&'static str>,
        refusals: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedMutator {
        fn new(errors: &[&'static str], refusals: &[&'static str]) -> Self {
            Self {
                errors: errors.to_vec(),
                refusals: refusals.to_vec(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl EntityMutator for ScriptedMutator {
        async fn mutate(&self, id: &str) -> Result<bool> {
            self.calls.lock().unwrap().push(id.to_string());
            if self.errors.iter().any(|e| *e == id) {
                return Err(anyhow!("500 Internal Server Error"));
            }
            Ok(!self.refusals.iter().any(|r| *r == id))
        }
    }

    fn products(ids: &[&str]) -> Vec<Product> {
        ids.iter()
            .map(|id| Product::new(*id, format!("Item {}", id), "Men", 1.0))
            .collect()
    }

    #[tokio::test]
    async fn test_partial_failure_reconciles_successes_only() {
        let mutator = ScriptedMutator::new(&["b"], &[]);
        let mut collection = products(&["a", "b", "c", "d"]);
        let mut selection = Selection::new();
        for id in ["a", "b", "c"] {
            selection.select(id);
        }

        let outcome = bulk_mutate(selection.ids().collect::<Vec<_>>(), &mutator).await;

        assert_eq!(outcome.succeeded_ids, vec!["a".to_string(), "c".to_string()]);
        assert_eq!(outcome.failed_count, 1);
        assert_eq!(outcome.kind(), OutcomeKind::Partial);

        outcome.reconcile(&mut collection, &mut selection);

        let remaining: Vec<_> = collection.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(remaining, vec!["b", "d"]);
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["b"]);
    }

    #[tokio::test]
    async fn test_refusal_counts_as_failure() {
        let mutator = ScriptedMutator::new(&[], &["a", "b"]);
        let outcome = bulk_mutate(["a", "b"], &mutator).await;

        assert!(outcome.succeeded_ids.is_empty());
        assert_eq!(outcome.failed_count, 2);
        assert_eq!(outcome.kind(), OutcomeKind::Failure);
        assert_eq!(outcome.message("delete", "products"), "Failed to delete 2 products");
    }

    #[tokio::test]
    async fn test_duplicates_mutated_once() {
        let mutator = ScriptedMutator::new(&[], &[]);
        let outcome = bulk_mutate(["a", "a", "b"], &mutator).await;

        assert_eq!(mutator.calls.lock().unwrap().len(), 2);
        assert_eq!(outcome.attempted(), 2);
        assert_eq!(outcome.message("delete", "products"), "Successfully deleted 2 products");
    }

    #[tokio::test]
    async fn test_empty_selection() {
        let mutator = ScriptedMutator::new(&[], &[]);
        let outcome = bulk_mutate(Vec::<String>::new(), &mutator).await;

        assert_eq!(outcome.kind(), OutcomeKind::Empty);
        assert_eq!(outcome.message("delete", "products"), "No products selected");
    }

    #[test]
    fn test_partial_message() {
        let outcome = BulkOutcome {
            succeeded_ids: vec!["a".to_string(), "c".to_string()],
            failed_count: 1,
        };
        assert_eq!(
            outcome.message("delete", "products"),
            "Successfully deleted 2 products (1 failed)"
        );
    }

    #[test]
    fn test_selection_operations() {
        let mut selection = Selection::new();
        selection.toggle("a");
        selection.toggle("b");
        selection.toggle("a");
        assert_eq!(selection.ids().collect::<Vec<_>>(), vec!["b"]);

        selection.select_all(&products(&["c", "b"]));
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("c"));

        selection.clear();
        assert!(selection.is_empty());
    }
}
